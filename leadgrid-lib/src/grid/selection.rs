//! Row selection for grids.
//!
//! Selection is a sparse set of row ids. Counts and id lists are always
//! derived from the set; "select all" only ever acts on the visible page.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

/// What happens to selected ids that are not part of newly loaded rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Drop ids that are not in the newly loaded rows.
    #[default]
    PruneOnPageChange,
    /// Keep ids across page loads; the grid reports how many are off-page.
    Accumulate,
}

/// Tri-state of the header "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    /// No visible row is selected.
    Unchecked,
    /// Some but not all visible rows are selected.
    Indeterminate,
    /// Every visible row is selected.
    Checked,
}

/// ID-based selection state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        self.selected.drain().collect()
    }

    /// Flip one row.
    /// Returns `true` if the row is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Select or deselect one row explicitly.
    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if selected {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    /// Header control state over the visible rows.
    pub fn header_state(&self, visible_ids: &[String]) -> HeaderState {
        let selected = self.count_in(visible_ids);
        if selected == 0 {
            HeaderState::Unchecked
        } else if selected == distinct(visible_ids).len() {
            HeaderState::Checked
        } else {
            HeaderState::Indeterminate
        }
    }

    /// Header click: select every visible row, or deselect them all when
    /// they are already all selected. Rows off the page are left alone.
    ///
    /// Returns (added, removed) IDs.
    pub fn toggle_visible(&mut self, visible_ids: &[String]) -> (Vec<String>, Vec<String>) {
        if self.header_state(visible_ids) == HeaderState::Checked {
            let removed = visible_ids
                .iter()
                .filter(|id| self.selected.remove(id.as_str()))
                .cloned()
                .collect();
            (Vec::new(), removed)
        } else {
            let added = visible_ids
                .iter()
                .filter(|id| self.selected.insert((*id).clone()))
                .cloned()
                .collect();
            (added, Vec::new())
        }
    }

    /// Drop every ID not in `keep`.
    /// Returns the IDs that were deselected.
    pub fn retain_only(&mut self, keep: &[String]) -> Vec<String> {
        let keep: HashSet<&str> = keep.iter().map(String::as_str).collect();
        let removed: Vec<String> = self
            .selected
            .iter()
            .filter(|id| !keep.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &removed {
            self.selected.remove(id);
        }
        removed
    }

    /// Number of distinct selected IDs among `ids`.
    pub fn count_in(&self, ids: &[String]) -> usize {
        distinct(ids)
            .into_iter()
            .filter(|id| self.selected.contains(*id))
            .count()
    }

    /// Number of selected IDs that are not among `visible_ids`.
    pub fn hidden_count(&self, visible_ids: &[String]) -> usize {
        self.len().saturating_sub(self.count_in(visible_ids))
    }
}

fn distinct(ids: &[String]) -> HashSet<&str> {
    ids.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_visible_ids_count_once() {
        let visible = ids(&["a", "a", "b"]);
        let mut selection = Selection::new();
        selection.toggle("a");
        selection.toggle("b");

        assert_eq!(selection.count_in(&visible), 2);
        assert_eq!(selection.hidden_count(&visible), 0);
        assert_eq!(selection.header_state(&visible), HeaderState::Checked);

        selection.toggle("b");
        assert_eq!(selection.header_state(&visible), HeaderState::Indeterminate);
    }

    #[test]
    fn test_header_tri_state() {
        let visible = ids(&["a", "b", "c"]);
        let mut selection = Selection::new();

        selection.toggle_visible(&visible);
        assert_eq!(selection.header_state(&visible), HeaderState::Checked);

        selection.toggle("b");
        assert_eq!(selection.header_state(&visible), HeaderState::Indeterminate);

        selection.toggle("a");
        selection.toggle("c");
        assert_eq!(selection.header_state(&visible), HeaderState::Unchecked);
    }

    #[test]
    fn test_toggle_visible_leaves_other_pages_alone() {
        let mut selection = Selection::new();
        selection.toggle("elsewhere");

        let visible = ids(&["a", "b"]);
        let (added, removed) = selection.toggle_visible(&visible);
        assert_eq!(added.len(), 2);
        assert!(removed.is_empty());

        let (added, removed) = selection.toggle_visible(&visible);
        assert!(added.is_empty());
        assert_eq!(removed.len(), 2);
        assert_eq!(selection.selected(), ids(&["elsewhere"]));
    }

    #[test]
    fn test_partial_header_click_selects_rest() {
        let visible = ids(&["a", "b"]);
        let mut selection = Selection::new();
        selection.toggle("a");

        let (added, _) = selection.toggle_visible(&visible);
        assert_eq!(added, ids(&["b"]));
        assert_eq!(selection.header_state(&visible), HeaderState::Checked);
    }

    #[test]
    fn test_empty_page_is_unchecked() {
        let mut selection = Selection::new();
        selection.toggle("a");
        assert_eq!(selection.header_state(&[]), HeaderState::Unchecked);
    }

    #[test]
    fn test_retain_only_and_hidden_count() {
        let mut selection = Selection::new();
        for id in ["a", "b", "c"] {
            selection.toggle(id);
        }
        let page = ids(&["b", "z"]);
        assert_eq!(selection.hidden_count(&page), 2);

        let mut removed = selection.retain_only(&page);
        removed.sort();
        assert_eq!(removed, ids(&["a", "c"]));
        assert_eq!(selection.selected(), ids(&["b"]));
    }
}
