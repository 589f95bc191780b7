//! Pagination controller.
//!
//! Two regimes share one type. In internal mode the controller owns the page
//! state and slices a fully loaded row set. In external mode the host owns the
//! page state (it comes back with every fetch) and navigation methods only
//! return the intended [`PageChange`] for the host to put into its query.

use std::ops::Range;

use crate::config::QueryKeys;
use crate::model::QueryPatch;

use super::window::{PageItem, page_window};

/// Who owns the page state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Rows are fully loaded; the controller slices them.
    Internal,
    /// Rows arrive a page at a time; the host supplies counts.
    External,
}

/// Page position and totals.
///
/// Invariant: `page_index < max(1, page_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// 0-based page index.
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_elements: usize,
}

impl PaginationState {
    /// Builds a state from a row total, deriving the page count.
    pub fn from_total(page_index: usize, page_size: usize, total_elements: usize) -> Self {
        let mut state = Self {
            page_index,
            page_size,
            page_count: page_count(total_elements, page_size),
            total_elements,
        };
        state.clamp();
        state
    }

    fn clamp(&mut self) {
        self.page_index = self.page_index.min(self.page_count.saturating_sub(1));
    }
}

/// A navigation intent: go to this page with this page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    /// 0-based page index.
    pub page_index: usize,
    pub page_size: usize,
}

impl PageChange {
    /// Writes the page keys into a patch. The page number is offset by `first_page`.
    pub fn write_to(&self, patch: &mut QueryPatch, keys: &QueryKeys, first_page: usize) {
        patch.set(&keys.page, first_page + self.page_index);
        patch.set(&keys.page_size, self.page_size);
    }
}

fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { total.div_ceil(page_size) }
}

/// Page navigation state for one grid.
#[derive(Debug, Clone)]
pub struct Paginator {
    mode: PaginationMode,
    state: PaginationState,
}

impl Paginator {
    /// Creates a controller for a fully loaded row set.
    pub fn internal(page_size: usize) -> Self {
        Self::new(PaginationMode::Internal, page_size)
    }

    /// Creates a controller for server-driven paging.
    pub fn external(page_size: usize) -> Self {
        Self::new(PaginationMode::External, page_size)
    }

    fn new(mode: PaginationMode, page_size: usize) -> Self {
        Self {
            mode,
            state: PaginationState {
                page_index: 0,
                page_size: page_size.max(1),
                page_count: 0,
                total_elements: 0,
            },
        }
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn page_index(&self) -> usize {
        self.state.page_index
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count
    }

    pub fn total_elements(&self) -> usize {
        self.state.total_elements
    }

    /// Internal mode: the number of rows after client-side filtering changed.
    pub fn set_row_count(&mut self, rows: usize) {
        if self.mode == PaginationMode::External {
            log::warn!("[grid] set_row_count called on an externally paged grid");
            return;
        }
        self.state.total_elements = rows;
        self.state.page_count = page_count(rows, self.state.page_size);
        self.state.clamp();
    }

    /// External mode: take the page state reported by the host.
    ///
    /// Out-of-range indices are clamped rather than trusted.
    pub fn sync(&mut self, state: PaginationState) {
        self.state = PaginationState {
            page_size: state.page_size.max(1),
            ..state
        };
        self.state.clamp();
    }

    /// Go to a page. The index is clamped to `[0, page_count - 1]`.
    ///
    /// Returns `None` if the (clamped) target is the current page.
    pub fn set_page_index(&mut self, page_index: usize) -> Option<PageChange> {
        let target = page_index.min(self.state.page_count.saturating_sub(1));
        if target == self.state.page_index {
            return None;
        }
        Some(self.navigate(PageChange {
            page_index: target,
            page_size: self.state.page_size,
        }))
    }

    /// Change the page size. Always goes back to the first page.
    ///
    /// Returns `None` for a zero size or when already on the first page at
    /// that size.
    pub fn set_page_size(&mut self, page_size: usize) -> Option<PageChange> {
        if page_size == 0 {
            log::warn!("[grid] ignoring page size of zero");
            return None;
        }
        if page_size == self.state.page_size && self.state.page_index == 0 {
            return None;
        }
        Some(self.navigate(PageChange {
            page_index: 0,
            page_size,
        }))
    }

    /// Go back to the first page.
    pub fn first_page(&mut self) -> Option<PageChange> {
        self.set_page_index(0)
    }

    /// Go to the last page.
    pub fn last_page(&mut self) -> Option<PageChange> {
        self.set_page_index(self.state.page_count.saturating_sub(1))
    }

    /// Go to the previous page; a no-op on the first page.
    pub fn previous_page(&mut self) -> Option<PageChange> {
        if !self.can_previous_page() {
            return None;
        }
        self.set_page_index(self.state.page_index - 1)
    }

    /// Go to the next page; a no-op on the last page.
    pub fn next_page(&mut self) -> Option<PageChange> {
        if !self.can_next_page() {
            return None;
        }
        self.set_page_index(self.state.page_index + 1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.page_index + 1 < self.state.page_count
    }

    /// Navigation controls are only shown with more than one page.
    pub fn show_controls(&self) -> bool {
        self.state.page_count > 1
    }

    /// Page buttons around the current page.
    pub fn window(&self, delta: usize) -> Vec<PageItem> {
        if !self.show_controls() {
            return Vec::new();
        }
        page_window(self.state.page_count, self.state.page_index, delta)
    }

    /// Absolute 0-based row range of the current page, for "showing x-y of n".
    pub fn row_range(&self) -> Range<usize> {
        let start = (self.state.page_index * self.state.page_size).min(self.state.total_elements);
        let end = (start + self.state.page_size).min(self.state.total_elements);
        start..end
    }

    /// The current page of a fully loaded row set. External mode returns the
    /// rows unchanged since they already are one page.
    pub fn slice<'a, R>(&self, rows: &'a [R]) -> &'a [R] {
        match self.mode {
            PaginationMode::External => rows,
            PaginationMode::Internal => {
                let start = (self.state.page_index * self.state.page_size).min(rows.len());
                let end = (start + self.state.page_size).min(rows.len());
                &rows[start..end]
            }
        }
    }

    fn navigate(&mut self, change: PageChange) -> PageChange {
        if self.mode == PaginationMode::Internal {
            self.state.page_size = change.page_size;
            self.state.page_count = page_count(self.state.total_elements, change.page_size);
            self.state.page_index = change.page_index;
            self.state.clamp();
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(rows: usize, page_size: usize) -> Paginator {
        let mut paginator = Paginator::internal(page_size);
        paginator.set_row_count(rows);
        paginator
    }

    #[test]
    fn test_internal_page_count_rounds_up() {
        let paginator = loaded(45, 20);
        assert_eq!(paginator.page_count(), 3);
        assert_eq!(loaded(40, 20).page_count(), 2);
        assert_eq!(loaded(0, 20).page_count(), 0);
    }

    #[test]
    fn test_set_page_index_clamps() {
        let mut paginator = loaded(45, 20);
        assert_eq!(paginator.set_page_index(99).map(|c| c.page_index), Some(2));
        assert_eq!(paginator.page_index(), 2);
        assert!(paginator.set_page_index(99).is_none());
    }

    #[test]
    fn test_set_page_size_always_returns_to_first_page() {
        for start in 0..5 {
            let mut paginator = loaded(100, 20);
            paginator.set_page_index(start);
            paginator.set_page_size(10);
            assert_eq!(paginator.page_index(), 0);
            assert_eq!(paginator.page_count(), 10);
        }

        let mut paginator = loaded(100, 20);
        paginator.set_page_index(3);
        let change = paginator.set_page_size(20).unwrap();
        assert_eq!(change.page_index, 0);
        assert_eq!(paginator.page_index(), 0);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut paginator = loaded(30, 10);
        assert!(!paginator.can_previous_page());
        assert!(paginator.previous_page().is_none());

        paginator.last_page();
        assert!(!paginator.can_next_page());
        assert!(paginator.next_page().is_none());
        assert_eq!(paginator.page_index(), 2);
    }

    #[test]
    fn test_shrinking_rows_clamps_index() {
        let mut paginator = loaded(100, 10);
        paginator.set_page_index(9);
        paginator.set_row_count(15);
        assert_eq!(paginator.page_index(), 1);

        paginator.set_row_count(3);
        assert_eq!(paginator.page_index(), 0);
        assert!(!paginator.show_controls());
        assert!(paginator.window(2).is_empty());
    }

    #[test]
    fn test_slice_and_row_range() {
        let rows: Vec<usize> = (0..25).collect();
        let mut paginator = loaded(rows.len(), 10);
        paginator.last_page();
        assert_eq!(paginator.slice(&rows), &[20, 21, 22, 23, 24]);
        assert_eq!(paginator.row_range(), 20..25);
    }

    #[test]
    fn test_external_only_emits_intents() {
        let mut paginator = Paginator::external(20);
        paginator.sync(PaginationState::from_total(0, 20, 95));
        assert_eq!(paginator.page_count(), 5);

        let change = paginator.next_page().unwrap();
        assert_eq!(change, PageChange { page_index: 1, page_size: 20 });
        assert_eq!(paginator.page_index(), 0);

        paginator.sync(PaginationState::from_total(change.page_index, 20, 95));
        assert_eq!(paginator.page_index(), 1);

        let rows = [1, 2, 3];
        assert_eq!(paginator.slice(&rows), &rows);
    }

    #[test]
    fn test_external_sync_clamps_host_index() {
        let mut paginator = Paginator::external(20);
        paginator.sync(PaginationState {
            page_index: 7,
            page_size: 20,
            page_count: 3,
            total_elements: 55,
        });
        assert_eq!(paginator.page_index(), 2);
    }

    #[test]
    fn test_page_change_writes_one_based_page() {
        let mut patch = QueryPatch::new();
        PageChange { page_index: 2, page_size: 50 }.write_to(&mut patch, &QueryKeys::default(), 1);
        assert_eq!(patch.get("page").and_then(|v| v.as_int()), Some(3));
        assert_eq!(patch.get("page_size").and_then(|v| v.as_int()), Some(50));
    }
}
