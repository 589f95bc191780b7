//! Sorting controller.
//!
//! One active sort at a time. Header interaction walks a fixed cycle:
//! unsorted → ascending → descending → unsorted. Clicking a different column
//! starts that column at ascending.

use std::fmt;
use std::str::FromStr;

use crate::config::QueryKeys;
use crate::model::Query;
use crate::model::QueryPatch;
use crate::model::QueryValue;

use super::Columns;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns the query encoding (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// The active sort: a column id and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Reads the sort from the query's sort keys.
    ///
    /// A missing column or an unparsable direction reads as unsorted.
    pub fn from_query(query: &Query, keys: &QueryKeys) -> Option<Self> {
        let column_id = query.get(&keys.sort_by)?.as_text().filter(|s| !s.is_empty())?;
        let direction = query
            .get(&keys.sort_dir)
            .and_then(QueryValue::as_text)
            .map_or(Ok(SortDirection::Asc), str::parse)
            .ok()?;
        Some(Self {
            column_id: column_id.to_string(),
            direction,
        })
    }
}

/// Whether the grid orders rows itself or leaves it to the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Stable client-side sort over the column comparator.
    Auto,
    /// Sort state is informational; the host passes it to the remote query.
    Manual,
}

/// Header indicator for one column, always consistent with the toggle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

/// Emitted when the sort changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortChange {
    /// The new sort (`None` when unsorted).
    pub sort: Option<SortState>,
    /// Whether the host must go back to the first page (manual mode).
    pub reset_page: bool,
}

impl SortChange {
    /// Writes the sort keys (and the first page, when required) into a patch.
    pub fn write_to(&self, patch: &mut QueryPatch, keys: &QueryKeys, first_page: usize) {
        match &self.sort {
            Some(sort) => {
                patch.set(&keys.sort_by, sort.column_id.as_str());
                patch.set(&keys.sort_dir, sort.direction.as_str());
            }
            None => {
                patch.set(&keys.sort_by, QueryValue::Null);
                patch.set(&keys.sort_dir, QueryValue::Null);
            }
        }
        if self.reset_page {
            patch.set(&keys.page, first_page);
        }
    }
}

/// Single-column sort state.
#[derive(Debug, Clone)]
pub struct Sorter {
    mode: SortMode,
    state: Option<SortState>,
}

impl Sorter {
    pub fn new(mode: SortMode) -> Self {
        Self { mode, state: None }
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Get the stored sort state, whether or not it names a usable column.
    pub fn state(&self) -> Option<&SortState> {
        self.state.as_ref()
    }

    /// Get the sort state if it names a known, sortable column.
    pub fn effective<T>(&self, columns: &Columns<T>) -> Option<&SortState> {
        self.state
            .as_ref()
            .filter(|s| columns.find_sortable(&s.column_id).is_some())
    }

    /// Header click on a column.
    ///
    /// Returns `None` (and changes nothing) for unknown or non-sortable columns.
    pub fn toggle<T>(&mut self, column_id: &str, columns: &Columns<T>) -> Option<SortChange> {
        if columns.find_sortable(column_id).is_none() {
            log::debug!("[grid] ignoring sort toggle on '{}'", column_id);
            return None;
        }
        let next = match self.effective(columns) {
            Some(s) if s.column_id == column_id => match s.direction {
                SortDirection::Asc => Some(SortState::desc(column_id)),
                SortDirection::Desc => None,
            },
            _ => Some(SortState::asc(column_id)),
        };
        Some(self.replace(next))
    }

    /// Set the sort explicitly (e.g. seeded from the applied query).
    ///
    /// A state naming an unknown or non-sortable column is stored as unsorted.
    /// Returns `None` if nothing changed.
    pub fn set<T>(&mut self, sort: Option<SortState>, columns: &Columns<T>) -> Option<SortChange> {
        let sort = sort.filter(|s| {
            let known = columns.find_sortable(&s.column_id).is_some();
            if !known {
                log::debug!("[grid] dropping sort on unknown or unsortable column '{}'", s.column_id);
            }
            known
        });
        if sort == self.state {
            return None;
        }
        Some(self.replace(sort))
    }

    /// Clear sort state.
    pub fn clear(&mut self) -> Option<SortChange> {
        self.state.as_ref()?;
        Some(self.replace(None))
    }

    /// Header indicator for a column.
    pub fn indicator<T>(&self, column_id: &str, columns: &Columns<T>) -> SortIndicator {
        match self.effective(columns) {
            Some(s) if s.column_id == column_id => match s.direction {
                SortDirection::Asc => SortIndicator::Ascending,
                SortDirection::Desc => SortIndicator::Descending,
            },
            _ => SortIndicator::Unsorted,
        }
    }

    /// Orders rows in place by the active sort. Stable; a no-op in manual mode.
    pub fn sort_rows<R>(&self, rows: &mut [&R], columns: &Columns<R>) {
        if self.mode == SortMode::Manual {
            return;
        }
        let Some(state) = self.effective(columns) else {
            return;
        };
        let Some(column) = columns.find_sortable(&state.column_id) else {
            return;
        };
        match state.direction {
            SortDirection::Asc => rows.sort_by(|a, b| column.compare(a, b)),
            SortDirection::Desc => rows.sort_by(|a, b| column.compare(a, b).reverse()),
        }
    }

    fn replace(&mut self, sort: Option<SortState>) -> SortChange {
        self.state = sort.clone();
        SortChange {
            sort,
            reset_page: self.mode == SortMode::Manual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Column;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        score: i64,
    }

    fn columns() -> Columns<Row> {
        Columns::new()
            .with(Column::new("name", "Name", |r: &Row| r.name.into()))
            .with(Column::new("score", "Score", |r: &Row| r.score.into()).sortable())
    }

    #[test]
    fn test_toggle_cycle() {
        let columns = columns();
        let mut sorter = Sorter::new(SortMode::Auto);

        assert_eq!(sorter.toggle("score", &columns).unwrap().sort, Some(SortState::asc("score")));
        assert_eq!(sorter.indicator("score", &columns), SortIndicator::Ascending);
        assert_eq!(sorter.toggle("score", &columns).unwrap().sort, Some(SortState::desc("score")));
        assert_eq!(sorter.indicator("score", &columns), SortIndicator::Descending);
        assert_eq!(sorter.toggle("score", &columns).unwrap().sort, None);
        assert_eq!(sorter.indicator("score", &columns), SortIndicator::Unsorted);
    }

    #[test]
    fn test_unsortable_and_unknown_columns_are_ignored() {
        let columns = columns();
        let mut sorter = Sorter::new(SortMode::Auto);
        assert!(sorter.toggle("name", &columns).is_none());
        assert!(sorter.toggle("missing", &columns).is_none());

        assert!(sorter.set(Some(SortState::asc("missing")), &columns).is_none());
        assert!(sorter.state().is_none());
    }

    #[test]
    fn test_stable_sort_keeps_ties_in_order() {
        let columns = columns();
        let rows = [
            Row { name: "a", score: 2 },
            Row { name: "b", score: 1 },
            Row { name: "c", score: 2 },
            Row { name: "d", score: 1 },
        ];
        let mut sorter = Sorter::new(SortMode::Auto);
        sorter.toggle("score", &columns);

        let mut view: Vec<&Row> = rows.iter().collect();
        sorter.sort_rows(&mut view, &columns);
        let names: Vec<_> = view.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);

        sorter.toggle("score", &columns);
        let mut view: Vec<&Row> = rows.iter().collect();
        sorter.sort_rows(&mut view, &columns);
        let names: Vec<_> = view.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_manual_mode_never_reorders_and_resets_page() {
        let columns = columns();
        let rows = [Row { name: "a", score: 2 }, Row { name: "b", score: 1 }];
        let mut sorter = Sorter::new(SortMode::Manual);

        let change = sorter.toggle("score", &columns).unwrap();
        assert!(change.reset_page);

        let mut view: Vec<&Row> = rows.iter().collect();
        sorter.sort_rows(&mut view, &columns);
        assert_eq!(view[0].name, "a");
    }

    #[test]
    fn test_sort_state_from_query() {
        let keys = QueryKeys::default();
        let query = Query::new().with("sort_by", "created_at").with("sort_dir", "DESC");
        assert_eq!(SortState::from_query(&query, &keys), Some(SortState::desc("created_at")));

        let query = Query::new().with("sort_by", "created_at");
        assert_eq!(SortState::from_query(&query, &keys), Some(SortState::asc("created_at")));

        let query = Query::new().with("sort_by", "created_at").with("sort_dir", "sideways");
        assert_eq!(SortState::from_query(&query, &keys), None);
    }

    #[test]
    fn test_change_writes_sort_keys() {
        let change = SortChange {
            sort: Some(SortState::desc("score")),
            reset_page: true,
        };
        let mut patch = QueryPatch::new();
        change.write_to(&mut patch, &QueryKeys::default(), 1);
        assert_eq!(patch.get("sort_by"), Some(&QueryValue::from("score")));
        assert_eq!(patch.get("sort_dir"), Some(&QueryValue::from("desc")));
        assert_eq!(patch.get("page"), Some(&QueryValue::Int(1)));
    }
}
