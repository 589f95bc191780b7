//! Data grid controller.
//!
//! - [`DataGrid`] - Rows, columns and the view state derived from them
//! - [`Columns`] / [`GridColumn`] - Column contracts and rendering
//! - [`Sorter`] - Single-column sort with an unsorted/asc/desc cycle
//! - [`Paginator`] - Internal or external paging and the page window
//! - [`Selection`] - ID-based selection with a tri-state header
//! - [`BulkActions`] / [`RowActions`] - Action menus and dispatch

mod actions;
mod column;
mod pagination;
mod selection;
mod sort;
mod window;

pub use actions::ActionEntry;
pub use actions::ActionItem;
pub use actions::ActionList;
pub use actions::ActionOutcome;
pub use actions::BulkAction;
pub use actions::BulkActions;
pub use actions::ConfirmOptions;
pub use actions::Dispatch;
pub use actions::PendingDispatch;
pub use actions::RowAction;
pub use actions::RowActions;
pub use column::Alignment;
pub use column::Cell;
pub use column::CellValue;
pub use column::Column;
pub use column::ColumnMeta;
pub use column::Columns;
pub use column::GridColumn;
pub use column::GridRow;
pub use pagination::PageChange;
pub use pagination::PaginationMode;
pub use pagination::PaginationState;
pub use pagination::Paginator;
pub use selection::HeaderState;
pub use selection::Selection;
pub use selection::SelectionPolicy;
pub use sort::SortChange;
pub use sort::SortDirection;
pub use sort::SortIndicator;
pub use sort::SortMode;
pub use sort::SortState;
pub use sort::Sorter;
pub use window::PageItem;
pub use window::page_window;

use crate::config::GridConfig;

/// What the grid body should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStatus {
    /// A fetch is in flight.
    Loading,
    /// Nothing to show.
    Empty,
    /// Rows are available.
    Ready,
}

/// A tabular view over typed rows.
///
/// Internally paged grids own the whole dataset and derive the visible page
/// by searching, sorting and slicing it. Externally paged grids hold one page
/// fetched by the host and only report navigation intents.
pub struct DataGrid<T: GridRow> {
    columns: Columns<T>,
    config: GridConfig,
    rows: Vec<T>,
    sorter: Sorter,
    paginator: Paginator,
    selection: Selection,
    search: String,
    loading: bool,
}

impl<T: GridRow> DataGrid<T> {
    /// Creates a grid that owns its full dataset. Sorting is automatic.
    pub fn internal(columns: Columns<T>, config: &GridConfig) -> Self {
        Self::new(columns, config, SortMode::Auto, Paginator::internal(config.page_size))
    }

    /// Creates a grid fed one page at a time. Sorting is manual.
    pub fn external(columns: Columns<T>, config: &GridConfig) -> Self {
        Self::new(columns, config, SortMode::Manual, Paginator::external(config.page_size))
    }

    fn new(columns: Columns<T>, config: &GridConfig, sort_mode: SortMode, paginator: Paginator) -> Self {
        Self {
            columns,
            config: config.clone(),
            rows: Vec::new(),
            sorter: Sorter::new(sort_mode),
            paginator,
            selection: Selection::new(),
            search: String::new(),
            loading: false,
        }
    }

    /// Overrides the sort mode chosen by the constructor.
    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.sorter = Sorter::new(mode);
        self
    }

    pub fn columns(&self) -> &Columns<T> {
        &self.columns
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// All loaded rows, unfiltered and unsorted.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn status(&self) -> GridStatus {
        if self.loading {
            GridStatus::Loading
        } else if self.visible_rows().is_empty() {
            GridStatus::Empty
        } else {
            GridStatus::Ready
        }
    }

    /// Replaces the full dataset of an internally paged grid.
    ///
    /// On an externally paged grid this is treated as a single page holding
    /// every row.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        if self.paginator.mode() == PaginationMode::External {
            log::warn!("[grid] set_rows on an externally paged grid, treating it as one page");
            let state = PaginationState::from_total(0, rows.len().max(1), rows.len());
            self.set_page_data(rows, state);
            return;
        }
        self.rows = rows;
        self.loading = false;
        self.refresh_row_count();
        self.apply_selection_policy();
        log::debug!("[grid] loaded {} rows", self.rows.len());
    }

    /// Takes one fetched page of an externally paged grid, together with
    /// the page state the host fetched it with.
    ///
    /// The page size in `state` replaces the grid's own, so a size change
    /// only takes effect once the host has reloaded with it.
    pub fn set_page_data(&mut self, rows: Vec<T>, state: PaginationState) {
        self.rows = rows;
        self.loading = false;
        self.paginator.sync(state);
        self.apply_selection_policy();
        log::debug!(
            "[grid] page {} of {} ({} rows, {} total)",
            self.paginator.page_index() + 1,
            self.paginator.page_count(),
            self.rows.len(),
            self.paginator.total_elements()
        );
    }

    fn apply_selection_policy(&mut self) {
        if self.config.selection_policy != SelectionPolicy::PruneOnPageChange {
            return;
        }
        let loaded: Vec<String> = self.rows.iter().map(GridRow::id).collect();
        let removed = self.selection.retain_only(&loaded);
        if !removed.is_empty() {
            log::debug!("[grid] pruned {} selected ids no longer loaded", removed.len());
        }
    }

    fn refresh_row_count(&mut self) {
        if self.paginator.mode() == PaginationMode::Internal {
            let count = self.filtered_rows().len();
            self.paginator.set_row_count(count);
        }
    }

    /// Rows that pass the search, in sort order, across all pages.
    fn filtered_rows(&self) -> Vec<&T> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&T> = self
            .rows
            .iter()
            .filter(|row| needle.is_empty() || self.columns.row_matches(row, &needle))
            .collect();
        self.sorter.sort_rows(&mut rows, &self.columns);
        rows
    }

    /// The rows of the current page, in display order.
    pub fn visible_rows(&self) -> Vec<&T> {
        let rows = self.filtered_rows();
        self.paginator.slice(&rows).to_vec()
    }

    /// Ids of the rows on the current page.
    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_rows().into_iter().map(GridRow::id).collect()
    }

    /// Rendered cells of the current page, one `Vec` per row.
    pub fn render_visible(&self) -> Vec<Vec<Cell>> {
        self.visible_rows()
            .into_iter()
            .map(|row| self.columns.render_row(row))
            .collect()
    }

    // Sorting

    /// Header click on a column.
    ///
    /// Returns the change for the host to record, or `None` when the column
    /// is not sortable. Manual sorting on an internally paged grid also goes
    /// back to the first page.
    pub fn header_click(&mut self, column_id: &str) -> Option<SortChange> {
        let change = self.sorter.toggle(column_id, &self.columns)?;
        if change.reset_page && self.paginator.mode() == PaginationMode::Internal {
            self.paginator.first_page();
        }
        Some(change)
    }

    /// Seeds the sort, typically from the applied query.
    pub fn set_sort(&mut self, sort: Option<SortState>) -> Option<SortChange> {
        self.sorter.set(sort, &self.columns)
    }

    /// The active sort, if it names a sortable column.
    pub fn sort(&self) -> Option<&SortState> {
        self.sorter.effective(&self.columns)
    }

    pub fn sort_indicator(&self, column_id: &str) -> SortIndicator {
        self.sorter.indicator(column_id, &self.columns)
    }

    // Search

    /// Sets the client-side search text and goes back to the first page.
    ///
    /// Only internally paged grids search locally; an externally paged grid
    /// ignores the call since its host owns filtering. Returns `true` if
    /// the search changed.
    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        if self.paginator.mode() == PaginationMode::External {
            log::warn!("[grid] client search ignored on an externally paged grid");
            return false;
        }
        let search = search.into();
        if search == self.search {
            return false;
        }
        self.search = search;
        self.paginator.first_page();
        self.refresh_row_count();
        true
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    // Selection

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Flips one row. Returns `true` if it is selected afterwards.
    pub fn toggle_row(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Header checkbox click over the visible page.
    /// Returns (added, removed) IDs.
    pub fn toggle_all_visible(&mut self) -> (Vec<String>, Vec<String>) {
        let visible = self.visible_ids();
        self.selection.toggle_visible(&visible)
    }

    pub fn header_state(&self) -> HeaderState {
        self.selection.header_state(&self.visible_ids())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.selected()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected ids that are not on the visible page.
    pub fn hidden_selected_count(&self) -> usize {
        self.selection.hidden_count(&self.visible_ids())
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear_selection(&mut self) -> Vec<String> {
        self.selection.clear()
    }

    // Pagination

    pub fn pagination(&self) -> &Paginator {
        &self.paginator
    }

    pub fn set_page_index(&mut self, page_index: usize) -> Option<PageChange> {
        self.paginator.set_page_index(page_index)
    }

    /// Changes the page size, going back to the first page.
    ///
    /// Sizes outside the configured options are refused.
    pub fn set_page_size(&mut self, page_size: usize) -> Option<PageChange> {
        if !self.config.allows_page_size(page_size) {
            log::warn!("[grid] page size {} is not offered", page_size);
            return None;
        }
        self.paginator.set_page_size(page_size)
    }

    pub fn next_page(&mut self) -> Option<PageChange> {
        self.paginator.next_page()
    }

    pub fn previous_page(&mut self) -> Option<PageChange> {
        self.paginator.previous_page()
    }

    /// Page buttons around the current page, empty with a single page.
    pub fn page_window(&self) -> Vec<PageItem> {
        self.paginator.window(self.config.window_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Prospect {
        id: u32,
        name: &'static str,
        score: i64,
    }

    impl GridRow for Prospect {
        fn id(&self) -> String {
            self.id.to_string()
        }
    }

    fn columns() -> Columns<Prospect> {
        Columns::new()
            .with(Column::new("name", "Name", |p: &Prospect| p.name.into()).sortable().filterable())
            .with(Column::new("score", "Score", |p: &Prospect| p.score.into()).sortable())
    }

    fn prospects(count: u32) -> Vec<Prospect> {
        const NAMES: [&str; 4] = ["Ada", "bob", "Cleo", "dan"];
        (0..count)
            .map(|i| Prospect {
                id: i,
                name: NAMES[i as usize % NAMES.len()],
                score: i64::from(count - i),
            })
            .collect()
    }

    fn config(page_size: usize) -> GridConfig {
        GridConfig::default()
            .with_page_size(page_size)
            .with_page_size_options(Vec::<usize>::new())
    }

    #[test]
    fn test_internal_grid_sorts_then_slices() {
        let mut grid = DataGrid::internal(columns(), &config(3));
        grid.set_rows(prospects(7));
        assert_eq!(grid.pagination().page_count(), 3);
        assert_eq!(grid.visible_ids(), vec!["0", "1", "2"]);

        let change = grid.header_click("score").unwrap();
        assert!(!change.reset_page);
        assert_eq!(grid.sort_indicator("score"), SortIndicator::Ascending);
        // scores are 7..1, ascending puts the last rows first
        assert_eq!(grid.visible_ids(), vec!["6", "5", "4"]);

        grid.next_page();
        assert_eq!(grid.visible_ids(), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_header_click_on_unsortable_column_is_ignored() {
        let columns = Columns::new().with(Column::new("name", "Name", |p: &Prospect| p.name.into()));
        let mut grid = DataGrid::internal(columns, &config(3));
        assert!(grid.header_click("name").is_none());
        assert!(grid.header_click("missing").is_none());
        assert_eq!(grid.sort(), None);
    }

    #[test]
    fn test_manual_sort_on_internal_grid_resets_page() {
        let mut grid = DataGrid::internal(columns(), &config(2)).with_sort_mode(SortMode::Manual);
        grid.set_rows(prospects(6));
        grid.set_page_index(2);

        let change = grid.header_click("name").unwrap();
        assert!(change.reset_page);
        assert_eq!(grid.pagination().page_index(), 0);
        // manual mode leaves row order alone
        assert_eq!(grid.visible_ids(), vec!["0", "1"]);
    }

    #[test]
    fn test_search_filters_and_resets_page() {
        let mut grid = DataGrid::internal(columns(), &config(2));
        grid.set_rows(prospects(8));
        grid.set_page_index(3);

        assert!(grid.set_search("CLEO"));
        assert_eq!(grid.pagination().page_index(), 0);
        assert_eq!(grid.pagination().total_elements(), 2);
        assert_eq!(grid.visible_ids(), vec!["2", "6"]);
        assert!(!grid.set_search("CLEO"));

        grid.set_search("nobody");
        assert_eq!(grid.status(), GridStatus::Empty);
        assert!(grid.page_window().is_empty());
    }

    #[test]
    fn test_status() {
        let mut grid = DataGrid::internal(columns(), &config(2));
        assert_eq!(grid.status(), GridStatus::Empty);
        grid.set_loading(true);
        assert_eq!(grid.status(), GridStatus::Loading);
        grid.set_rows(prospects(1));
        assert_eq!(grid.status(), GridStatus::Ready);
    }

    #[test]
    fn test_external_grid_reports_intents() {
        let mut grid = DataGrid::external(columns(), &config(2));
        grid.set_page_data(prospects(2), PaginationState::from_total(0, 2, 10));
        assert_eq!(grid.pagination().page_count(), 5);

        let change = grid.next_page().unwrap();
        assert_eq!(change, PageChange { page_index: 1, page_size: 2 });
        // the host has not fetched yet
        assert_eq!(grid.pagination().page_index(), 0);

        let sort = grid.header_click("score").unwrap();
        assert!(sort.reset_page);
        // rows are shown as delivered
        assert_eq!(grid.visible_ids(), vec!["0", "1"]);
    }

    #[test]
    fn test_selection_pruned_on_page_load() {
        let mut grid = DataGrid::external(columns(), &config(2));
        grid.set_page_data(prospects(2), PaginationState::from_total(0, 2, 4));
        grid.toggle_all_visible();
        assert_eq!(grid.header_state(), HeaderState::Checked);

        let next = vec![Prospect { id: 9, name: "Eve", score: 1 }, Prospect { id: 1, name: "bob", score: 2 }];
        grid.set_page_data(next, PaginationState::from_total(1, 2, 4));
        assert_eq!(grid.selected_ids(), vec!["1"]);
        assert_eq!(grid.header_state(), HeaderState::Indeterminate);
        assert_eq!(grid.hidden_selected_count(), 0);
    }

    #[test]
    fn test_selection_accumulates_when_configured() {
        let config = config(2).with_selection_policy(SelectionPolicy::Accumulate);
        let mut grid = DataGrid::external(columns(), &config);
        grid.set_page_data(prospects(2), PaginationState::from_total(0, 2, 4));
        grid.toggle_row("0");

        grid.set_page_data(
            vec![Prospect { id: 2, name: "Cleo", score: 2 }],
            PaginationState::from_total(1, 2, 4),
        );
        assert_eq!(grid.selected_count(), 1);
        assert_eq!(grid.hidden_selected_count(), 1);
        assert_eq!(grid.header_state(), HeaderState::Unchecked);
    }

    #[test]
    fn test_external_page_size_follows_reload() {
        let config = GridConfig::default().with_page_size(10);
        let mut grid = DataGrid::external(columns(), &config);
        grid.set_page_data(prospects(10), PaginationState::from_total(0, 10, 100));
        assert_eq!(grid.pagination().page_count(), 10);

        let change = grid.set_page_size(20).unwrap();
        // nothing moves until the host reloads
        assert_eq!(grid.pagination().page_size(), 10);

        grid.set_page_data(
            prospects(20),
            PaginationState::from_total(change.page_index, change.page_size, 100),
        );
        assert_eq!(grid.pagination().page_size(), 20);
        assert_eq!(grid.pagination().page_count(), 5);
        assert_eq!(grid.page_window().len(), 5);
    }

    #[test]
    fn test_page_size_must_be_offered() {
        let config = GridConfig::default().with_page_size(10);
        let mut grid = DataGrid::internal(columns(), &config);
        grid.set_rows(prospects(45));
        grid.set_page_index(2);

        assert!(grid.set_page_size(15).is_none());
        assert_eq!(grid.set_page_size(20), Some(PageChange { page_index: 0, page_size: 20 }));
        assert_eq!(grid.pagination().page_count(), 3);
    }

    #[test]
    fn test_render_visible_uses_column_alignment() {
        let columns = Columns::new()
            .with(Column::new("score", "Score", |p: &Prospect| p.score.into()).align(Alignment::Right));
        let mut grid = DataGrid::internal(columns, &config(5));
        grid.set_rows(prospects(1));
        assert_eq!(grid.render_visible(), vec![vec![Cell::new("1", Alignment::Right)]]);
    }
}
