//! Reference host: the canonical applied query and the fetch contract.
//!
//! [`QueryState`] owns the flat query that every fetch is built from. Filter
//! staging writes into it through [`FilterHost`]; the grid's sort and page
//! intents are recorded with [`QueryState::set_sort`] and
//! [`QueryState::navigate`]. Each change bumps a generation counter so a host
//! can drop responses to requests that are no longer current.

use serde::Deserialize;
use serde::Serialize;

use crate::config::GridConfig;
use crate::filter::FilterHost;
use crate::grid::PageChange;
use crate::grid::PaginationState;
use crate::grid::SortChange;
use crate::grid::SortState;
use crate::model::Query;
use crate::model::QueryPatch;
use crate::model::QueryValue;

/// Holds the applied query for one list view.
#[derive(Debug, Clone)]
pub struct QueryState {
    config: GridConfig,
    query: Query,
    generation: u64,
}

impl QueryState {
    /// Creates a query at the first page with the configured page size.
    pub fn new(config: &GridConfig) -> Self {
        Self {
            query: Self::defaults(config),
            config: config.clone(),
            generation: 0,
        }
    }

    /// Seeds a key before the first fetch (builder form). Does not bump the
    /// generation.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.set(key, value);
        self
    }

    fn defaults(config: &GridConfig) -> Query {
        Query::new()
            .with(&config.keys.page, config.first_page)
            .with(&config.keys.page_size, config.page_size)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Counter bumped on every change to the query.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if a request issued at `generation` still matches the query.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// 0-based page index read from the query.
    pub fn page_index(&self) -> usize {
        let page = self
            .query
            .get(&self.config.keys.page)
            .and_then(QueryValue::as_int)
            .and_then(|page| usize::try_from(page).ok())
            .unwrap_or(self.config.first_page);
        page.saturating_sub(self.config.first_page)
    }

    /// Page size read from the query, falling back to the configured size.
    pub fn page_size(&self) -> usize {
        self.query
            .get(&self.config.keys.page_size)
            .and_then(QueryValue::as_int)
            .and_then(|size| usize::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(self.config.page_size)
    }

    /// Sort read from the query.
    pub fn sort(&self) -> Option<SortState> {
        SortState::from_query(&self.query, &self.config.keys)
    }

    /// Records a page intent from the grid.
    pub fn navigate(&mut self, change: &PageChange) {
        let mut patch = QueryPatch::new();
        change.write_to(&mut patch, &self.config.keys, self.config.first_page);
        self.update(&patch);
    }

    /// Records a sort intent from the grid.
    pub fn set_sort(&mut self, change: &SortChange) {
        let mut patch = QueryPatch::new();
        change.write_to(&mut patch, &self.config.keys, self.config.first_page);
        self.update(&patch);
    }

    /// Changes one key outside the filter panel, e.g. from a deep link.
    ///
    /// Filter staging does not see this until it is reconciled.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let patch = QueryPatch::new().with(key, value);
        self.update(&patch);
    }

    /// Drops every filter and sort key and returns to the first page at the
    /// configured page size.
    pub fn restore_defaults(&mut self) {
        log::debug!("[host] restoring default query");
        self.query = Self::defaults(&self.config);
        self.generation += 1;
    }

    /// Builds the request for the current query.
    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest::from_query(&self.query, &self.config)
    }

    fn update(&mut self, patch: &QueryPatch) {
        if patch.is_empty() {
            return;
        }
        self.query.merge(patch);
        self.generation += 1;
        log::debug!("[host] query updated (generation {})", self.generation);
    }

    /// Merges a filter patch and goes back to the first page as one update.
    fn merge_filters(&mut self, patch: &QueryPatch) {
        let mut patch = patch.clone();
        patch.set(&self.config.keys.page, self.config.first_page);
        self.update(&patch);
    }
}

impl FilterHost for QueryState {
    fn on_apply(&mut self, patch: &QueryPatch) {
        self.merge_filters(patch);
    }

    fn on_reset(&mut self, patch: &QueryPatch) {
        self.merge_filters(patch);
        for (key, value) in patch.iter() {
            if value.is_null() {
                self.query.remove(key);
            }
        }
    }
}

/// What the remote list endpoint is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Page number in the remote API's numbering.
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortState>,
    /// Every non-paging, non-sorting key that is set.
    pub filters: Query,
}

impl FetchRequest {
    /// Splits a query into paging, sorting and filter parts.
    pub fn from_query(query: &Query, config: &GridConfig) -> Self {
        let keys = &config.keys;
        let read = |key: &str, fallback: usize| {
            query
                .get(key)
                .and_then(QueryValue::as_int)
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(fallback)
        };
        let filters = query
            .iter()
            .filter(|(key, value)| !keys.is_reserved(key) && value.is_truthy())
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        Self {
            page: read(&keys.page, config.first_page).max(config.first_page),
            page_size: read(&keys.page_size, config.page_size).max(1),
            sort: SortState::from_query(query, keys),
            filters,
        }
    }

    /// 0-based page index, given the API's first page number.
    pub fn page_index(&self, first_page: usize) -> usize {
        self.page.saturating_sub(first_page)
    }

    /// Page state of the response to this request, for
    /// [`DataGrid::set_page_data`](crate::grid::DataGrid::set_page_data).
    pub fn page_state(&self, total: usize, first_page: usize) -> PaginationState {
        PaginationState::from_total(self.page_index(first_page), self.page_size, total)
    }

    /// Encodes the request as a URL query string.
    pub fn to_query_string(&self, config: &GridConfig) -> String {
        let keys = &config.keys;
        let mut query = self
            .filters
            .clone()
            .with(&keys.page, self.page)
            .with(&keys.page_size, self.page_size);
        if let Some(sort) = &self.sort {
            query.set(&keys.sort_by, sort.column_id.as_str());
            query.set(&keys.sort_dir, sort.direction.as_str());
        }
        query.to_query_string()
    }
}

/// One page of rows returned by the remote list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse<T> {
    pub data: Vec<T>,
    /// Row count across all pages.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterKind;
    use crate::filter::FilterSchema;
    use crate::filter::FilterStaging;
    use crate::filter::FilterValue;
    use crate::grid::SortDirection;

    #[test]
    fn test_defaults() {
        let state = QueryState::new(&GridConfig::default());
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.query().to_query_string(), "page=1&page_size=20");
    }

    #[test]
    fn test_apply_resets_page_in_one_update() {
        let mut state = QueryState::new(&GridConfig::default());
        state.navigate(&PageChange { page_index: 3, page_size: 20 });
        assert_eq!(state.page_index(), 3);
        let before = state.generation();

        let schema = FilterSchema::new().field("status", FilterKind::SingleSelect);
        let mut staging = FilterStaging::new(state.query(), schema).unwrap();
        staging.set("status", FilterValue::choice("new")).unwrap();
        staging.apply(&mut state);

        assert_eq!(state.generation(), before + 1);
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.query().get("status"), Some(&QueryValue::from("new")));
        assert!(!state.is_current(before));
    }

    #[test]
    fn test_reset_clears_filter_keys() {
        let schema = FilterSchema::new().field("status", FilterKind::SingleSelect);
        let mut state = QueryState::new(&GridConfig::default()).with("status", "new");
        let mut staging = FilterStaging::new(state.query(), schema).unwrap();

        staging.reset(&mut state);

        assert!(!state.query().contains_key("status"));
        assert_eq!(state.query().to_query_string(), "page=1&page_size=20");
    }

    #[test]
    fn test_sort_change_recorded() {
        let mut state = QueryState::new(&GridConfig::default());
        state.navigate(&PageChange { page_index: 2, page_size: 50 });
        state.set_sort(&SortChange {
            sort: Some(SortState::desc("created_at")),
            reset_page: true,
        });

        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), 50);
        assert_eq!(state.sort().map(|s| s.direction), Some(SortDirection::Desc));
    }

    #[test]
    fn test_restore_defaults() {
        let mut state = QueryState::new(&GridConfig::default()).with("q", "jane");
        state.navigate(&PageChange { page_index: 4, page_size: 10 });
        state.restore_defaults();
        assert_eq!(state.query(), QueryState::new(&GridConfig::default()).query());
    }

    #[test]
    fn test_fetch_request_splits_query() {
        let config = GridConfig::default().with_first_page(0);
        let mut state = QueryState::new(&config)
            .with("status", "new")
            .with("in_group", "")
            .with("tags", vec!["a".to_string(), "b c".to_string()]);
        state.set_sort(&SortChange {
            sort: Some(SortState::asc("name")),
            reset_page: true,
        });

        let request = state.fetch_request();
        assert_eq!(request.page, 0);
        assert_eq!(request.page_index(config.first_page), 0);
        assert_eq!(request.sort, Some(SortState::asc("name")));
        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.page_state(45, config.first_page).page_count, 3);
        assert_eq!(
            request.to_query_string(&config),
            "page=0&page_size=20&sort_by=name&sort_dir=asc&status=new&tags=a%2Cb%20c"
        );
    }

    #[test]
    fn test_fetch_response_from_json() {
        let response: FetchResponse<String> = serde_json::from_str(r#"{ "data": ["a", "b"], "total": 12 }"#).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.total, 12);
    }
}
