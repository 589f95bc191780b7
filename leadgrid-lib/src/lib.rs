//! Data grid and filter staging controllers
//!
//! Headless state for list views backed by a paginated, sortable, filterable
//! query: the grid (pagination, sorting, selection, bulk actions) and the
//! filter panel (staged drafts, apply/reset, active filter count). Rendering
//! and fetching stay with the host.

pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod host;
pub mod model;

/// Commonly used types.
pub mod prelude {
    pub use crate::config::GridConfig;
    pub use crate::config::QueryKeys;
    pub use crate::filter::ActiveFilterCounter;
    pub use crate::filter::FilterHost;
    pub use crate::filter::FilterKind;
    pub use crate::filter::FilterSchema;
    pub use crate::filter::FilterStaging;
    pub use crate::filter::FilterValue;
    pub use crate::grid::BulkActions;
    pub use crate::grid::Column;
    pub use crate::grid::Columns;
    pub use crate::grid::DataGrid;
    pub use crate::grid::GridRow;
    pub use crate::grid::SelectionPolicy;
    pub use crate::host::FetchRequest;
    pub use crate::host::FetchResponse;
    pub use crate::host::QueryState;
    pub use crate::model::Query;
    pub use crate::model::QueryPatch;
    pub use crate::model::QueryValue;
}
