//! Filter staging.
//!
//! Bridges heterogeneous filter widgets to the flat applied query:
//!
//! - [`FilterKind`] / [`FilterValue`] - Per-field value shapes and their flat encodings
//! - [`FilterSchema`] - The static `field -> kind` map of a list view
//! - [`FilterStaging`] - Draft state with explicit apply, reset and reconcile
//! - [`ActiveFilterCounter`] - Badge count of filters in effect

mod counter;
mod kind;
mod schema;
mod staging;

pub use counter::ActiveFilterCounter;
pub use kind::DateRange;
pub use kind::FilterKind;
pub use kind::FilterValue;
pub use kind::PairValue;
pub use kind::join_csv;
pub use kind::split_csv;
pub use schema::FilterSchema;
pub use staging::FieldBinding;
pub use staging::FilterHost;
pub use staging::FilterStaging;
pub use staging::StagingState;
