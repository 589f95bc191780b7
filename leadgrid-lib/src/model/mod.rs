//! Flat query model shared by the grid, the filter staging controller and the host.
//!
//! - [`QueryValue`] - A dynamic value stored under one flat query key
//! - [`Query`] - The host's applied query (single source of truth for a fetch)
//! - [`QueryPatch`] - A set of key updates produced by a controller

mod query;
mod value;

pub use query::Query;
pub use query::QueryPatch;
pub use value::QueryValue;
