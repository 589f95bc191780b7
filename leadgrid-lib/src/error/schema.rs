//! Filter schema error types

/// Errors found while loading or validating a filter schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Two fields encode into the same flat query key.
    #[error("Query key '{key}' is claimed by both '{first}' and '{second}'")]
    KeyConflict {
        key: String,
        first: String,
        second: String,
    },

    /// A `one_of` field declares no options.
    #[error("Filter field '{field}' declares an empty option set")]
    EmptyOptions { field: String },

    /// A pair or date range field uses an empty key name.
    #[error("Filter field '{field}' has an empty query key")]
    EmptyKey { field: String },

    /// The schema document could not be parsed.
    #[error("Schema parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
