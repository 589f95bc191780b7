//! Grid configuration error types

/// Errors found while loading or validating a [`GridConfig`](crate::config::GridConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A page size of zero was configured.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    /// The default page size is missing from the offered options.
    #[error("Page size {page_size} is not one of the offered sizes {options:?}")]
    PageSizeNotOffered {
        page_size: usize,
        options: Vec<usize>,
    },

    /// Two query roles share the same key name.
    #[error("Query key '{0}' is assigned to more than one role")]
    DuplicateKey(String),
}
