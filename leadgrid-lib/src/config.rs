//! Grid configuration

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::grid::SelectionPolicy;

/// Names of the query keys the grid reads and writes for paging and sorting.
///
/// Everything else in the applied query is treated as a filter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryKeys {
    /// Page number key. Default: `page`
    pub page: String,
    /// Page size key. Default: `page_size`
    pub page_size: String,
    /// Sort column key. Default: `sort_by`
    pub sort_by: String,
    /// Sort direction key. Default: `sort_dir`
    pub sort_dir: String,
}

impl Default for QueryKeys {
    fn default() -> Self {
        Self {
            page: "page".into(),
            page_size: "page_size".into(),
            sort_by: "sort_by".into(),
            sort_dir: "sort_dir".into(),
        }
    }
}

impl QueryKeys {
    /// Returns the paging and sorting keys, in that order.
    pub fn reserved(&self) -> [&str; 4] {
        [
            self.page.as_str(),
            self.page_size.as_str(),
            self.sort_by.as_str(),
            self.sort_dir.as_str(),
        ]
    }

    /// Returns `true` if the key is a paging or sorting key.
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved().contains(&key)
    }
}

/// Configuration for a grid instance and the host query it drives.
///
/// # Example
///
/// ```
/// use leadgrid_lib::config::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(50)
///     .with_window_delta(1);
/// assert!(config.validate().is_ok());
///
/// let config = GridConfig::from_json(r#"{ "page_size": 10 }"#).unwrap();
/// assert_eq!(config.page_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Initial page size.
    ///
    /// Default: 20
    pub page_size: usize,

    /// Page sizes offered to the user. Empty means any size is allowed.
    ///
    /// Default: 10, 20, 50, 100
    pub page_size_options: Vec<usize>,

    /// Number of pages shown on each side of the current page in the page window.
    ///
    /// Default: 2
    pub window_delta: usize,

    /// Page number the remote API uses for the first page.
    ///
    /// Default: 1
    pub first_page: usize,

    /// Paging and sorting key names.
    pub keys: QueryKeys,

    /// What happens to selected ids that leave the loaded rows.
    ///
    /// Default: prune on page change
    pub selection_policy: SelectionPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            page_size_options: vec![10, 20, 50, 100],
            window_delta: 2,
            first_page: 1,
            keys: QueryKeys::default(),
            selection_policy: SelectionPolicy::default(),
        }
    }
}

impl GridConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the offered page sizes.
    pub fn with_page_size_options(mut self, options: impl Into<Vec<usize>>) -> Self {
        self.page_size_options = options.into();
        self
    }

    /// Sets the page window delta.
    pub fn with_window_delta(mut self, delta: usize) -> Self {
        self.window_delta = delta;
        self
    }

    /// Sets the page number of the first page in the remote API.
    pub fn with_first_page(mut self, first_page: usize) -> Self {
        self.first_page = first_page;
        self
    }

    /// Sets the paging and sorting key names.
    pub fn with_keys(mut self, keys: QueryKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Sets the selection policy.
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Checks the config for values no grid can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.is_empty() && !self.page_size_options.contains(&self.page_size) {
            return Err(ConfigError::PageSizeNotOffered {
                page_size: self.page_size,
                options: self.page_size_options.clone(),
            });
        }
        let reserved = self.keys.reserved();
        for (i, key) in reserved.iter().enumerate() {
            if reserved[i + 1..].contains(key) {
                return Err(ConfigError::DuplicateKey(key.to_string()));
            }
        }
        Ok(())
    }

    /// Returns `true` if the user may switch to this page size.
    pub fn allows_page_size(&self, page_size: usize) -> bool {
        page_size > 0 && (self.page_size_options.is_empty() || self.page_size_options.contains(&page_size))
    }
}
