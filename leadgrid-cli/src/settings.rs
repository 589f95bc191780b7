//! Demo host settings, read from an optional JSON file.

use std::path::Path;
use std::str::FromStr;

use leadgrid_lib::config::GridConfig;
use leadgrid_lib::filter::FilterKind;
use leadgrid_lib::filter::FilterSchema;
use serde::Deserialize;
use simplelog::LevelFilter;

use crate::error::CliError;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub log_file: String,
    pub grid: GridConfig,
    /// Filter panel schema; the built-in prospect schema when absent.
    pub filters: Option<FilterSchema>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "debug".into(),
            log_file: "leadgrid-cli.log".into(),
            grid: GridConfig::default().with_page_size(10),
            filters: None,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.grid.validate()?;
        if let Some(schema) = &settings.filters {
            schema.validate()?;
        }
        Ok(settings)
    }

    pub fn level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| CliError::LogLevel(self.log_level.clone()))
    }

    pub fn schema(&self) -> FilterSchema {
        self.filters.clone().unwrap_or_else(prospect_schema)
    }
}

fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn prospect_schema() -> FilterSchema {
    FilterSchema::new()
        .field("q", FilterKind::Input)
        .field(
            "status",
            FilterKind::OneOf {
                options: options(&["new", "contacted", "qualified", "lost"]),
            },
        )
        .field(
            "in_group",
            FilterKind::OneOf {
                options: options(&["yes", "no"]),
            },
        )
        .field("tags", FilterKind::MultiCsv)
        .field(
            "company",
            FilterKind::Pair {
                value_key: "company_id".into(),
                label_key: "company_name".into(),
            },
        )
        .field(
            "created",
            FilterKind::DateRange {
                from_key: "created_from".into(),
                to_key: "created_to".into(),
            },
        )
}
