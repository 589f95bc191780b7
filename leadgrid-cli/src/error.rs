//! Error types for the demo host

use leadgrid_lib::error::ActionError;
use leadgrid_lib::error::ConfigError;
use leadgrid_lib::error::FilterError;
use leadgrid_lib::error::SchemaError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Unknown log level '{0}'")]
    LogLevel(String),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

pub type Result<T> = std::result::Result<T, CliError>;
