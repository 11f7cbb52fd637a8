//! Error types for the promptforge binary

use promptforge_engine::EngineError;
use promptforge_oracle::OracleError;
use std::path::PathBuf;

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed file {path}: {reason}")]
    Seeds { path: PathBuf, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
