use thiserror::Error;

use insight_config::ConfigError;
use insight_core::CoreError;

/// Top-level failure for report refreshes and CLI commands.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Usage: {0}")]
    Usage(String),
}
