use gridhmm_core::{ConfigError, FilterError};
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for generation, file IO, and reporting.
pub enum SimError {
    #[error("failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("trace has {snapshots} snapshots but scenario has {positions} positions")]
    TraceLength { snapshots: usize, positions: usize },
}

impl SimError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        SimError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
