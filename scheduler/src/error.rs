//! Error types for loading and simulating process schedules

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Everything that can go wrong before a simulation starts.
///
/// Faults inside a running simulation are bugs, not errors, and panic instead.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Policy misconfiguration: {0}")]
    PolicyMisconfiguration(String),

    #[error("Unable to read process list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed process list, line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        SimError::InvalidInput(message.into())
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        SimError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
