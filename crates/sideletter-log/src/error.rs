//! Error types for the interaction log

use sideletter_domain::InteractionId;
use thiserror::Error;

/// Errors that can occur during log operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// No retained record has this id (evicted or never issued)
    #[error("Log not found: {0}")]
    NotFound(InteractionId),

    /// Export format name not recognized
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The log must be able to hold at least one record
    #[error("Log capacity must be at least 1")]
    ZeroCapacity,

    /// Rendering an export failed
    #[error("Export serialization failed: {0}")]
    Serialization(String),
}

impl LogError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            LogError::NotFound(_) => "not_found",
            LogError::UnsupportedFormat(_) => "invalid_request",
            LogError::ZeroCapacity => "configuration_error",
            LogError::Serialization(_) => "internal_error",
        }
    }
}

impl From<serde_json::Error> for LogError {
    fn from(e: serde_json::Error) -> Self {
        LogError::Serialization(e.to_string())
    }
}
