//! Errors surfaced by backend adapters

use thiserror::Error;

/// Failure of a retrieval or generation backend call
///
/// Adapters translate every transport, status, and decoding problem into one
/// of these variants so the orchestrator never sees an HTTP client error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The adapter was built without the credential it needs
    #[error("{0} environment variable is not set")]
    MissingCredentials(String),

    /// The call could not be completed (network, status, decoding, timeout)
    #[error("{backend} unavailable: {message}")]
    Unavailable {
        /// Backend name, e.g. "retrieval" or "generation"
        backend: String,
        /// Human-readable cause
        message: String,
    },

    /// The call succeeded but produced no text content
    #[error("{0} returned no content")]
    EmptyContent(String),
}

impl BackendError {
    /// Shorthand for an [`BackendError::Unavailable`] error
    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Unavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }
}
