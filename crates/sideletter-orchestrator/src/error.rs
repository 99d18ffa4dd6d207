//! Error types for the Orchestrator

use sideletter_domain::BackendError;
use thiserror::Error;

/// Errors that can end an orchestration call
///
/// None of these are retried inside the pipeline; a failed call leaves the
/// interaction log untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    /// The request itself is unusable (e.g. blank question)
    #[error("{0}")]
    InvalidRequest(String),

    /// A backend is missing its credentials
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A backend call could not be completed
    #[error("{0}")]
    BackendUnavailable(String),

    /// Generation succeeded but produced no text
    #[error("{0}")]
    GenerationEmpty(String),
}

impl OrchestrationError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            OrchestrationError::InvalidRequest(_) => "invalid_request",
            OrchestrationError::Configuration(_) => "configuration_error",
            OrchestrationError::BackendUnavailable(_) => "backend_unavailable",
            OrchestrationError::GenerationEmpty(_) => "generation_empty",
        }
    }
}

impl From<BackendError> for OrchestrationError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::MissingCredentials(_) => {
                OrchestrationError::Configuration(e.to_string())
            }
            BackendError::Unavailable { .. } => {
                OrchestrationError::BackendUnavailable(e.to_string())
            }
            BackendError::EmptyContent(_) => OrchestrationError::GenerationEmpty(e.to_string()),
        }
    }
}
