//! Configuration for the Orchestrator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the query pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Number of chunks requested from retrieval
    pub top_k: usize,

    /// Whether retrieval should rerank its candidates
    pub rerank: bool,

    /// Upper bound on each backend call in milliseconds (0 disables)
    pub backend_timeout_ms: u64,
}

impl OrchestratorConfig {
    /// Per-call backend timeout, if any
    pub fn backend_timeout(&self) -> Option<Duration> {
        match self.backend_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            top_k: 15,
            rerank: true,
            backend_timeout_ms: 120_000,
        }
    }
}
