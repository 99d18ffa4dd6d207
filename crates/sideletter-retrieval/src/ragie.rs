//! Ragie Retriever Implementation
//!
//! Queries the Ragie retrievals API for chunks relevant to a question.
//!
//! # Features
//!
//! - Async HTTP communication with the retrievals endpoint
//! - Bearer-token authentication from `RAGIE_API_KEY`
//! - Timeout handling (a timed-out call is reported as unavailable)
//! - Response normalization across both known response shapes
//!
//! Calls are never retried here; retry policy belongs to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use sideletter_retrieval::{RagieRetriever, DEFAULT_BASE_URL};
//! use std::time::Duration;
//!
//! let retriever = RagieRetriever::from_env(DEFAULT_BASE_URL, Duration::from_secs(30))
//!     .expect("client builds");
//! ```

use crate::response::RetrievalResponse;
use async_trait::async_trait;
use serde::Serialize;
use sideletter_domain::{BackendError, RawChunk, Retriever};
use std::time::Duration;
use tracing::debug;

/// Default Ragie API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.ragie.ai";

/// Default timeout for retrieval requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "RAGIE_API_KEY";

const BACKEND: &str = "retrieval";

/// Retrieval adapter for the Ragie semantic search API
pub struct RagieRetriever {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Request body for the retrievals API
#[derive(Serialize)]
struct RetrievalRequest<'a> {
    query: &'a str,
    top_k: usize,
    rerank: bool,
}

impl RagieRetriever {
    /// Create a new retriever
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root (e.g., "https://api.ragie.ai")
    /// - `api_key`: bearer token; `None` or empty leaves the adapter unconfigured
    /// - `timeout`: per-request timeout
    ///
    /// An unconfigured retriever still constructs; every call then fails with
    /// [`BackendError::MissingCredentials`].
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BackendError::unavailable(BACKEND, format!("Failed to build client: {}", e))
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    /// Create a retriever whose key is read from `RAGIE_API_KEY`
    pub fn from_env(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        Self::new(base_url, std::env::var(API_KEY_ENV).ok(), timeout)
    }

    /// API root this retriever talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Retriever for RagieRetriever {
    async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
        rerank: bool,
    ) -> Result<Vec<RawChunk>, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::MissingCredentials(API_KEY_ENV.to_string()))?;

        let url = format!("{}/retrievals", self.base_url);
        let request_body = RetrievalRequest {
            query: question,
            top_k,
            rerank,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BackendError::unavailable(BACKEND, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::unavailable(
                BACKEND,
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        let body = response.json::<RetrievalResponse>().await.map_err(|e| {
            BackendError::unavailable(BACKEND, format!("Failed to parse response: {}", e))
        })?;

        let chunks = body.into_chunks();
        debug!("Retrieved {} chunks", chunks.len());
        Ok(chunks)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
