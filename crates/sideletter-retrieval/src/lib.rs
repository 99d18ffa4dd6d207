//! Side Letter Retrieval Layer
//!
//! Implementations of the `Retriever` trait from `sideletter-domain`.
//!
//! # Providers
//!
//! - `MockRetriever`: Deterministic mock for testing
//! - `RagieRetriever`: Ragie retrievals API integration
//!
//! # Examples
//!
//! ```
//! use sideletter_retrieval::MockRetriever;
//! use sideletter_domain::{RawChunk, Retriever};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let retriever = MockRetriever::new(vec![RawChunk {
//!     text: "Fund A backs defense startups.".to_string(),
//!     score: 0.91,
//!     document_id: "doc_a".to_string(),
//!     document_name: "FundA".to_string(),
//! }]);
//! let chunks = retriever.retrieve("Who invests in defense tech?", 15, true).await.unwrap();
//! assert_eq!(chunks.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

pub mod ragie;
mod response;

use async_trait::async_trait;
use parking_lot::Mutex;
use sideletter_domain::{BackendError, RawChunk, Retriever};
use std::sync::Arc;

pub use ragie::{RagieRetriever, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// A retrieval call observed by [`MockRetriever`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRetrieval {
    /// Question passed to the retriever
    pub question: String,
    /// Requested chunk count
    pub top_k: usize,
    /// Whether reranking was requested
    pub rerank: bool,
}

/// Mock retriever for deterministic testing
///
/// Returns pre-configured chunks (or a pre-configured error) without any
/// network access, and records every call it receives. Clones share the same
/// call history.
#[derive(Debug, Clone, Default)]
pub struct MockRetriever {
    chunks: Vec<RawChunk>,
    error: Option<BackendError>,
    calls: Arc<Mutex<Vec<RecordedRetrieval>>>,
}

impl MockRetriever {
    /// Create a mock that returns `chunks` for every question
    pub fn new(chunks: Vec<RawChunk>) -> Self {
        Self {
            chunks,
            ..Self::default()
        }
    }

    /// Create a mock that finds nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a mock that fails every call with `error`
    pub fn failing(error: BackendError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Number of times retrieve was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedRetrieval> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
        rerank: bool,
    ) -> Result<Vec<RawChunk>, BackendError> {
        self.calls.lock().push(RecordedRetrieval {
            question: question.to_string(),
            top_k,
            rerank,
        });

        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(self.chunks.clone()),
        }
    }
}
