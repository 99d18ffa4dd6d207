//! Trait definitions for external backends
//!
//! These traits define the boundaries between the orchestration pipeline and
//! the network services it consumes. Implementations live in
//! `sideletter-retrieval` and `sideletter-llm`.

use crate::{BackendError, RawChunk};
use async_trait::async_trait;

/// Semantic search over the knowledge base
///
/// Implemented by the infrastructure layer (sideletter-retrieval)
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Fetch up to `top_k` chunks ranked by relevance to `question`
    ///
    /// An empty result set is `Ok(vec![])`, not an error.
    async fn retrieve(
        &self,
        question: &str,
        top_k: usize,
        rerank: bool,
    ) -> Result<Vec<RawChunk>, BackendError>;

    /// Whether the adapter holds the credentials it needs
    fn is_configured(&self) -> bool {
        true
    }
}

/// Answer synthesis from an assembled context block
///
/// Implemented by the infrastructure layer (sideletter-llm)
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Produce an answer to `question` grounded in `context_block`
    async fn generate(
        &self,
        system_prompt: &str,
        context_block: &str,
        question: &str,
    ) -> Result<String, BackendError>;

    /// Whether the adapter holds the credentials it needs
    fn is_configured(&self) -> bool {
        true
    }
}
