//! Core query pipeline

use crate::config::OrchestratorConfig;
use crate::context::assemble;
use crate::error::OrchestrationError;
use sideletter_domain::{
    AnswerGenerator, BackendError, NewInteraction, QueryResult, Retriever,
};
use sideletter_log::InteractionLog;
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// Answer returned when retrieval finds nothing
pub const NO_COVERAGE_ANSWER: &str = "We don’t have strong coverage here yet. Would you like us to flag this for updated or expanded coverage?";

/// Sequences retrieval, context assembly, generation and logging
///
/// Backends are injected once at construction. The log lock is taken only for
/// the final append, never while a backend call is in flight.
pub struct QueryOrchestrator {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn AnswerGenerator>,
    log: Arc<InteractionLog>,
    system_prompt: String,
    config: OrchestratorConfig,
}

impl QueryOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn AnswerGenerator>,
        log: Arc<InteractionLog>,
        system_prompt: impl Into<String>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            retriever,
            generator,
            log,
            system_prompt: system_prompt.into(),
            config,
        }
    }

    /// The log interactions are appended to
    pub fn log(&self) -> &Arc<InteractionLog> {
        &self.log
    }

    /// Whether the retrieval backend has its credentials
    pub fn retrieval_configured(&self) -> bool {
        self.retriever.is_configured()
    }

    /// Whether the generation backend has its credentials
    pub fn generation_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Answer a question
    ///
    /// Either the interaction is fully recorded and the result carries its id,
    /// or an error is returned and the log is unchanged. A question that
    /// retrieves nothing succeeds with a canned answer and is not logged.
    pub async fn orchestrate(&self, question: &str) -> Result<QueryResult, OrchestrationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(OrchestrationError::InvalidRequest(
                "Question is required".to_string(),
            ));
        }

        info!("Received question: {}", question);

        let chunks = self
            .call_backend(
                "retrieval",
                self.retriever
                    .retrieve(question, self.config.top_k, self.config.rerank),
            )
            .await?;

        info!("Found {} relevant chunks", chunks.len());

        if chunks.is_empty() {
            return Ok(QueryResult {
                answer: NO_COVERAGE_ANSWER.to_string(),
                sources: Vec::new(),
                question: question.to_string(),
                interaction_id: None,
            });
        }

        let context = assemble(&chunks);
        debug!("Context block length: {} chars", context.context_block.len());

        let answer = self
            .call_backend(
                "generation",
                self.generator
                    .generate(&self.system_prompt, &context.context_block, question),
            )
            .await?;

        info!("Generated answer ({} chars)", answer.chars().count());

        let mut result = QueryResult {
            answer,
            sources: context.sources,
            question: question.to_string(),
            interaction_id: None,
        };

        let id = self.log.append(NewInteraction::from_result(&result));
        result.interaction_id = Some(id);

        info!("Logged interaction #{}", id);
        Ok(result)
    }

    /// Await a backend call under the configured timeout
    async fn call_backend<T>(
        &self,
        backend: &str,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, OrchestrationError> {
        let outcome = match self.config.backend_timeout() {
            Some(limit) => timeout(limit, call).await.map_err(|_| {
                OrchestrationError::from(BackendError::unavailable(
                    backend,
                    format!("timed out after {} ms", limit.as_millis()),
                ))
            })?,
            None => call.await,
        };

        outcome.map_err(OrchestrationError::from)
    }
}
