//! Side Letter Orchestrator
//!
//! Answers questions against the knowledge base and records the results.
//!
//! # Overview
//!
//! One call to [`QueryOrchestrator::orchestrate`] walks the pipeline:
//!
//! ```text
//! Question → validate → Retriever → (no chunks: canned answer, not logged)
//!                                 → assemble context → AnswerGenerator → InteractionLog
//! ```
//!
//! Failures at any step stop the pipeline before anything is logged.
//!
//! # Example Usage
//!
//! ```
//! use sideletter_orchestrator::{QueryOrchestrator, OrchestratorConfig};
//! use sideletter_domain::RawChunk;
//! use sideletter_llm::MockGenerator;
//! use sideletter_log::InteractionLog;
//! use sideletter_retrieval::MockRetriever;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let retriever = MockRetriever::new(vec![RawChunk {
//!     text: "Fund A backs defense startups.".to_string(),
//!     score: 0.91,
//!     document_id: "doc_a".to_string(),
//!     document_name: "FundA".to_string(),
//! }]);
//! let generator = MockGenerator::new("Fund A is active in defense.");
//! let log = Arc::new(InteractionLog::default());
//!
//! let orchestrator = QueryOrchestrator::new(
//!     Arc::new(retriever),
//!     Arc::new(generator),
//!     Arc::clone(&log),
//!     "You are a research partner.",
//!     OrchestratorConfig::default(),
//! );
//!
//! let result = orchestrator.orchestrate("Who invests in defense tech?").await.unwrap();
//! assert_eq!(result.interaction_id, Some(1));
//! assert_eq!(log.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
pub mod context;
mod error;
mod orchestrator;

pub use config::OrchestratorConfig;
pub use context::{assemble, AssembledContext};
pub use error::OrchestrationError;
pub use orchestrator::{QueryOrchestrator, NO_COVERAGE_ANSWER};
