//! Side Letter Domain Layer
//!
//! Core value types and backend boundaries shared by every other crate in the
//! workspace. Infrastructure (HTTP adapters, the interaction log, the server)
//! lives elsewhere and depends on this crate, never the other way round.
//!
//! ## Key Concepts
//!
//! - **Chunk**: a scored fragment of source text returned by retrieval
//! - **Source Attribution**: the display form of a chunk (name, score, snippet)
//! - **Query Result**: the structured answer to one question
//! - **Interaction Record**: a logged question/answer exchange with its sources
//!
//! ## Architecture
//!
//! - Plain data types with serde wire formats
//! - Trait definitions for the retrieval and generation backends
//! - One shared error type for backend adapters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod interaction;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use error::BackendError;
pub use interaction::{InteractionId, InteractionRecord, NewInteraction, QueryResult};
pub use source::{RawChunk, SourceAttribution, SNIPPET_MAX_CHARS};
pub use traits::{AnswerGenerator, Retriever};
