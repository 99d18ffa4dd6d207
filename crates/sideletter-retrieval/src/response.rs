//! Retrieval response normalization
//!
//! The retrieval service has been observed to answer in two shapes: an
//! envelope object carrying `scored_chunks`, or a bare array of chunks. Chunks
//! likewise carry their document identity either nested under
//! `document_metadata` or flat as `document_id` / `document_name`. Everything
//! is folded into [`RawChunk`] here so nothing past this module ever sees
//! either variant.

use serde::Deserialize;
use serde_json::Value;
use sideletter_domain::RawChunk;

const UNKNOWN_DOCUMENT_ID: &str = "unknown";
const UNKNOWN_DOCUMENT_NAME: &str = "Unknown Document";

/// Top-level retrieval response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RetrievalResponse {
    /// `[ {chunk}, ... ]`
    Bare(Vec<ScoredChunk>),

    /// `{ "scored_chunks": [ {chunk}, ... ] }`
    Envelope {
        #[serde(default)]
        scored_chunks: Option<Vec<ScoredChunk>>,
    },
}

/// One chunk in either representation
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScoredChunk {
    #[serde(default)]
    text: Option<String>,

    #[serde(default)]
    score: Option<f64>,

    #[serde(default)]
    document_metadata: Option<DocumentMetadata>,

    #[serde(default)]
    document_id: Option<Value>,

    #[serde(default)]
    document_name: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentMetadata {
    #[serde(default)]
    id: Option<Value>,

    #[serde(default)]
    name: Option<Value>,
}

impl RetrievalResponse {
    /// Collapse the response into canonical chunks, preserving rank order
    pub(crate) fn into_chunks(self) -> Vec<RawChunk> {
        let chunks = match self {
            RetrievalResponse::Bare(chunks) => chunks,
            RetrievalResponse::Envelope { scored_chunks } => scored_chunks.unwrap_or_default(),
        };

        chunks.into_iter().map(ScoredChunk::into_raw).collect()
    }
}

impl ScoredChunk {
    fn into_raw(self) -> RawChunk {
        let (nested_id, nested_name) = match self.document_metadata {
            Some(meta) => (meta.id, meta.name),
            None => (None, None),
        };

        let document_id = nested_id
            .and_then(value_to_string)
            .or_else(|| self.document_id.and_then(value_to_string))
            .unwrap_or_else(|| UNKNOWN_DOCUMENT_ID.to_string());

        let document_name = nested_name
            .and_then(value_to_string)
            .or_else(|| self.document_name.and_then(value_to_string))
            .unwrap_or_else(|| UNKNOWN_DOCUMENT_NAME.to_string());

        RawChunk {
            text: self.text.unwrap_or_default(),
            score: self.score.unwrap_or(0.0),
            document_id,
            document_name,
        }
    }
}

/// Metadata values are free-form; strings pass through, scalars are rendered
fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
