//! Retrieved chunks and their source attributions

use serde::{Deserialize, Serialize};

/// Number of characters kept in a source snippet before truncation
pub const SNIPPET_MAX_CHARS: usize = 150;

const TRUNCATION_MARKER: &str = "...";

/// A scored fragment of source text, as normalized by the retrieval adapter
#[derive(Debug, Clone, PartialEq)]
pub struct RawChunk {
    /// Chunk text
    pub text: String,

    /// Relevance score reported by the retrieval backend
    pub score: f64,

    /// Identifier of the document the chunk came from
    pub document_id: String,

    /// Display name of the document the chunk came from
    pub document_name: String,
}

/// Attribution of one retrieved chunk, shown alongside an answer
///
/// Serialized with the short field names clients already consume
/// (`id`, `name`, `score`, `snippet`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAttribution {
    /// Identifier of the source document
    #[serde(rename = "id")]
    pub document_id: String,

    /// Display name of the source document
    #[serde(rename = "name")]
    pub document_name: String,

    /// Relevance score rounded to three decimals
    #[serde(rename = "score")]
    pub relevance_score: f64,

    /// Leading excerpt of the chunk text
    pub snippet: String,
}

impl SourceAttribution {
    /// Build the attribution for a chunk
    ///
    /// # Examples
    ///
    /// ```
    /// use sideletter_domain::{RawChunk, SourceAttribution};
    ///
    /// let chunk = RawChunk {
    ///     text: "Short text".to_string(),
    ///     score: 0.91234,
    ///     document_id: "doc_1".to_string(),
    ///     document_name: "FundA".to_string(),
    /// };
    /// let source = SourceAttribution::from_chunk(&chunk);
    /// assert_eq!(source.relevance_score, 0.912);
    /// assert_eq!(source.snippet, "Short text");
    /// ```
    pub fn from_chunk(chunk: &RawChunk) -> Self {
        Self {
            document_id: chunk.document_id.clone(),
            document_name: chunk.document_name.clone(),
            relevance_score: round_score(chunk.score),
            snippet: snippet(&chunk.text),
        }
    }
}

/// Round a relevance score to three decimal places
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// First [`SNIPPET_MAX_CHARS`] characters of `text`, with `...` appended when cut
pub fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
