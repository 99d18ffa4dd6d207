//! Context assembly from retrieved chunks

use sideletter_domain::{RawChunk, SourceAttribution};

/// Labeled context block plus one attribution per chunk, in the same order
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    /// Chunks rendered as `[Source i - name]:` paragraphs
    pub context_block: String,

    /// Attributions parallel to the paragraphs
    pub sources: Vec<SourceAttribution>,
}

/// Turn rank-ordered chunks into a context block and its sources
///
/// Pure and deterministic; input order is preserved.
pub fn assemble(chunks: &[RawChunk]) -> AssembledContext {
    let context_block = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Source {} - {}]:\n{}", i + 1, chunk.document_name, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    let sources = chunks.iter().map(SourceAttribution::from_chunk).collect();

    AssembledContext {
        context_block,
        sources,
    }
}
