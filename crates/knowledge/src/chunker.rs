//! Text chunking with configurable size and overlap.
//!
//! The corpus is split into fixed-size character windows; defaults (2048/200)
//! live in `mixmentor_core::config::RetrievalConfig`.

use crate::types::ChunkCandidate;

/// Chunk text into overlapping segments.
///
/// Character-based chunking with UTF-8 boundary handling. Trailing fragments
/// smaller than 10% of the chunk size are dropped.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<ChunkCandidate> {
    if text.is_empty() || chunk_size == 0 {
        return vec![];
    }

    let mut chunks = Vec::new();
    let mut position = 0u32;
    let mut start = 0;

    while start < text.len() {
        // Find valid UTF-8 boundary for end position
        let mut end = (start + chunk_size).min(text.len());
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }

        let chunk_text = &text[start..end];

        // Skip chunks that are too small (< 10% of chunk_size)
        if chunk_text.len() < chunk_size / 10 {
            break;
        }

        chunks.push(ChunkCandidate {
            position,
            text: chunk_text.trim().to_string(),
            byte_range: (start, end),
        });

        position += 1;

        // Move forward by (chunk_size - overlap)
        let step = if chunk_size > overlap {
            chunk_size - overlap
        } else {
            chunk_size
        };

        // Find valid UTF-8 boundary for next start position
        let mut next_start = start + step;
        while next_start < text.len() && !text.is_char_boundary(next_start) {
            next_start += 1;
        }
        start = next_start;
    }

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}
