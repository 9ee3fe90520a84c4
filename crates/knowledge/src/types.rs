//! Knowledge chunk types.

use serde::{Deserialize, Serialize};

/// A chunk of corpus text with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: String,

    /// Source document name (e.g., "making_music.pdf")
    pub source: String,

    /// Ordinal position within the source
    pub position: u32,

    /// Chunk text
    pub text: String,

    /// SHA-256 of the chunk text, used for change detection on re-index
    pub hash: String,

    /// Embedding vector (empty until embedded)
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// A chunk produced by the splitter, before embedding.
#[derive(Debug, Clone)]
pub struct ChunkCandidate {
    /// Ordinal position within the source
    pub position: u32,

    /// Chunk text
    pub text: String,

    /// Byte range within the source text
    pub byte_range: (usize, usize),
}

impl Chunk {
    /// Build a chunk from a splitter candidate.
    pub fn from_candidate(source: &str, candidate: ChunkCandidate) -> Self {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(candidate.text.as_bytes());
        let hash = format!("{:x}", hasher.finalize());

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.to_string(),
            position: candidate.position,
            text: candidate.text,
            hash,
            embedding: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_from_candidate() {
        let candidate = ChunkCandidate {
            position: 3,
            text: "Use a high-pass filter on the pads.".to_string(),
            byte_range: (100, 135),
        };

        let chunk = Chunk::from_candidate("guide.pdf", candidate);

        assert_eq!(chunk.source, "guide.pdf");
        assert_eq!(chunk.position, 3);
        assert!(!chunk.id.is_empty());
        assert_eq!(chunk.hash.len(), 64);
        assert!(chunk.embedding.is_empty());
    }

    #[test]
    fn test_chunk_hash_is_content_addressed() {
        let make = |text: &str| {
            Chunk::from_candidate(
                "guide.pdf",
                ChunkCandidate {
                    position: 0,
                    text: text.to_string(),
                    byte_range: (0, text.len()),
                },
            )
        };

        assert_eq!(make("same text").hash, make("same text").hash);
        assert_ne!(make("same text").hash, make("other text").hash);
    }
}
