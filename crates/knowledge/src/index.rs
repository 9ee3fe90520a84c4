//! In-memory vector index with optional on-disk persistence.
//!
//! Stores chunks with their embeddings and answers top-k cosine-similarity
//! queries. A JSON snapshot can be written to and loaded from a directory
//! (`.mixmentor/index/<name>/`), so the corpus only needs embedding once.

use crate::types::Chunk;
use mixmentor_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SNAPSHOT_FILE: &str = "chunks.json";

/// Persisted snapshot format.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    source: String,
    model: String,
    created_at: chrono::DateTime<chrono::Utc>,
    chunks: Vec<Chunk>,
}

/// In-memory cosine-similarity vector index.
pub struct VectorIndex {
    source: String,
    model: String,
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Create an empty index for a source document and embedding model.
    pub fn new(source: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            model: model.into(),
            chunks: Vec::new(),
        }
    }

    /// Source document name this index was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Embedding model the stored vectors came from.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Insert a chunk with its embedding.
    pub fn upsert(&mut self, chunk: Chunk) -> AppResult<()> {
        if chunk.embedding.is_empty() {
            return Err(AppError::Knowledge(format!(
                "Chunk {} has no embedding",
                chunk.id
            )));
        }

        if let Some(existing) = self.chunks.iter_mut().find(|c| c.id == chunk.id) {
            *existing = chunk;
        } else {
            self.chunks.push(chunk);
        }

        Ok(())
    }

    /// Search for the top-k most similar chunks to the query embedding.
    ///
    /// Returns chunks ordered by descending cosine similarity.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<(Chunk, f32)> {
        let mut scored: Vec<(Chunk, f32)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let score = cosine_similarity(query_embedding, &chunk.embedding);
                (chunk.clone(), score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Write a JSON snapshot of the index into a directory.
    pub fn save(&self, dir: &Path) -> AppResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::Knowledge(format!("Failed to create index directory {:?}: {}", dir, e))
        })?;

        let snapshot = Snapshot {
            source: self.source.clone(),
            model: self.model.clone(),
            created_at: chrono::Utc::now(),
            chunks: self.chunks.clone(),
        };

        let path = dir.join(SNAPSHOT_FILE);
        let json = serde_json::to_string(&snapshot)?;
        std::fs::write(&path, json).map_err(|e| {
            AppError::Knowledge(format!("Failed to write index snapshot {:?}: {}", path, e))
        })?;

        tracing::info!(path = %path.display(), chunks = self.chunks.len(), "Persisted vector index");

        Ok(())
    }

    /// Load an index from a snapshot directory.
    pub fn load(dir: &Path) -> AppResult<Self> {
        let path = dir.join(SNAPSHOT_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Knowledge(format!(
                "Failed to read index snapshot {:?}: {}. Run 'mixmentor index' first.",
                path, e
            ))
        })?;

        let snapshot: Snapshot = serde_json::from_str(&json)?;

        tracing::info!(
            path = %path.display(),
            chunks = snapshot.chunks.len(),
            source = %snapshot.source,
            "Loaded vector index"
        );

        Ok(Self {
            source: snapshot.source,
            model: snapshot.model,
            chunks: snapshot.chunks,
        })
    }
}

/// Cosine similarity between two vectors. Mismatched or zero-length vectors
/// score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: id.to_string(),
            source: "guide.pdf".to_string(),
            position: 0,
            text: text.to_string(),
            hash: String::new(),
            embedding,
        }
    }

    #[test]
    fn test_upsert_rejects_missing_embedding() {
        let mut index = VectorIndex::new("guide.pdf", "mock");
        let result = index.upsert(chunk("a", "text", vec![]));
        assert!(result.is_err());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut index = VectorIndex::new("guide.pdf", "mock");
        index.upsert(chunk("a", "old", vec![1.0, 0.0])).unwrap();
        index.upsert(chunk("a", "new", vec![0.0, 1.0])).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let mut index = VectorIndex::new("guide.pdf", "mock");
        index.upsert(chunk("a", "exact", vec![1.0, 0.0])).unwrap();
        index.upsert(chunk("b", "orthogonal", vec![0.0, 1.0])).unwrap();
        index.upsert(chunk("c", "close", vec![0.9, 0.1])).unwrap();

        let results = index.search(&[1.0, 0.0], 2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id, "a");
        assert_eq!(results[1].0.id, "c");
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::new("guide.pdf", "mock");
        assert!(index.search(&[1.0, 0.0], 5).is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut index = VectorIndex::new("guide.pdf", "mock");
        index.upsert(chunk("a", "low end", vec![1.0, 0.0])).unwrap();
        index.upsert(chunk("b", "top end", vec![0.0, 1.0])).unwrap();
        index.save(dir.path()).unwrap();

        let loaded = VectorIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.source(), "guide.pdf");
        assert_eq!(loaded.model(), "mock");

        let results = loaded.search(&[1.0, 0.0], 1);
        assert_eq!(results[0].0.text, "low end");
    }

    #[test]
    fn test_load_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VectorIndex::load(dir.path()).is_err());
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
