//! Deterministic mock embedding provider.
//!
//! Hashes character trigrams into a fixed-dimension vector and normalizes it.
//! Similar texts get similar vectors, which is enough for index and retriever
//! tests without a running model server.

use crate::embeddings::EmbeddingProvider;
use async_trait::async_trait;
use mixmentor_core::AppResult;

/// Mock embedder producing deterministic trigram-hash vectors.
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    /// Create a mock embedder with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();
        for window in chars.windows(3) {
            let mut hash = 5381u64;
            for &c in window {
                hash = hash.wrapping_mul(33).wrapping_add(c as u64);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }

        // L2 normalize so cosine similarity reduces to a dot product
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-hash"
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}
