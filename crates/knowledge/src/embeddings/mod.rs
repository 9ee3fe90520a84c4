//! Embedding provider trait and factory.

pub mod mock;
pub mod ollama;

use mixmentor_core::{AppError, AppResult};
use std::sync::Arc;

pub use mock::MockEmbedder;
pub use ollama::OllamaEmbedder;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get provider name (e.g., "ollama", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on the provider name.
pub fn create_embedder(
    provider: &str,
    endpoint: Option<&str>,
    model: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let embedder = OllamaEmbedder::new(
                endpoint.unwrap_or("http://localhost:11434"),
                model.unwrap_or("nomic-embed-text"),
            );
            Ok(Arc::new(embedder))
        }
        "mock" => Ok(Arc::new(MockEmbedder::new(384))),
        _ => Err(AppError::Knowledge(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, mock",
            provider
        ))),
    }
}
