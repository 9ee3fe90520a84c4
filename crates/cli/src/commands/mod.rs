//! Command handlers for the Mixmentor CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod index;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use index::IndexCommand;
pub use stats::StatsCommand;

use mixmentor_core::config::{AppConfig, ProviderConfig};
use mixmentor_core::{AppError, AppResult};
use mixmentor_knowledge::{create_embedder, EmbeddingProvider};
use std::sync::Arc;

/// Resolve the chat endpoint for the active provider, if configured.
pub(crate) fn resolve_endpoint(config: &AppConfig) -> Option<String> {
    match config.get_provider_config(&config.provider)? {
        ProviderConfig::Ollama { endpoint, .. } => Some(endpoint),
        ProviderConfig::OpenAi { endpoint, .. } => endpoint,
    }
}

/// Create the embedding provider from configuration.
///
/// The embedding provider may differ from the chat provider (for example an
/// Ollama embedding model alongside a hosted chat model).
pub(crate) fn build_embedder(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let provider = config
        .llm
        .as_ref()
        .map(|llm| llm.active_embedding_provider.clone())
        .unwrap_or_else(|| config.provider.clone());

    let (endpoint, model) = match config.get_provider_config(&provider) {
        Some(ProviderConfig::Ollama {
            endpoint,
            embedding_model,
            ..
        }) => (Some(endpoint), embedding_model),
        Some(ProviderConfig::OpenAi {
            endpoint,
            embedding_model,
            ..
        }) => (endpoint, embedding_model),
        None => (None, None),
    };

    create_embedder(&provider, endpoint.as_deref(), model.as_deref())
}

/// Resolve the index name from a flag or the configured corpus file stem.
pub(crate) fn resolve_index_name(config: &AppConfig, name: Option<&str>) -> AppResult<String> {
    if let Some(name) = name {
        return Ok(name.to_string());
    }

    config
        .retrieval
        .corpus
        .as_ref()
        .and_then(|corpus| corpus.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            AppError::Config(
                "No index name: pass --name or set retrieval.corpus in config.yaml".to_string(),
            )
        })
}
