//! Ollama embedding provider.
//!
//! Calls Ollama's local embeddings API with models like nomic-embed-text.
//! Transient failures are retried with exponential backoff; everything else
//! surfaces immediately.

use crate::embeddings::EmbeddingProvider;
use async_trait::async_trait;
use mixmentor_core::{AppError, AppResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Maximum retry attempts for failed requests
const MAX_RETRIES: u32 = 3;

/// Initial backoff duration in milliseconds
const INITIAL_BACKOFF_MS: u64 = 100;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request payload for Ollama embeddings API
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

/// Response from Ollama embeddings API
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Ollama embedding provider using the local API.
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Embed a single text with retry and exponential backoff.
    async fn embed_with_retry(&self, text: &str) -> AppResult<Vec<f32>> {
        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);
        let payload = EmbeddingRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut backoff_ms = INITIAL_BACKOFF_MS;
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                warn!(attempt, backoff_ms, "Retrying Ollama embedding request");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
            }

            let response = match self.client.post(&url).json(&payload).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(AppError::Knowledge(format!(
                        "Ollama embedding request failed: {}",
                        e
                    )));
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => {
                    let body: EmbeddingResponse = response.json().await.map_err(|e| {
                        AppError::Knowledge(format!(
                            "Failed to parse Ollama embedding response: {}",
                            e
                        ))
                    })?;

                    if body.embedding.is_empty() {
                        return Err(AppError::Knowledge(
                            "Ollama returned an empty embedding".to_string(),
                        ));
                    }

                    return Ok(body.embedding);
                }
                status if status.is_server_error() => {
                    last_error = Some(AppError::Knowledge(format!(
                        "Ollama embedding API error: {}",
                        status
                    )));
                    continue;
                }
                status => {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(AppError::Knowledge(format!(
                        "Ollama embedding API error ({}): {}",
                        status, error_text
                    )));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::Knowledge("Ollama embedding request failed".to_string())
        }))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        debug!(count = texts.len(), model = %self.model, "Embedding batch");

        // The embeddings endpoint takes one prompt per call
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_with_retry(text).await?);
        }

        Ok(embeddings)
    }
}
