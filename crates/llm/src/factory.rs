//! Chat provider factory.
//!
//! Creates chat clients from the configured provider name.

use crate::client::ChatClient;
use crate::providers::{MockChatClient, OllamaClient};
use mixmentor_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a chat client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// # Errors
/// Returns error if the provider is unknown or required secrets are missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn ChatClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        "mock" => Ok(Arc::new(MockChatClient::new())),
        "openai" => {
            if api_key.is_none() {
                return Err(AppError::Llm(
                    "OpenAI provider requires API key".to_string(),
                ));
            }
            Err(AppError::Llm(
                "OpenAI provider not yet implemented".to_string(),
            ))
        }
        _ => Err(AppError::Llm(format!("Unknown provider: {}", provider))),
    }
}
