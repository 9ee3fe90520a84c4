//! Structured JSON extraction from LLM output.
//!
//! Grading nodes need a typed verdict (a bool plus reasoning text) rather than
//! prose. The prompt templates instruct the model to answer with a single JSON
//! object; this module pulls that object out of whatever the model actually
//! returned and deserializes it into the caller's schema.

use mixmentor_core::{AppError, AppResult};
use serde::de::DeserializeOwned;

use crate::client::{ChatClient, ChatRequest};

/// Extract and deserialize a JSON object embedded in LLM output.
///
/// Models frequently wrap the object in prose or fenced code blocks, so this
/// scans for the outermost `{ ... }` span before parsing.
pub fn extract_json<T: DeserializeOwned>(content: &str) -> AppResult<T> {
    let start = content.find('{').ok_or_else(|| {
        AppError::Llm(format!(
            "No JSON object found in model output: {}",
            truncate(content, 200)
        ))
    })?;
    let end = content.rfind('}').ok_or_else(|| {
        AppError::Llm(format!(
            "Unterminated JSON object in model output: {}",
            truncate(content, 200)
        ))
    })?;

    if end < start {
        return Err(AppError::Llm(
            "Malformed JSON object in model output".to_string(),
        ));
    }

    serde_json::from_str(&content[start..=end])
        .map_err(|e| AppError::Llm(format!("Failed to parse model JSON output: {}", e)))
}

/// Issue a completion and extract a typed JSON result from the response.
pub async fn complete_extract<T: DeserializeOwned>(
    client: &dyn ChatClient,
    request: &ChatRequest,
) -> AppResult<T> {
    let response = client.complete(request).await?;
    tracing::debug!(
        provider = client.provider_name(),
        tokens = response.usage.total_tokens,
        "Extracting structured output"
    );
    extract_json(&response.content)
}

fn truncate(text: &str, max_len: usize) -> &str {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
