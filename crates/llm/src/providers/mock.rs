//! Scripted mock chat provider.
//!
//! Returns canned responses in order, repeating the final one once the script
//! is exhausted. Used by the agent graph tests and the "mock" provider for
//! offline runs.

use crate::client::{ChatClient, ChatRequest, ChatResponse, ChatUsage};
use mixmentor_core::{AppError, AppResult};
use std::sync::Mutex;

/// Mock chat client with a scripted response sequence.
pub struct MockChatClient {
    responses: Vec<String>,
    cursor: Mutex<usize>,
}

impl MockChatClient {
    /// Create a mock client that always answers with a fixed fallback.
    pub fn new() -> Self {
        Self::with_responses(vec!["I don't know".to_string()])
    }

    /// Create a mock client with a scripted response sequence.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses,
            cursor: Mutex::new(0),
        }
    }

    /// Number of completions issued so far.
    pub fn calls(&self) -> usize {
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChatClient for MockChatClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        if self.responses.is_empty() {
            return Err(AppError::Llm("Mock client has no scripted responses".to_string()));
        }

        let mut cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
        let content = self
            .responses
            .get(*cursor)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_default();
        *cursor += 1;

        Ok(ChatResponse {
            content,
            model: request.model.clone(),
            usage: ChatUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_sequence() {
        let client = MockChatClient::with_responses(vec![
            "first".to_string(),
            "second".to_string(),
        ]);
        let request = ChatRequest::new("q", "mock-model");

        assert_eq!(client.complete(&request).await.unwrap().content, "first");
        assert_eq!(client.complete(&request).await.unwrap().content, "second");
        // Script exhausted: the last response repeats
        assert_eq!(client.complete(&request).await.unwrap().content, "second");
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_default_fallback() {
        let client = MockChatClient::new();
        let request = ChatRequest::new("q", "mock-model");
        assert_eq!(client.complete(&request).await.unwrap().content, "I don't know");
    }
}
