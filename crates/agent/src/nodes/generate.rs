//! Answer generation step.

use crate::graph::Node;
use crate::nodes::{format_chat_history, join_documents};
use crate::state::{AgentState, StateUpdate};
use mixmentor_core::AppResult;
use mixmentor_llm::{complete_extract, ChatClient, ChatRequest};
use mixmentor_prompt::{build_prompt, templates};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct GeneratedAnswer {
    #[serde(default)]
    generated_answer: String,
}

/// Generate a candidate answer from the retrieval batch and chat history.
///
/// Also resets the rephrase budget: a fresh generation opens a new round of
/// corrective retries if the graders reject it.
pub struct Generate {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl Generate {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl Node for Generate {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let mut variables = HashMap::new();
        variables.insert(
            "user_query".to_string(),
            state.original_user_query.clone().unwrap_or_default(),
        );
        variables.insert("documents".to_string(), join_documents(&state.documents));
        variables.insert(
            "chat_history".to_string(),
            format_chat_history(&state.messages),
        );

        let prompt = build_prompt(&templates::GENERATE, &variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);

        let generated: GeneratedAnswer = complete_extract(self.chat.as_ref(), &request).await?;

        tracing::info!(chars = generated.generated_answer.len(), "Generated candidate answer");

        Ok(StateUpdate {
            generated_answer: Some(generated.generated_answer),
            rephrased_queries: Some(vec![]),
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixmentor_llm::MockChatClient;

    #[tokio::test]
    async fn test_generate_sets_answer_and_resets_budget() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"generated_answer": "Duck the bass with sidechain compression."}"#.to_string(),
        ]));
        let node = Generate::new(chat, "mock-model");

        let mut state = AgentState::from_question("how do I sidechain");
        state.original_user_query = Some("how do I sidechain".to_string());
        state.documents = vec!["Sidechain compression basics.".to_string()];
        state.rephrased_queries = vec!["q1".to_string(), "q2".to_string()];

        let update = node.run(&state).await.unwrap();

        assert_eq!(
            update.generated_answer.as_deref(),
            Some("Duck the bass with sidechain compression.")
        );
        assert_eq!(update.rephrased_queries, Some(vec![]));
    }

    #[tokio::test]
    async fn test_generate_propagates_malformed_output() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            "no json here".to_string(),
        ]));
        let node = Generate::new(chat, "mock-model");

        let state = AgentState::from_question("q");
        assert!(node.run(&state).await.is_err());
    }
}
