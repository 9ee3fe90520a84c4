//! Query rephrasing step.

use crate::graph::Node;
use crate::nodes::join_documents;
use crate::state::{AgentState, StateUpdate};
use mixmentor_core::AppResult;
use mixmentor_llm::{complete_extract, ChatClient, ChatRequest};
use mixmentor_prompt::{build_prompt, templates};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Rephrased {
    #[serde(default)]
    rephrased_user_query: String,
}

/// Rewrite the query for better retrieval; appends exactly one entry to
/// `rephrased_queries` per invocation.
pub struct RephraseQuery {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl RephraseQuery {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl Node for RephraseQuery {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let mut variables = HashMap::new();
        variables.insert(
            "user_query".to_string(),
            state.original_user_query.clone().unwrap_or_default(),
        );
        variables.insert(
            "rephrased_queries".to_string(),
            state.rephrased_queries.join("; "),
        );
        variables.insert("documents".to_string(), join_documents(&state.documents));
        variables.insert(
            "generated_answer".to_string(),
            state.generated_answer.clone().unwrap_or_default(),
        );

        let prompt = build_prompt(&templates::REPHRASE_QUERY, &variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);

        let rephrased: Rephrased = complete_extract(self.chat.as_ref(), &request).await?;

        tracing::info!(
            attempt = state.rephrased_queries.len() + 1,
            query = %rephrased.rephrased_user_query,
            "Rephrased user query"
        );

        let mut queries = state.rephrased_queries.clone();
        queries.push(rephrased.rephrased_user_query);

        Ok(StateUpdate {
            rephrased_queries: Some(queries),
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixmentor_llm::MockChatClient;

    #[tokio::test]
    async fn test_rephrase_appends_exactly_one_query() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"rephrased_user_query": "what tempo range fits deep house tracks"}"#.to_string(),
        ]));
        let node = RephraseQuery::new(chat, "mock-model");

        let mut state = AgentState::default();
        state.original_user_query = Some("deep house tempo?".to_string());
        state.rephrased_queries = vec!["earlier rewrite".to_string()];

        let update = node.run(&state).await.unwrap();
        let queries = update.rephrased_queries.unwrap();

        assert_eq!(queries.len(), state.rephrased_queries.len() + 1);
        assert_eq!(queries[0], "earlier rewrite");
        assert_eq!(queries[1], "what tempo range fits deep house tracks");
    }

    #[tokio::test]
    async fn test_rephrase_grows_list_per_invocation() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"rephrased_user_query": "rewrite"}"#.to_string(),
        ]));
        let node = RephraseQuery::new(chat, "mock-model");

        let mut state = AgentState::default();
        state.original_user_query = Some("q".to_string());

        for expected_len in 1..=3 {
            let update = node.run(&state).await.unwrap();
            state.apply(update);
            assert_eq!(state.rephrased_queries.len(), expected_len);
        }
    }
}
