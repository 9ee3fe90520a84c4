//! User intent extraction.

use crate::graph::Node;
use crate::state::{AgentState, Role, StateUpdate};
use mixmentor_core::AppResult;

/// Capture the trailing human message as the original user query.
///
/// Runs once at the entry of every graph variant; later steps work against
/// `original_user_query` or its rephrasings, never the raw message list.
pub struct UserIntent;

#[async_trait::async_trait]
impl Node for UserIntent {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let original_user_query = state
            .messages
            .last()
            .filter(|message| message.role == Role::Human)
            .map(|message| message.content.clone());

        tracing::debug!(query = ?original_user_query, "Extracted user intent");

        Ok(StateUpdate {
            original_user_query,
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Message;

    #[tokio::test]
    async fn test_captures_trailing_human_message() {
        let state = AgentState::from_question("What tempo suits deep house?");
        let update = UserIntent.run(&state).await.unwrap();

        assert_eq!(
            update.original_user_query.as_deref(),
            Some("What tempo suits deep house?")
        );
    }

    #[tokio::test]
    async fn test_ignores_trailing_ai_message() {
        let mut state = AgentState::from_question("question");
        state.messages.push(Message::ai("answer"));

        let update = UserIntent.run(&state).await.unwrap();
        assert!(update.original_user_query.is_none());
    }

    #[tokio::test]
    async fn test_empty_conversation() {
        let update = UserIntent.run(&AgentState::default()).await.unwrap();
        assert!(update.original_user_query.is_none());
    }
}
