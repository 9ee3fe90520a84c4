//! Answer grading nodes.
//!
//! `GradeAnswer` runs the two sequential judgments of the graded variant:
//! groundedness first, usefulness only when the answer is grounded.
//! `ValidateGeneration` is the two-stage variant's single answered/not
//! judgment with reasoning.

use crate::graph::Node;
use crate::nodes::join_documents;
use crate::state::{AgentState, GradingOutcome, StateUpdate};
use mixmentor_core::AppResult;
use mixmentor_llm::{complete_extract, ChatClient, ChatRequest};
use mixmentor_prompt::{build_prompt, templates};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    grading: bool,
}

#[derive(Debug, Deserialize)]
struct Validation {
    #[serde(default)]
    is_answer_to_query: bool,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Two sequential judgments over the candidate answer.
///
/// An ungrounded answer is `NotSupported` without consulting usefulness; a
/// grounded one is `Useful` or `NotUseful` depending on whether it resolves
/// the original question.
pub struct GradeAnswer {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl GradeAnswer {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    async fn judge(&self, template: &templates::PromptTemplate, variables: &HashMap<String, String>) -> AppResult<bool> {
        let prompt = build_prompt(template, variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);
        let verdict: Verdict = complete_extract(self.chat.as_ref(), &request).await?;
        Ok(verdict.grading)
    }
}

#[async_trait::async_trait]
impl Node for GradeAnswer {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let generated_answer = state.generated_answer.clone().unwrap_or_default();

        let mut variables = HashMap::new();
        variables.insert("documents".to_string(), join_documents(&state.documents));
        variables.insert("generated_answer".to_string(), generated_answer);

        let grounded = self.judge(&templates::GRADE_GROUNDEDNESS, &variables).await?;

        let outcome = if grounded {
            variables.insert(
                "user_query".to_string(),
                state.original_user_query.clone().unwrap_or_default(),
            );

            if self.judge(&templates::GRADE_USEFULNESS, &variables).await? {
                GradingOutcome::Useful
            } else {
                GradingOutcome::NotUseful
            }
        } else {
            GradingOutcome::NotSupported
        };

        tracing::info!(?outcome, "Graded candidate answer");

        Ok(StateUpdate {
            answer_outcome: Some(outcome),
            ..StateUpdate::default()
        })
    }
}

/// Single answered/not-answered judgment with reasoning.
pub struct ValidateGeneration {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl ValidateGeneration {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl Node for ValidateGeneration {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let mut variables = HashMap::new();
        variables.insert(
            "user_query".to_string(),
            state.original_user_query.clone().unwrap_or_default(),
        );
        variables.insert(
            "generated_answer".to_string(),
            state.generated_answer.clone().unwrap_or_default(),
        );

        let prompt = build_prompt(&templates::VALIDATE_GENERATION, &variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);

        let validation: Validation = complete_extract(self.chat.as_ref(), &request).await?;

        tracing::info!(answered = validation.is_answer_to_query, "Validated generation");

        Ok(StateUpdate {
            user_query_answered: Some(validation.is_answer_to_query),
            user_query_answered_reasoning: validation.reasoning,
            ..StateUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixmentor_llm::MockChatClient;

    fn graded_state() -> AgentState {
        let mut state = AgentState::default();
        state.original_user_query = Some("how do I sidechain".to_string());
        state.documents = vec!["Sidechain compression basics.".to_string()];
        state.generated_answer = Some("Route the kick to the compressor sidechain.".to_string());
        state
    }

    #[tokio::test]
    async fn test_grounded_and_useful() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"grading": true}"#.to_string(),
            r#"{"grading": true}"#.to_string(),
        ]));
        let node = GradeAnswer::new(chat.clone(), "mock-model");

        let update = node.run(&graded_state()).await.unwrap();

        assert_eq!(update.answer_outcome, Some(GradingOutcome::Useful));
        assert_eq!(chat.calls(), 2);
    }

    #[tokio::test]
    async fn test_grounded_but_not_useful() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"grading": true}"#.to_string(),
            r#"{"grading": false}"#.to_string(),
        ]));
        let node = GradeAnswer::new(chat, "mock-model");

        let update = node.run(&graded_state()).await.unwrap();
        assert_eq!(update.answer_outcome, Some(GradingOutcome::NotUseful));
    }

    #[tokio::test]
    async fn test_ungrounded_skips_usefulness_judgment() {
        // The usefulness script would say useful, but it must never be
        // consulted when groundedness fails
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"grading": false}"#.to_string(),
            r#"{"grading": true}"#.to_string(),
        ]));
        let node = GradeAnswer::new(chat.clone(), "mock-model");

        let update = node.run(&graded_state()).await.unwrap();

        assert_eq!(update.answer_outcome, Some(GradingOutcome::NotSupported));
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn test_validate_generation_records_judgment() {
        let chat = Arc::new(MockChatClient::with_responses(vec![
            r#"{"is_answer_to_query": true, "reasoning": "direct and actionable"}"#.to_string(),
        ]));
        let node = ValidateGeneration::new(chat, "mock-model");

        let update = node.run(&graded_state()).await.unwrap();

        assert_eq!(update.user_query_answered, Some(true));
        assert_eq!(
            update.user_query_answered_reasoning.as_deref(),
            Some("direct and actionable")
        );
    }
}
