//! Supervisor routing step (supervised variant).

use crate::graph::Node;
use crate::nodes::format_chat_history;
use crate::state::{AgentState, StateUpdate};
use mixmentor_core::AppResult;
use mixmentor_llm::{complete_extract, ChatClient, ChatRequest};
use mixmentor_prompt::{build_prompt, templates};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SupervisorVerdict {
    #[serde(default)]
    retrieve: bool,
    #[serde(default)]
    direct_answer: Option<String>,
}

/// Decide whether to search the production guide or answer directly.
///
/// A direct answer is recorded as the candidate generation so the validation
/// gate can still judge it.
pub struct Supervise {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl Supervise {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl Node for Supervise {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let mut variables = HashMap::new();
        variables.insert(
            "user_query".to_string(),
            state.current_query().unwrap_or_default().to_string(),
        );
        variables.insert(
            "chat_history".to_string(),
            format_chat_history(&state.messages),
        );

        let prompt = build_prompt(&templates::SUPERVISE, &variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);

        let verdict: SupervisorVerdict = complete_extract(self.chat.as_ref(), &request).await?;

        tracing::info!(retrieve = verdict.retrieve, "Supervisor routed query");

        let generated_answer = if verdict.retrieve {
            None
        } else {
            verdict.direct_answer.filter(|answer| !answer.is_empty())
        };

        Ok(StateUpdate {
            supervisor_retrieve: Some(verdict.retrieve),
            generated_answer,
            ..StateUpdate::default()
        })
    }
}
