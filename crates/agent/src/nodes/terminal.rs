//! Terminal nodes: wrap_up (success) and express_uncertainty (ungrounded
//! fallback).

use crate::graph::Node;
use crate::state::{AgentState, Message, StateUpdate};
use mixmentor_core::AppResult;

/// Notice prefixed to an answer that failed the groundedness gate.
const UNCERTAINTY_NOTICE: &str = "\
I'm not entirely sure about the accuracy of the information provided.
The sources do not provide enough context to ensure complete accuracy.";

/// Successful termination: publish the candidate answer.
pub struct WrapUp;

#[async_trait::async_trait]
impl Node for WrapUp {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let answer = state
            .generated_answer
            .clone()
            .unwrap_or_else(|| "I don't know".to_string());

        Ok(StateUpdate {
            messages: vec![Message::ai(answer.clone())],
            answer: Some(answer),
            ..StateUpdate::default()
        })
    }
}

/// Ungrounded fallback: surface the answer with an uncertainty notice.
pub struct ExpressUncertainty;

#[async_trait::async_trait]
impl Node for ExpressUncertainty {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let result = match state.generated_answer.as_deref() {
            Some(answer) if !answer.is_empty() => {
                format!("{}\n\n{}", UNCERTAINTY_NOTICE, answer)
            }
            _ => UNCERTAINTY_NOTICE.to_string(),
        };

        Ok(StateUpdate {
            messages: vec![Message::ai(result.clone())],
            answer: Some(result),
            ..StateUpdate::default()
        })
    }
}
