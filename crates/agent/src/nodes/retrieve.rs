//! Document retrieval step.

use crate::graph::Node;
use crate::state::{AgentState, StateUpdate};
use mixmentor_core::{AppError, AppResult};
use mixmentor_knowledge::Retriever;
use std::sync::Arc;

/// Query the vector store and replace the current retrieval batch.
///
/// Uses the latest rephrased query when one exists, otherwise the original
/// user question.
pub struct Retrieve {
    retriever: Arc<Retriever>,
}

impl Retrieve {
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait::async_trait]
impl Node for Retrieve {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        let query = state
            .current_query()
            .ok_or_else(|| AppError::Agent("No user query found in conversation".to_string()))?;

        let documents = self.retriever.retrieve(query).await?;

        tracing::info!(count = documents.len(), "Retrieval step finished");

        Ok(StateUpdate {
            documents: Some(documents),
            // A fresh batch has not been judged yet
            search_results_relevant: Some(false),
            ..StateUpdate::default()
        })
    }
}
