//! Retrieval grading nodes.
//!
//! `GradeDocuments` is the single-gate variant: an irrelevant batch is
//! discarded so the downstream branch selector sees an empty retrieval.
//! `CheckRelevance` is the two-stage variant: the judgment and its reasoning
//! are recorded on the state for the relevance-driven branch.

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
struct DocumentsVerdict {
    #[serde(default)]
    documents_relevant: bool,
}

#[derive(Debug, Deserialize)]
struct RelevanceVerdict {
    #[serde(default)]
    search_results_relevant: bool,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Whole-batch relevance gate: keeps or discards the current retrieval.
pub struct GradeDocuments {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl GradeDocuments {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl Node for GradeDocuments {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        // Nothing to grade; the branch selector handles the empty batch
        if state.documents.is_empty() {
            return Ok(StateUpdate::default());
        }

        let mut variables = HashMap::new();
        variables.insert(
            "user_query".to_string(),
            state.original_user_query.clone().unwrap_or_default(),
        );
        variables.insert("documents".to_string(), join_documents(&state.documents));

        let prompt = build_prompt(&templates::GRADE_DOCUMENTS, &variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);

        let verdict: DocumentsVerdict = complete_extract(self.chat.as_ref(), &request).await?;

        tracing::info!(relevant = verdict.documents_relevant, "Graded retrieval batch");

        if verdict.documents_relevant {
            Ok(StateUpdate::default())
        } else {
            // Discard the batch so decide_to_generate sees an empty retrieval
            Ok(StateUpdate {
                documents: Some(vec![]),
                ..StateUpdate::default()
            })
        }
    }
}

/// Relevance judgment with reasoning, recorded on the state.
pub struct CheckRelevance {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl CheckRelevance {
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl Node for CheckRelevance {
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
        if state.documents.is_empty() {
            return Ok(StateUpdate {
                search_results_relevant: Some(false),
                relevance_reasoning: Some("No search results to assess".to_string()),
                ..StateUpdate::default()
            });
        }

        let mut variables = HashMap::new();
        variables.insert(
            "user_query".to_string(),
            state.original_user_query.clone().unwrap_or_default(),
        );
        variables.insert(
            "search_results".to_string(),
            join_documents(&state.documents),
        );

        let prompt = build_prompt(&templates::CHECK_RELEVANCE, &variables)?;
        let request = ChatRequest::new(prompt.user, &self.model).with_system(prompt.system);

        let verdict: RelevanceVerdict = complete_extract(self.chat.as_ref(), &request).await?;

        tracing::info!(
            relevant = verdict.search_results_relevant,
            "Checked search-result relevance"
        );

        Ok(StateUpdate {
            search_results_relevant: Some(verdict.search_results_relevant),
            relevance_reasoning: verdict.reasoning,
            ..StateUpdate::default()
        })
    }
}
