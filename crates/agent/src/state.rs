//! Conversation state threaded through every graph step.
//!
//! A single mutable record per conversation. Nodes never touch the state
//! directly; they return a partial [`StateUpdate`] and the runner merges it
//! via [`AgentState::apply`]: messages extend, everything else replaces when
//! present.

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a human turn.
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    /// Create an AI turn.
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

/// Outcome of the two-stage answer grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingOutcome {
    /// Grounded and resolves the question
    Useful,

    /// Grounded but does not resolve the question
    NotUseful,

    /// Not grounded in the retrieved documents
    NotSupported,
}

/// Conversation-scoped agent state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Ordered conversation turns, append-only
    pub messages: Vec<Message>,

    /// First extracted user question, set once by the user_intent node
    pub original_user_query: Option<String>,

    /// Most recent retrieval batch, replaced on each retrieval
    pub documents: Vec<String>,

    /// Rewritten queries, one per rephrase attempt
    pub rephrased_queries: Vec<String>,

    /// Most recent candidate answer
    pub generated_answer: Option<String>,

    /// Relevance judgment over the latest retrieval (two-stage variants)
    pub search_results_relevant: bool,

    /// Reasoning attached to the relevance judgment
    pub relevance_reasoning: Option<String>,

    /// Whether the candidate answer resolves the query (two-stage variants)
    pub user_query_answered: bool,

    /// Reasoning attached to the answered judgment
    pub user_query_answered_reasoning: Option<String>,

    /// Outcome recorded by the grade_answer node
    pub answer_outcome: Option<GradingOutcome>,

    /// Supervisor routing decision: retrieve via the guide or answer directly
    pub supervisor_retrieve: bool,

    /// Final answer, set by the wrap_up node
    pub answer: Option<String>,
}

impl AgentState {
    /// Start a conversation from a user question.
    pub fn from_question(question: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::human(question)],
            ..Self::default()
        }
    }

    /// Merge a node's partial update into the state.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);

        if let Some(query) = update.original_user_query {
            self.original_user_query = Some(query);
        }
        if let Some(documents) = update.documents {
            self.documents = documents;
        }
        if let Some(queries) = update.rephrased_queries {
            self.rephrased_queries = queries;
        }
        if let Some(answer) = update.generated_answer {
            self.generated_answer = Some(answer);
        }
        if let Some(relevant) = update.search_results_relevant {
            self.search_results_relevant = relevant;
        }
        if let Some(reasoning) = update.relevance_reasoning {
            self.relevance_reasoning = Some(reasoning);
        }
        if let Some(answered) = update.user_query_answered {
            self.user_query_answered = answered;
        }
        if let Some(reasoning) = update.user_query_answered_reasoning {
            self.user_query_answered_reasoning = Some(reasoning);
        }
        if let Some(outcome) = update.answer_outcome {
            self.answer_outcome = Some(outcome);
        }
        if let Some(retrieve) = update.supervisor_retrieve {
            self.supervisor_retrieve = retrieve;
        }
        if let Some(answer) = update.answer {
            self.answer = Some(answer);
        }
    }

    /// The query to retrieve with: the latest rephrase, falling back to the
    /// original question.
    pub fn current_query(&self) -> Option<&str> {
        self.rephrased_queries
            .last()
            .map(String::as_str)
            .or(self.original_user_query.as_deref())
    }
}

/// Partial state returned by a node. Unset fields leave the state untouched.
#[derive(Debug, Default)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub original_user_query: Option<String>,
    pub documents: Option<Vec<String>>,
    pub rephrased_queries: Option<Vec<String>>,
    pub generated_answer: Option<String>,
    pub search_results_relevant: Option<bool>,
    pub relevance_reasoning: Option<String>,
    pub user_query_answered: Option<bool>,
    pub user_query_answered_reasoning: Option<String>,
    pub answer_outcome: Option<GradingOutcome>,
    pub supervisor_retrieve: Option<bool>,
    pub answer: Option<String>,
}
