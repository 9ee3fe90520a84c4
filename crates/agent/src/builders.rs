//! Graph constructors for the three agent variants.
//!
//! All variants share the same node set and state; they differ in how
//! retrieval is triggered and how answer quality is gated:
//!
//! - **graded**: always retrieve, gate with a per-batch document grade and a
//!   combined groundedness/usefulness judgment over the answer.
//! - **validated**: always retrieve, gate with the two-stage relevance check
//!   and generation validation.
//! - **supervised**: an LLM supervisor decides between answering directly and
//!   running the retrieval pipeline.

use crate::branch::{
    decide_after_relevance, decide_to_generate, node_after_grading, RetrievalBranch,
    MAX_REPHRASE_ATTEMPTS,
};
use crate::graph::{Graph, GraphBuilder};
use crate::nodes::{
    CheckRelevance, ExpressUncertainty, Generate, GradeAnswer, GradeDocuments, RephraseQuery,
    Retrieve, Supervise, UserIntent, ValidateGeneration, WrapUp,
};
use crate::state::AgentState;
use mixmentor_core::AppResult;
use mixmentor_knowledge::Retriever;
use mixmentor_llm::ChatClient;
use std::sync::Arc;

pub const USER_INTENT: &str = "user_intent";
pub const RETRIEVE: &str = "retrieve";
pub const GRADE_DOCUMENTS: &str = "grade_documents";
pub const CHECK_RELEVANCE: &str = "check_relevance";
pub const GENERATE: &str = "generate";
pub const REPHRASE_QUERY: &str = "rephrase_query";
pub const GRADE_ANSWER: &str = "grade_answer";
pub const VALIDATE_GENERATION: &str = "validate_generation";
pub const SUPERVISE: &str = "supervise";
pub const WRAP_UP: &str = "wrap_up";
pub const EXPRESS_UNCERTAINTY: &str = "express_uncertainty";

fn retrieval_branch_node(branch: RetrievalBranch) -> &'static str {
    match branch {
        RetrievalBranch::Generate => GENERATE,
        RetrievalBranch::RephraseQuery => REPHRASE_QUERY,
    }
}

/// Primary variant: per-batch document grading plus the two-step answer
/// judgment.
pub fn graded_graph(
    chat: Arc<dyn ChatClient>,
    model: &str,
    retriever: Arc<Retriever>,
) -> AppResult<Graph> {
    GraphBuilder::new()
        .add_node(USER_INTENT, UserIntent)
        .add_node(RETRIEVE, Retrieve::new(retriever))
        .add_node(GRADE_DOCUMENTS, GradeDocuments::new(chat.clone(), model))
        .add_node(GENERATE, Generate::new(chat.clone(), model))
        .add_node(REPHRASE_QUERY, RephraseQuery::new(chat.clone(), model))
        .add_node(GRADE_ANSWER, GradeAnswer::new(chat, model))
        .add_node(WRAP_UP, WrapUp)
        .add_node(EXPRESS_UNCERTAINTY, ExpressUncertainty)
        .set_entry(USER_INTENT)
        .add_edge(USER_INTENT, RETRIEVE)
        .add_edge(RETRIEVE, GRADE_DOCUMENTS)
        .add_conditional_edge(GRADE_DOCUMENTS, |state| {
            retrieval_branch_node(decide_to_generate(state))
        })
        .add_edge(REPHRASE_QUERY, RETRIEVE)
        .add_edge(GENERATE, GRADE_ANSWER)
        .add_conditional_edge(GRADE_ANSWER, answer_branch)
        .add_terminal(WRAP_UP)
        .add_terminal(EXPRESS_UNCERTAINTY)
        .build()
}

/// Two-stage variant: a relevance check before generation and a generation
/// validation after it.
pub fn validated_graph(
    chat: Arc<dyn ChatClient>,
    model: &str,
    retriever: Arc<Retriever>,
) -> AppResult<Graph> {
    GraphBuilder::new()
        .add_node(USER_INTENT, UserIntent)
        .add_node(RETRIEVE, Retrieve::new(retriever))
        .add_node(CHECK_RELEVANCE, CheckRelevance::new(chat.clone(), model))
        .add_node(GENERATE, Generate::new(chat.clone(), model))
        .add_node(REPHRASE_QUERY, RephraseQuery::new(chat.clone(), model))
        .add_node(VALIDATE_GENERATION, ValidateGeneration::new(chat, model))
        .add_node(WRAP_UP, WrapUp)
        .add_node(EXPRESS_UNCERTAINTY, ExpressUncertainty)
        .set_entry(USER_INTENT)
        .add_edge(USER_INTENT, RETRIEVE)
        .add_edge(RETRIEVE, CHECK_RELEVANCE)
        .add_conditional_edge(CHECK_RELEVANCE, |state| {
            retrieval_branch_node(decide_after_relevance(state))
        })
        .add_edge(REPHRASE_QUERY, RETRIEVE)
        .add_edge(GENERATE, VALIDATE_GENERATION)
        .add_conditional_edge(VALIDATE_GENERATION, validation_branch)
        .add_terminal(WRAP_UP)
        .add_terminal(EXPRESS_UNCERTAINTY)
        .build()
}

/// Supervisor variant: the supervisor either answers directly or routes into
/// the two-stage retrieval pipeline. Rephrased queries come back through the
/// supervisor so it can reconsider its routing.
pub fn supervised_graph(
    chat: Arc<dyn ChatClient>,
    model: &str,
    retriever: Arc<Retriever>,
) -> AppResult<Graph> {
    GraphBuilder::new()
        .add_node(USER_INTENT, UserIntent)
        .add_node(SUPERVISE, Supervise::new(chat.clone(), model))
        .add_node(RETRIEVE, Retrieve::new(retriever))
        .add_node(CHECK_RELEVANCE, CheckRelevance::new(chat.clone(), model))
        .add_node(GENERATE, Generate::new(chat.clone(), model))
        .add_node(REPHRASE_QUERY, RephraseQuery::new(chat.clone(), model))
        .add_node(VALIDATE_GENERATION, ValidateGeneration::new(chat, model))
        .add_node(WRAP_UP, WrapUp)
        .add_node(EXPRESS_UNCERTAINTY, ExpressUncertainty)
        .set_entry(USER_INTENT)
        .add_edge(USER_INTENT, SUPERVISE)
        .add_conditional_edge(SUPERVISE, |state| {
            if state.supervisor_retrieve {
                RETRIEVE
            } else {
                WRAP_UP
            }
        })
        .add_edge(RETRIEVE, CHECK_RELEVANCE)
        .add_conditional_edge(CHECK_RELEVANCE, |state| {
            retrieval_branch_node(decide_after_relevance(state))
        })
        .add_edge(REPHRASE_QUERY, SUPERVISE)
        .add_edge(GENERATE, VALIDATE_GENERATION)
        .add_conditional_edge(VALIDATE_GENERATION, validation_branch)
        .add_terminal(WRAP_UP)
        .add_terminal(EXPRESS_UNCERTAINTY)
        .build()
}

/// Route on the recorded answer grade. A missing grade means the judgment
/// never ran, so the answer cannot be trusted.
fn answer_branch(state: &AgentState) -> &'static str {
    match state.answer_outcome {
        Some(outcome) => node_after_grading(outcome),
        None => EXPRESS_UNCERTAINTY,
    }
}

/// Route on the two-stage validation verdict.
fn validation_branch(state: &AgentState) -> &'static str {
    if state.user_query_answered {
        WRAP_UP
    } else if state.rephrased_queries.len() < MAX_REPHRASE_ATTEMPTS {
        REPHRASE_QUERY
    } else {
        EXPRESS_UNCERTAINTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixmentor_knowledge::embeddings::{EmbeddingProvider, MockEmbedder};
    use mixmentor_knowledge::{Chunk, ChunkCandidate, VectorIndex};
    use mixmentor_llm::MockChatClient;

    async fn seeded_retriever(texts: &[&str]) -> Arc<Retriever> {
        let embedder = Arc::new(MockEmbedder::new(128));
        let mut index = VectorIndex::new("guide.pdf", embedder.model_name());

        for (position, text) in texts.iter().enumerate() {
            let candidate = ChunkCandidate {
                position: position as u32,
                text: text.to_string(),
                byte_range: (0, text.len()),
            };
            let mut chunk = Chunk::from_candidate("guide.pdf", candidate);
            chunk.embedding = embedder.embed(text).await.unwrap();
            index.upsert(chunk).unwrap();
        }

        Arc::new(Retriever::new(index, embedder, 10, 10))
    }

    async fn empty_retriever() -> Arc<Retriever> {
        let embedder = Arc::new(MockEmbedder::new(128));
        let index = VectorIndex::new("guide.pdf", embedder.model_name());
        Arc::new(Retriever::new(index, embedder, 10, 10))
    }

    fn script(responses: &[&str]) -> Arc<MockChatClient> {
        Arc::new(MockChatClient::with_responses(
            responses.iter().map(|r| r.to_string()).collect(),
        ))
    }

    #[tokio::test]
    async fn test_graded_happy_path_ends_at_wrap_up() {
        let chat = script(&[
            r#"{"documents_relevant": true}"#,
            r#"{"generated_answer": "Tune the kick to the key of the track."}"#,
            r#"{"grading": true}"#,
            r#"{"grading": true}"#,
        ]);
        let retriever = seeded_retriever(&["Tune the kick drum to the key of the track."]).await;

        let graph = graded_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("How should I tune my kick?"))
            .await
            .unwrap();

        assert_eq!(
            state.answer.as_deref(),
            Some("Tune the kick to the key of the track.")
        );
        assert_eq!(chat.calls(), 4);
        // wrap_up appended the final AI turn
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_graded_ungrounded_answer_expresses_uncertainty() {
        let chat = script(&[
            r#"{"documents_relevant": true}"#,
            r#"{"generated_answer": "A made-up claim."}"#,
            r#"{"grading": false}"#,
        ]);
        let retriever = seeded_retriever(&["Arrangement is a subtractive process."]).await;

        let graph = graded_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("What is sidechain compression?"))
            .await
            .unwrap();

        let answer = state.answer.unwrap();
        assert!(answer.starts_with("I'm not entirely sure"));
        assert!(answer.contains("A made-up claim."));
        // the usefulness judgment never ran after groundedness failed
        assert_eq!(chat.calls(), 3);
    }

    #[tokio::test]
    async fn test_graded_empty_retrieval_exhausts_rephrase_budget() {
        // Empty index: every retrieval comes back empty, grade_documents
        // skips its call, and the rephrase budget forces generation on the
        // fourth pass.
        let chat = script(&[
            r#"{"rephrased_user_query": "first rewrite"}"#,
            r#"{"rephrased_user_query": "second rewrite"}"#,
            r#"{"rephrased_user_query": "third rewrite"}"#,
            r#"{"generated_answer": "I don't know"}"#,
            r#"{"grading": true}"#,
            r#"{"grading": true}"#,
        ]);
        let retriever = empty_retriever().await;

        let graph = graded_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("What is a flanger?"))
            .await
            .unwrap();

        assert_eq!(state.answer.as_deref(), Some("I don't know"));
        assert!(state.documents.is_empty());
        assert_eq!(chat.calls(), 6);
    }

    #[tokio::test]
    async fn test_validated_happy_path() {
        let chat = script(&[
            r#"{"search_results_relevant": true, "reasoning": "on topic"}"#,
            r#"{"generated_answer": "Use a high-pass filter on the reverb return."}"#,
            r#"{"is_answer_to_query": true, "reasoning": "resolves the question"}"#,
        ]);
        let retriever = seeded_retriever(&["High-pass the reverb return to avoid mud."]).await;

        let graph = validated_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("How do I clean up my reverb?"))
            .await
            .unwrap();

        assert_eq!(
            state.answer.as_deref(),
            Some("Use a high-pass filter on the reverb return.")
        );
        assert!(state.search_results_relevant);
        assert!(state.user_query_answered);
        assert_eq!(chat.calls(), 3);
    }

    #[tokio::test]
    async fn test_validated_irrelevant_results_trigger_rephrase() {
        let chat = script(&[
            r#"{"search_results_relevant": false, "reasoning": "off topic"}"#,
            r#"{"rephrased_user_query": "reverb tail cleanup techniques"}"#,
            r#"{"search_results_relevant": true, "reasoning": "now on topic"}"#,
            r#"{"generated_answer": "Shorten the decay and high-pass the return."}"#,
            r#"{"is_answer_to_query": true, "reasoning": "resolves it"}"#,
        ]);
        let retriever = seeded_retriever(&["Shorten reverb decay in busy mixes."]).await;

        let graph = validated_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("Why is my mix muddy?"))
            .await
            .unwrap();

        assert_eq!(
            state.answer.as_deref(),
            Some("Shorten the decay and high-pass the return.")
        );
        assert_eq!(chat.calls(), 5);
    }

    #[tokio::test]
    async fn test_supervised_direct_answer_skips_retrieval() {
        let chat = script(&[
            r#"{"retrieve": false, "direct_answer": "A compressor reduces dynamic range."}"#,
        ]);
        let retriever = empty_retriever().await;

        let graph = supervised_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("What does a compressor do?"))
            .await
            .unwrap();

        assert_eq!(
            state.answer.as_deref(),
            Some("A compressor reduces dynamic range.")
        );
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn test_supervised_retrieval_path() {
        let chat = script(&[
            r#"{"retrieve": true, "direct_answer": null}"#,
            r#"{"search_results_relevant": true, "reasoning": "on topic"}"#,
            r#"{"generated_answer": "Layer a sine sub under the kick."}"#,
            r#"{"is_answer_to_query": true, "reasoning": "resolves it"}"#,
        ]);
        let retriever = seeded_retriever(&["Layer the kick with a sine sub for weight."]).await;

        let graph = supervised_graph(chat.clone(), "test-model", retriever).unwrap();
        let state = graph
            .run(AgentState::from_question("How do I get a heavier kick?"))
            .await
            .unwrap();

        assert_eq!(
            state.answer.as_deref(),
            Some("Layer a sine sub under the kick.")
        );
        assert!(state.supervisor_retrieve);
        assert_eq!(chat.calls(), 4);
    }

    #[tokio::test]
    async fn test_graph_names_are_distinct() {
        let names = [
            USER_INTENT,
            RETRIEVE,
            GRADE_DOCUMENTS,
            CHECK_RELEVANCE,
            GENERATE,
            REPHRASE_QUERY,
            GRADE_ANSWER,
            VALIDATE_GENERATION,
            SUPERVISE,
            WRAP_UP,
            EXPRESS_UNCERTAINTY,
        ];
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }
}
