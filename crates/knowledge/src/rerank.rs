//! LLM-based reranking of retrieval candidates.
//!
//! Acts as the compression layer on top of the vector search: the candidate
//! batch is re-scored by the chat model and only the best-scoring chunks
//! survive. A malformed scoring response falls back to neutral scores rather
//! than failing the retrieval step.

use async_trait::async_trait;
use mixmentor_core::AppResult;
use mixmentor_llm::{ChatClient, ChatRequest};
use std::sync::Arc;

/// Document batch limit per rerank call, to keep the scoring prompt small.
const MAX_DOCS: usize = 10;

/// Per-document excerpt length in the scoring prompt.
const EXCERPT_CHARS: usize = 400;

/// Neutral score used when the model's scoring output cannot be parsed.
const FALLBACK_SCORE: f32 = 0.5;

/// A relevance score assigned to a candidate by position.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankScore {
    /// Candidate position in the input batch
    pub index: usize,

    /// Relevance score in [0, 1]
    pub score: f32,
}

/// Trait for rerankers.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Score candidate texts against a query, highest first.
    async fn rerank(&self, query: &str, documents: &[String]) -> AppResult<Vec<RerankScore>>;
}

/// Reranker that scores candidates with a chat-completion call.
pub struct LlmReranker {
    client: Arc<dyn ChatClient>,
    model: String,
}

impl LlmReranker {
    /// Create a reranker over an existing chat client.
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    async fn rerank(&self, query: &str, documents: &[String]) -> AppResult<Vec<RerankScore>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        let docs_to_rerank = &documents[..documents.len().min(MAX_DOCS)];
        let prompt = build_scoring_prompt(query, docs_to_rerank);

        let request = ChatRequest::new(prompt, &self.model).with_system(
            "Score document relevance to the query. Output ONLY JSON: \
             {\"scores\": [0.0-1.0, ...]} with one score per document, in order.",
        );

        let response = self.client.complete(&request).await?;

        Ok(parse_scores(&response.content, docs_to_rerank.len()))
    }
}

fn build_scoring_prompt(query: &str, documents: &[String]) -> String {
    let mut prompt = format!("Q: \"{}\"\nDocs:\n", query);

    for (idx, doc) in documents.iter().enumerate() {
        let excerpt = match doc.char_indices().nth(EXCERPT_CHARS) {
            Some((byte_idx, _)) => &doc[..byte_idx],
            None => doc.as_str(),
        };
        prompt.push_str(&format!("[{}] {}\n", idx, excerpt));
    }

    prompt.push_str("\nScore 0-1 JSON:\n{\"scores\":[0.0,...]}\n");

    prompt
}

/// Parse the scoring response, one score per document by position.
///
/// Missing or unparseable output yields neutral scores so retrieval proceeds
/// in vector-search order instead of aborting the graph step.
fn parse_scores(response: &str, doc_count: usize) -> Vec<RerankScore> {
    let fallback = || {
        (0..doc_count)
            .map(|index| RerankScore {
                index,
                score: FALLBACK_SCORE,
            })
            .collect::<Vec<_>>()
    };

    let json_span = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => {
            tracing::warn!("No JSON found in rerank response, using fallback scores");
            return fallback();
        }
    };

    let parsed: serde_json::Value = match serde_json::from_str(json_span) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse rerank JSON: {}, using fallback scores", e);
            tracing::debug!("Raw rerank response: {}", response);
            return fallback();
        }
    };

    let scores = parsed["scores"].as_array().cloned().unwrap_or_default();

    (0..doc_count)
        .map(|index| {
            let score = scores
                .get(index)
                .and_then(|v| v.as_f64())
                .map(|s| s.clamp(0.0, 1.0) as f32)
                .unwrap_or(FALLBACK_SCORE);
            RerankScore { index, score }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixmentor_llm::MockChatClient;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_rerank_parses_scores_in_order() {
        let client = Arc::new(MockChatClient::with_responses(vec![
            r#"{"scores": [0.9, 0.2, 0.6]}"#.to_string(),
        ]));
        let reranker = LlmReranker::new(client, "mock-model");

        let scores = reranker
            .rerank("kick drum", &docs(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], RerankScore { index: 0, score: 0.9 });
        assert_eq!(scores[1], RerankScore { index: 1, score: 0.2 });
        assert_eq!(scores[2], RerankScore { index: 2, score: 0.6 });
    }

    #[tokio::test]
    async fn test_rerank_empty_batch() {
        let client = Arc::new(MockChatClient::new());
        let reranker = LlmReranker::new(client, "mock-model");
        assert!(reranker.rerank("q", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rerank_malformed_response_falls_back() {
        let client = Arc::new(MockChatClient::with_responses(vec![
            "I would rate these documents quite highly.".to_string(),
        ]));
        let reranker = LlmReranker::new(client, "mock-model");

        let scores = reranker.rerank("q", &docs(&["a", "b"])).await.unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| s.score == FALLBACK_SCORE));
    }

    #[tokio::test]
    async fn test_rerank_short_score_array_padded() {
        let client = Arc::new(MockChatClient::with_responses(vec![
            r#"{"scores": [0.8]}"#.to_string(),
        ]));
        let reranker = LlmReranker::new(client, "mock-model");

        let scores = reranker.rerank("q", &docs(&["a", "b"])).await.unwrap();

        assert_eq!(scores[0].score, 0.8);
        assert_eq!(scores[1].score, FALLBACK_SCORE);
    }

    #[test]
    fn test_scores_clamped() {
        let scores = parse_scores(r#"{"scores": [1.7, -0.3]}"#, 2);
        assert_eq!(scores[0].score, 1.0);
        assert_eq!(scores[1].score, 0.0);
    }
}
