//! Retrieval facade: embed → vector search → rerank.
//!
//! This is the single entry point the agent graph uses on every retrieval
//! step. It also owns corpus ingestion (PDF → chunks → embeddings → index).

use crate::chunker;
use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use crate::pdf;
use crate::rerank::Reranker;
use crate::types::Chunk;
use mixmentor_core::AppResult;
use std::path::Path;
use std::sync::Arc;

/// Retriever over a vector index, with optional rerank compression.
pub struct Retriever {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    reranker: Option<Arc<dyn Reranker>>,
    top_k: usize,
    top_n: usize,
}

impl Retriever {
    /// Create a retriever over an existing index.
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        top_k: usize,
        top_n: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            reranker: None,
            top_k,
            top_n,
        }
    }

    /// Attach a reranking compression layer.
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Number of chunks backing this retriever.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Retrieve the most relevant chunk texts for a query.
    ///
    /// Fetches `top_k` candidates from the vector index, reranks them when a
    /// reranker is attached, and returns up to `top_n` texts best-first.
    pub async fn retrieve(&self, query: &str) -> AppResult<Vec<String>> {
        tracing::debug!(query, "Retrieving documents");

        let query_embedding = self.embedder.embed(query).await?;
        let candidates = self.index.search(&query_embedding, self.top_k);

        if candidates.is_empty() {
            tracing::debug!("Vector search returned no candidates");
            return Ok(vec![]);
        }

        let texts: Vec<String> = candidates
            .into_iter()
            .map(|(chunk, _score)| chunk.text)
            .collect();

        let ordered = match &self.reranker {
            Some(reranker) => {
                let mut scores = reranker.rerank(query, &texts).await?;
                scores.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scores
                    .into_iter()
                    .map(|score| texts[score.index].clone())
                    .collect()
            }
            None => texts,
        };

        let results: Vec<String> = ordered.into_iter().take(self.top_n).collect();

        tracing::info!(count = results.len(), "Retrieved documents");

        Ok(results)
    }
}

/// Build a vector index from a PDF corpus.
///
/// Extracts text, chunks it at the given size/overlap, embeds every chunk,
/// and returns the populated index. Persisting it is the caller's decision.
pub async fn build_index(
    corpus: &Path,
    chunk_size: usize,
    chunk_overlap: usize,
    embedder: Arc<dyn EmbeddingProvider>,
) -> AppResult<VectorIndex> {
    let source = corpus
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| corpus.display().to_string());

    let text = pdf::extract_text(corpus)?;
    let candidates = chunker::chunk_text(&text, chunk_size, chunk_overlap);

    tracing::info!(
        source = %source,
        chunks = candidates.len(),
        "Embedding corpus chunks"
    );

    let mut index = VectorIndex::new(&source, embedder.model_name());

    let texts: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    for (candidate, embedding) in candidates.into_iter().zip(embeddings) {
        let mut chunk = Chunk::from_candidate(&source, candidate);
        chunk.embedding = embedding;
        index.upsert(chunk)?;
    }

    Ok(index)
}
