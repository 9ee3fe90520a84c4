//! Knowledge base crate for the Mixmentor agent.
//!
//! Turns a single PDF corpus into a searchable vector index and exposes a
//! `Retriever` facade the agent graph queries on every retrieval step:
//!
//! 1. [`pdf`] extracts plain text from the corpus
//! 2. [`chunker`] splits it into fixed-size overlapping chunks
//! 3. [`embeddings`] turns chunks and queries into vectors
//! 4. [`index`] stores vectors in memory with optional on-disk persistence
//! 5. [`rerank`] re-scores the candidate batch with an LLM
//! 6. [`retriever`] wires the above into embed → search → rerank

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod pdf;
pub mod rerank;
pub mod retriever;
pub mod types;

pub use embeddings::{create_embedder, EmbeddingProvider};
pub use index::VectorIndex;
pub use rerank::{LlmReranker, Reranker};
pub use retriever::{build_index, Retriever};
pub use types::{Chunk, ChunkCandidate};
