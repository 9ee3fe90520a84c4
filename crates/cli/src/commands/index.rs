//! Index command handler.
//!
//! Builds the vector index from a PDF corpus and persists it under
//! `.mixmentor/index/<name>/`.

use clap::Args;
use mixmentor_core::{config::AppConfig, AppError, AppResult};
use mixmentor_knowledge::build_index;
use std::path::PathBuf;

/// Build the vector index from a PDF corpus
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Path to the PDF corpus (default: retrieval.corpus from config)
    pub corpus: Option<PathBuf>,

    /// Index name (default: corpus file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Chunk overlap in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
}

impl IndexCommand {
    /// Execute the index command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command");
        tracing::debug!("Index command options: {:?}", self);

        let corpus = self
            .corpus
            .clone()
            .or_else(|| config.retrieval.corpus.clone())
            .ok_or_else(|| {
                AppError::Config(
                    "No corpus: pass a PDF path or set retrieval.corpus in config.yaml".to_string(),
                )
            })?;

        if !corpus.exists() {
            return Err(AppError::Config(format!(
                "Corpus file does not exist: {:?}",
                corpus
            )));
        }

        let name = match self.name.as_deref() {
            Some(name) => name.to_string(),
            None => corpus
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    AppError::Config(format!("Cannot derive index name from {:?}", corpus))
                })?,
        };

        let chunk_size = self.chunk_size.unwrap_or(config.retrieval.chunk_size);
        let chunk_overlap = self.chunk_overlap.unwrap_or(config.retrieval.chunk_overlap);

        let embedder = super::build_embedder(config)?;

        tracing::info!(
            corpus = %corpus.display(),
            name = %name,
            chunk_size,
            chunk_overlap,
            "Building vector index"
        );

        let index = build_index(&corpus, chunk_size, chunk_overlap, embedder).await?;

        let dir = config.index_dir(&name);
        index.save(&dir)?;

        println!(
            "Indexed {} chunks from {} into {}",
            index.len(),
            corpus.display(),
            dir.display()
        );

        Ok(())
    }
}
