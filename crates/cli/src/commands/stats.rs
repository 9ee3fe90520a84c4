//! Stats command handler.
//!
//! Reports basic statistics about a persisted index.

use clap::Args;
use mixmentor_core::{config::AppConfig, AppResult};
use mixmentor_knowledge::VectorIndex;

/// Show index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Index to inspect (default: corpus file stem from config)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let name = super::resolve_index_name(config, self.name.as_deref())?;
        let index = VectorIndex::load(&config.index_dir(&name))?;

        if self.json {
            let output = serde_json::json!({
                "index": name,
                "source": index.source(),
                "embeddingModel": index.model(),
                "chunks": index.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Index:           {}", name);
            println!("Source:          {}", index.source());
            println!("Embedding model: {}", index.model());
            println!("Chunks:          {}", index.len());
        }

        Ok(())
    }
}
