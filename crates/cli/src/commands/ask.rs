//! Ask command handler.
//!
//! Runs one question through the agent graph and prints the final answer.

use clap::Args;
use mixmentor_agent::{graded_graph, supervised_graph, validated_graph, AgentState, Graph};
use mixmentor_core::{config::AppConfig, AppError, AppResult};
use mixmentor_knowledge::{LlmReranker, Retriever, VectorIndex};
use mixmentor_llm::create_client;
use std::path::PathBuf;
use std::sync::Arc;

/// Ask a music production question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Index to retrieve from (default: corpus file stem from config)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Graph variant (graded, validated, supervised)
    #[arg(long, default_value = "graded")]
    pub variant: String,

    /// Skip LLM reranking of retrieved chunks
    #[arg(long)]
    pub no_rerank: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self
            .get_question()?
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        // Load the persisted index
        let index_name = super::resolve_index_name(config, self.name.as_deref())?;
        let index = VectorIndex::load(&config.index_dir(&index_name))?;

        // Chat client for graph nodes and the reranker
        let endpoint = super::resolve_endpoint(config);
        let api_key = config.resolve_api_key(&config.provider);
        let chat = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())?;

        // Retriever: embed -> vector search -> optional rerank
        let embedder = super::build_embedder(config)?;
        let mut retriever = Retriever::new(
            index,
            embedder,
            config.retrieval.top_k,
            config.retrieval.top_n,
        );
        if !self.no_rerank {
            retriever = retriever
                .with_reranker(Arc::new(LlmReranker::new(chat.clone(), &config.model)));
        }

        let graph = self.build_graph(config, chat, Arc::new(retriever))?;

        tracing::info!(variant = %self.variant, index = %index_name, "Running agent graph");

        let state = graph.run(AgentState::from_question(&question)).await?;

        let answer = state
            .answer
            .ok_or_else(|| AppError::Agent("Graph walk ended without an answer".to_string()))?;

        if self.json {
            let output = serde_json::json!({
                "answer": answer,
                "question": question,
                "provider": config.provider,
                "model": config.model,
                "variant": self.variant,
                "documentsRetrieved": state.documents.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer);
        }

        Ok(())
    }

    fn build_graph(
        &self,
        config: &AppConfig,
        chat: Arc<dyn mixmentor_llm::ChatClient>,
        retriever: Arc<Retriever>,
    ) -> AppResult<Graph> {
        match self.variant.as_str() {
            "graded" => graded_graph(chat, &config.model, retriever),
            "validated" => validated_graph(chat, &config.model, retriever),
            "supervised" => supervised_graph(chat, &config.model, retriever),
            other => Err(AppError::Config(format!(
                "Unknown graph variant: {}. Supported: graded, validated, supervised",
                other
            ))),
        }
    }

    /// Get the question text from the positional argument or a file.
    fn get_question(&self) -> AppResult<Option<String>> {
        if let Some(ref question) = self.question {
            return Ok(Some(question.clone()));
        }

        if let Some(ref path) = self.file {
            let text = std::fs::read_to_string(path)?;
            return Ok(Some(text.trim().to_string()));
        }

        Ok(None)
    }
}
