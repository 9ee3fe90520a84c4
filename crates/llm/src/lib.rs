//! LLM integration crate for the Mixmentor agent.
//!
//! This crate provides a provider-agnostic abstraction for chat-completion
//! calls. It supports multiple providers through a unified trait-based
//! interface and adds structured JSON extraction on top of plain completions,
//! which is how every grading node in the agent gets a typed verdict out of
//! free-text model output.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **Mock**: Scripted responses for tests and offline runs
//!
//! # Example
//! ```no_run
//! use mixmentor_llm::{ChatClient, ChatRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = ChatRequest::new("How do I sidechain a bass?", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod extract;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatClient, ChatRequest, ChatResponse, ChatUsage};
pub use extract::{complete_extract, extract_json};
pub use factory::create_client;
pub use providers::{MockChatClient, OllamaClient};
