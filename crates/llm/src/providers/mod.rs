//! Chat provider implementations.

pub mod mock;
pub mod ollama;

pub use mock::MockChatClient;
pub use ollama::OllamaClient;
