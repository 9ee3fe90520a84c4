//! Graph node implementations.
//!
//! Each LLM-backed node issues one or two chat calls with a fixed prompt from
//! `mixmentor-prompt` and a typed serde extraction schema. Nodes hold shared
//! handles (`Arc<dyn ChatClient>`, `Arc<Retriever>`) and are wired together by
//! the builders in [`crate::builders`].

pub mod answer_grading;
pub mod generate;
pub mod grading;
pub mod rephrase;
pub mod retrieve;
pub mod supervise;
pub mod terminal;
pub mod user_intent;

pub use answer_grading::{GradeAnswer, ValidateGeneration};
pub use generate::Generate;
pub use grading::{CheckRelevance, GradeDocuments};
pub use rephrase::RephraseQuery;
pub use retrieve::Retrieve;
pub use supervise::Supervise;
pub use terminal::{ExpressUncertainty, WrapUp};
pub use user_intent::UserIntent;

use crate::state::{Message, Role};

/// Render conversation turns for prompt injection.
pub(crate) fn format_chat_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let speaker = match message.role {
                Role::Human => "Human",
                Role::Ai => "AI",
            };
            format!("{}: {}", speaker, message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a retrieval batch for prompt injection.
pub(crate) fn join_documents(documents: &[String]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("[Document {}]\n{}", i + 1, doc))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_chat_history() {
        let messages = vec![
            Message::human("How do I widen a pad?"),
            Message::ai("Try a short stereo delay."),
        ];

        let rendered = format_chat_history(&messages);
        assert_eq!(
            rendered,
            "Human: How do I widen a pad?\nAI: Try a short stereo delay."
        );
    }

    #[test]
    fn test_join_documents() {
        let docs = vec!["first".to_string(), "second".to_string()];
        let rendered = join_documents(&docs);

        assert!(rendered.contains("[Document 1]\nfirst"));
        assert!(rendered.contains("[Document 2]\nsecond"));
        assert!(rendered.contains("---"));
    }
}
