//! Prompt system for the Mixmentor agent.
//!
//! Every graph node runs against a fixed prompt template. Templates are
//! compiled into the binary and rendered with Handlebars variables at call
//! time; there is no per-workspace prompt loading because the node set is
//! closed.

pub mod render;
pub mod templates;

pub use render::{build_prompt, BuiltPrompt};
pub use templates::PromptTemplate;
