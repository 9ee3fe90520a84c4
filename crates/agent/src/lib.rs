//! Agent graph crate for Mixmentor.
//!
//! Models the question-answering workflow as a directed graph over a shared
//! [`state::AgentState`]: retrieval, grading, generation, and rephrasing
//! steps wired together with conditional edges. Three prebuilt variants live
//! in [`builders`]; the rephrase loop is bounded by
//! [`branch::MAX_REPHRASE_ATTEMPTS`] and the walk itself by
//! [`graph::MAX_STEPS`].

pub mod branch;
pub mod builders;
pub mod graph;
pub mod nodes;
pub mod state;

pub use branch::{decide_after_relevance, decide_to_generate, RetrievalBranch, MAX_REPHRASE_ATTEMPTS};
pub use builders::{graded_graph, supervised_graph, validated_graph};
pub use graph::{Edge, Graph, GraphBuilder, Node, MAX_STEPS};
pub use state::{AgentState, GradingOutcome, Message, Role, StateUpdate};
