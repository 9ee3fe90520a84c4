//! Directed graph runner with conditional edges.
//!
//! Nodes are async steps over the shared [`AgentState`]; edges are either
//! fixed or chosen by a branch function after the node's update is merged.
//! The walk is strictly sequential: one node, one in-flight request at a time.

use crate::state::{AgentState, StateUpdate};
use mixmentor_core::{AppError, AppResult};
use std::collections::HashMap;

/// Hard ceiling on graph steps per walk.
///
/// The rephrase budget bounds the loop in practice; this catches a
/// miswired graph or a judgment loop that never classifies an answer as
/// useful.
pub const MAX_STEPS: usize = 25;

/// A single graph step.
#[async_trait::async_trait]
pub trait Node: Send + Sync {
    /// Execute the step and return a partial state update.
    async fn run(&self, state: &AgentState) -> AppResult<StateUpdate>;
}

/// Outgoing edge of a node.
pub enum Edge {
    /// Unconditional transition
    To(&'static str),

    /// Transition chosen by a branch function over the merged state
    Branch(Box<dyn Fn(&AgentState) -> &'static str + Send + Sync>),

    /// Terminal node
    End,
}

/// A compiled agent graph.
pub struct Graph {
    entry: &'static str,
    nodes: HashMap<&'static str, Box<dyn Node>>,
    edges: HashMap<&'static str, Edge>,
}

impl Graph {
    /// Walk the graph from the entry node until a terminal edge.
    pub async fn run(&self, mut state: AgentState) -> AppResult<AgentState> {
        let mut current = self.entry;

        for step in 0..MAX_STEPS {
            let node = self.nodes.get(current).ok_or_else(|| {
                AppError::Agent(format!("Graph references unknown node '{}'", current))
            })?;

            tracing::debug!(step, node = current, "Running graph node");

            let update = node.run(&state).await?;
            state.apply(update);

            match self.edges.get(current) {
                None | Some(Edge::End) => {
                    tracing::info!(steps = step + 1, terminal = current, "Graph walk finished");
                    return Ok(state);
                }
                Some(Edge::To(next)) => current = next,
                Some(Edge::Branch(select)) => {
                    let next = select(&state);
                    tracing::debug!(from = current, to = next, "Conditional edge taken");
                    current = next;
                }
            }
        }

        Err(AppError::Agent(format!(
            "Graph walk exceeded {} steps without reaching a terminal node",
            MAX_STEPS
        )))
    }
}

/// Builder for [`Graph`].
#[derive(Default)]
pub struct GraphBuilder {
    entry: Option<&'static str>,
    nodes: HashMap<&'static str, Box<dyn Node>>,
    edges: HashMap<&'static str, Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under a name.
    pub fn add_node(mut self, name: &'static str, node: impl Node + 'static) -> Self {
        self.nodes.insert(name, Box::new(node));
        self
    }

    /// Add an unconditional edge.
    pub fn add_edge(mut self, from: &'static str, to: &'static str) -> Self {
        self.edges.insert(from, Edge::To(to));
        self
    }

    /// Add a conditional edge driven by a branch function.
    pub fn add_conditional_edge(
        mut self,
        from: &'static str,
        select: impl Fn(&AgentState) -> &'static str + Send + Sync + 'static,
    ) -> Self {
        self.edges.insert(from, Edge::Branch(Box::new(select)));
        self
    }

    /// Mark a node as terminal.
    pub fn add_terminal(mut self, name: &'static str) -> Self {
        self.edges.insert(name, Edge::End);
        self
    }

    /// Set the entry node.
    pub fn set_entry(mut self, name: &'static str) -> Self {
        self.entry = Some(name);
        self
    }

    /// Validate wiring and build the graph.
    pub fn build(self) -> AppResult<Graph> {
        let entry = self
            .entry
            .ok_or_else(|| AppError::Agent("Graph has no entry node".to_string()))?;

        if !self.nodes.contains_key(entry) {
            return Err(AppError::Agent(format!(
                "Entry node '{}' is not registered",
                entry
            )));
        }

        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(AppError::Agent(format!(
                    "Edge from unregistered node '{}'",
                    from
                )));
            }
            if let Edge::To(to) = edge {
                if !self.nodes.contains_key(to) {
                    return Err(AppError::Agent(format!(
                        "Edge from '{}' to unregistered node '{}'",
                        from, to
                    )));
                }
            }
        }

        Ok(Graph {
            entry,
            nodes: self.nodes,
            edges: self.edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Message;

    /// Test node that appends a fixed AI message.
    struct Say(&'static str);

    #[async_trait::async_trait]
    impl Node for Say {
        async fn run(&self, _state: &AgentState) -> AppResult<StateUpdate> {
            Ok(StateUpdate {
                messages: vec![Message::ai(self.0)],
                ..StateUpdate::default()
            })
        }
    }

    /// Test node that appends one rephrased query.
    struct PushQuery;

    #[async_trait::async_trait]
    impl Node for PushQuery {
        async fn run(&self, state: &AgentState) -> AppResult<StateUpdate> {
            let mut queries = state.rephrased_queries.clone();
            queries.push(format!("rewrite {}", queries.len() + 1));
            Ok(StateUpdate {
                rephrased_queries: Some(queries),
                ..StateUpdate::default()
            })
        }
    }

    #[tokio::test]
    async fn test_linear_walk() {
        let graph = GraphBuilder::new()
            .add_node("a", Say("from a"))
            .add_node("b", Say("from b"))
            .add_edge("a", "b")
            .add_terminal("b")
            .set_entry("a")
            .build()
            .unwrap();

        let state = graph.run(AgentState::default()).await.unwrap();

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].content, "from a");
        assert_eq!(state.messages[1].content, "from b");
    }

    #[tokio::test]
    async fn test_conditional_edge_bounded_loop() {
        // Loop on "rewrite" until three queries accumulate, then stop
        let graph = GraphBuilder::new()
            .add_node("rewrite", PushQuery)
            .add_node("done", Say("done"))
            .add_conditional_edge("rewrite", |state| {
                if state.rephrased_queries.len() >= 3 {
                    "done"
                } else {
                    "rewrite"
                }
            })
            .add_terminal("done")
            .set_entry("rewrite")
            .build()
            .unwrap();

        let state = graph.run(AgentState::default()).await.unwrap();

        assert_eq!(state.rephrased_queries.len(), 3);
        assert_eq!(state.messages.last().unwrap().content, "done");
    }

    #[tokio::test]
    async fn test_step_ceiling_breaks_unbounded_loop() {
        let graph = GraphBuilder::new()
            .add_node("spin", Say("again"))
            .add_conditional_edge("spin", |_| "spin")
            .set_entry("spin")
            .build()
            .unwrap();

        let result = graph.run(AgentState::default()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_build_rejects_missing_entry() {
        assert!(GraphBuilder::new().add_node("a", Say("x")).build().is_err());
    }

    #[test]
    fn test_build_rejects_dangling_edge() {
        let result = GraphBuilder::new()
            .add_node("a", Say("x"))
            .add_edge("a", "missing")
            .set_entry("a")
            .build();
        assert!(result.is_err());
    }
}
