//! Branch selectors: the pure decision functions behind conditional edges.

use crate::state::{AgentState, GradingOutcome};

/// Rephrase attempts allowed before generation is forced regardless of
/// retrieval quality.
pub const MAX_REPHRASE_ATTEMPTS: usize = 3;

/// Where to go after grading a retrieval batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalBranch {
    Generate,
    RephraseQuery,
}

/// Decide whether to generate an answer or rephrase the query.
///
/// Generation proceeds when the current retrieval is non-empty, or when the
/// rephrase budget is exhausted, which forces a generation attempt with
/// whatever is at hand.
pub fn decide_to_generate(state: &AgentState) -> RetrievalBranch {
    if !state.documents.is_empty() || state.rephrased_queries.len() >= MAX_REPHRASE_ATTEMPTS {
        RetrievalBranch::Generate
    } else {
        RetrievalBranch::RephraseQuery
    }
}

/// Two-stage variant of the same decision, driven by the recorded relevance
/// judgment instead of batch emptiness.
pub fn decide_after_relevance(state: &AgentState) -> RetrievalBranch {
    if state.search_results_relevant || state.rephrased_queries.len() >= MAX_REPHRASE_ATTEMPTS {
        RetrievalBranch::Generate
    } else {
        RetrievalBranch::RephraseQuery
    }
}

/// Map a grading outcome to the next node name.
pub fn node_after_grading(outcome: GradingOutcome) -> &'static str {
    match outcome {
        GradingOutcome::Useful => crate::builders::WRAP_UP,
        GradingOutcome::NotUseful => crate::builders::REPHRASE_QUERY,
        GradingOutcome::NotSupported => crate::builders::EXPRESS_UNCERTAINTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_retrieval_generates() {
        let mut state = AgentState::default();
        state.documents = vec!["a tip about reverb".to_string()];

        assert_eq!(decide_to_generate(&state), RetrievalBranch::Generate);
    }

    #[test]
    fn test_empty_retrieval_rephrases() {
        let state = AgentState::default();
        assert_eq!(decide_to_generate(&state), RetrievalBranch::RephraseQuery);
    }

    #[test]
    fn test_exhausted_budget_forces_generation_despite_empty_retrieval() {
        let mut state = AgentState::default();
        state.rephrased_queries = vec!["q1".into(), "q2".into(), "q3".into()];

        assert!(state.documents.is_empty());
        assert_eq!(decide_to_generate(&state), RetrievalBranch::Generate);
    }

    #[test]
    fn test_budget_not_yet_exhausted() {
        let mut state = AgentState::default();
        state.rephrased_queries = vec!["q1".into(), "q2".into()];

        assert_eq!(decide_to_generate(&state), RetrievalBranch::RephraseQuery);
    }

    #[test]
    fn test_more_than_three_attempts_still_generates() {
        let mut state = AgentState::default();
        state.rephrased_queries = vec!["q1".into(), "q2".into(), "q3".into(), "q4".into()];

        assert_eq!(decide_to_generate(&state), RetrievalBranch::Generate);
    }

    #[test]
    fn test_relevance_branch_follows_judgment() {
        let mut state = AgentState::default();
        state.documents = vec!["irrelevant but present".to_string()];
        state.search_results_relevant = false;

        assert_eq!(
            decide_after_relevance(&state),
            RetrievalBranch::RephraseQuery
        );

        state.search_results_relevant = true;
        assert_eq!(decide_after_relevance(&state), RetrievalBranch::Generate);
    }

    #[test]
    fn test_relevance_branch_budget_exhaustion() {
        let mut state = AgentState::default();
        state.search_results_relevant = false;
        state.rephrased_queries = vec!["q1".into(), "q2".into(), "q3".into()];

        assert_eq!(decide_after_relevance(&state), RetrievalBranch::Generate);
    }
}
