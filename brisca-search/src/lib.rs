//! brisca-search: Information Set MCTS for turn-based games with hidden information.
//!
//! The engine is generic over a [`GameState`] contract and searches over
//! determinizations: each iteration samples one full-information state
//! consistent with the deciding player's information set, then runs one
//! select/expand/simulate/backpropagate pass on a tree whose statistics
//! aggregate across determinizations. Child selection uses UCB1 adjusted by
//! an availability count instead of the plain parent-visit count, so moves
//! that are not legal in every determinization are discounted correctly.

pub mod arena;
pub mod node;
pub mod search;
pub mod state;

pub use arena::{Arena, NodeId};
pub use node::SearchNode;
pub use search::{
    Ismcts, RootChildStats, SearchBudget, SearchConfig, SearchError, SearchResult, SearchStats,
};
pub use state::{GameState, ScoreMode};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
