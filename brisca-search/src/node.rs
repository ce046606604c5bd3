//! Node statistics for availability-adjusted UCB1.

use crate::arena::NodeId;

/// A node in the partially built game tree.
///
/// `wins` is always from the viewpoint of `player_just_moved`.
#[derive(Debug, Clone)]
pub struct SearchNode<M, P> {
    /// Move that produced this node from its parent. `None` only at the root.
    pub mv: Option<M>,
    /// Non-owning back-reference. `None` only at the root.
    pub parent: Option<NodeId>,
    /// Children in expansion order. Moves are unique across siblings,
    /// enforced by the expansion protocol.
    pub children: Vec<NodeId>,
    /// Accumulated outcome, possibly fractional or point-valued.
    pub wins: f64,
    /// Backpropagation updates applied to this node.
    pub visits: u32,
    /// Times this node was a legal candidate during selection, chosen or not.
    pub avails: u32,
    /// Player who made `mv`. `None` only at the root.
    pub player_just_moved: Option<P>,
}

impl<M, P> SearchNode<M, P> {
    pub fn root() -> Self {
        Self {
            mv: None,
            parent: None,
            children: Vec::new(),
            wins: 0.0,
            visits: 0,
            avails: 1,
            player_just_moved: None,
        }
    }

    pub fn child(mv: M, parent: NodeId, player_just_moved: P) -> Self {
        Self {
            mv: Some(mv),
            parent: Some(parent),
            children: Vec::new(),
            wins: 0.0,
            visits: 0,
            avails: 1,
            player_just_moved: Some(player_just_moved),
        }
    }

    /// Availability-adjusted UCB1 score.
    ///
    /// `avails` stands in for the plain parent-visit count of textbook UCB1:
    /// it counts how often this child was on offer across determinizations,
    /// which keeps the exploration term sound when legal-move sets differ
    /// between iterations.
    ///
    /// # Preconditions
    /// - `visits > 0`. The calling protocol guarantees this: a child is
    ///   backpropagated in the same iteration that creates it.
    pub fn ucb1(&self, exploration: f64) -> f64 {
        debug_assert!(self.visits > 0);
        let visits = f64::from(self.visits);
        self.wins / visits + exploration * (f64::from(self.avails).ln() / visits).sqrt()
    }

    /// Fold one terminal outcome into this node. The root carries no
    /// `player_just_moved`, passes `None`, and only counts the visit.
    pub fn update(&mut self, reward: Option<f64>) {
        self.visits += 1;
        if let Some(r) = reward {
            self.wins += r;
        }
    }
}
