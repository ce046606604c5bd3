//! The ISMCTS loop: determinize, select, expand, simulate, backpropagate.

use crate::arena::{Arena, NodeId};
use crate::node::SearchNode;
use crate::state::{GameState, ScoreMode};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Search budget for one call to [`Ismcts::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Run exactly this many iterations.
    Iterations(u32),
    /// Run iterations until the deadline elapses, checked at iteration
    /// boundaries only. An iteration in flight when the deadline passes
    /// always runs to completion.
    Time(Duration),
}

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub budget: SearchBudget,
    /// UCB1 exploration constant, approximately sqrt(2)/2 by default.
    pub exploration: f64,
    pub score_mode: ScoreMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::Iterations(100),
            exploration: 0.7,
            score_mode: ScoreMode::Wins,
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid config: {msg}")]
    InvalidConfig { msg: &'static str },
    #[error("root state has no legal moves")]
    NoLegalMoves,
    #[error("budget completed no iterations")]
    NoCompletedIterations,
}

/// Counters for one completed search.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub node_count: usize,
    pub expansions: u32,
    pub rollout_moves: u64,
}

/// Per-root-child statistics, in expansion order.
#[derive(Debug, Clone)]
pub struct RootChildStats<M> {
    pub mv: M,
    pub visits: u32,
    pub avails: u32,
    pub wins: f64,
}

/// Outcome of one search call.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// The most-visited root child's move. Visit count is used instead of
    /// win rate because it is more robust to outcome variance.
    pub best_move: M,
    pub iterations: u32,
    pub elapsed: Duration,
    pub children: Vec<RootChildStats<M>>,
    pub stats: SearchStats,
}

/// One ISMCTS engine instance.
///
/// Single-threaded and synchronous: a search runs to completion on the
/// calling thread. Concurrent searches require wholly independent engine
/// instances and RNGs.
pub struct Ismcts<G: GameState> {
    cfg: SearchConfig,
    arena: Arena<G::Move, G::Player>,
    stats: SearchStats,
}

impl<G: GameState> Ismcts<G> {
    pub fn new(cfg: SearchConfig) -> Result<Self, SearchError> {
        if !(cfg.exploration.is_finite() && cfg.exploration >= 0.0) {
            return Err(SearchError::InvalidConfig {
                msg: "exploration must be finite and >= 0",
            });
        }
        match cfg.budget {
            SearchBudget::Iterations(0) => {
                return Err(SearchError::InvalidConfig {
                    msg: "budget must allow at least one iteration",
                });
            }
            SearchBudget::Time(d) if d.is_zero() => {
                return Err(SearchError::InvalidConfig {
                    msg: "thinking time must be non-zero",
                });
            }
            _ => {}
        }
        Ok(Self {
            cfg,
            arena: Arena::new(),
            stats: SearchStats::default(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Read access to the tree built by the last search, for diagnostics.
    pub fn tree(&self) -> &Arena<G::Move, G::Player> {
        &self.arena
    }

    /// Run one full search from `root_state` and return the recommended move.
    ///
    /// The tree is rebuilt from scratch on every call; no statistics persist
    /// between searches. `rng` drives determinization, expansion choice,
    /// rollouts, and any chance events inside `do_move`, so a fixed seed
    /// reproduces the search exactly.
    pub fn search(
        &mut self,
        root_state: &G,
        rng: &mut ChaCha8Rng,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        if root_state.legal_moves().is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        self.arena.clear();
        self.stats = SearchStats::default();
        let root = self.arena.push(SearchNode::root());

        let start = Instant::now();
        let mut iterations = 0u32;
        loop {
            match self.cfg.budget {
                SearchBudget::Iterations(n) => {
                    if iterations >= n {
                        break;
                    }
                }
                SearchBudget::Time(limit) => {
                    if start.elapsed() >= limit {
                        break;
                    }
                }
            }
            self.run_iteration(root, root_state, rng);
            iterations += 1;
        }
        self.stats.node_count = self.arena.len();

        let children: Vec<RootChildStats<G::Move>> = self
            .arena
            .get(root)
            .children
            .iter()
            .map(|&c| {
                let n = self.arena.get(c);
                RootChildStats {
                    mv: n.mv.clone().expect("non-root child carries a move"),
                    visits: n.visits,
                    avails: n.avails,
                    wins: n.wins,
                }
            })
            .collect();

        // First maximal child wins ties, matching the selection policy.
        let mut best: Option<&RootChildStats<G::Move>> = None;
        for c in &children {
            if best.map_or(true, |b| c.visits > b.visits) {
                best = Some(c);
            }
        }
        let best_move = best
            .ok_or(SearchError::NoCompletedIterations)?
            .mv
            .clone();

        Ok(SearchResult {
            best_move,
            iterations,
            elapsed: start.elapsed(),
            children,
            stats: self.stats,
        })
    }

    fn run_iteration(&mut self, root: NodeId, root_state: &G, rng: &mut ChaCha8Rng) {
        // Determinize: one fresh full-information sample of the deciding
        // player's information set per iteration.
        let mut state = root_state.clone_and_randomize(root_state.player_to_move(), rng);
        let mut node = root;

        // Select until this determinization still offers an untried move,
        // then expand it. Legal-move sets can differ between iterations, so
        // "fully expanded" is always relative to the current sample.
        loop {
            let legal = state.legal_moves();
            if legal.is_empty() {
                break;
            }
            let untried = self.untried_moves(node, &legal);
            if let Some(mv) = untried.choose(rng) {
                let mv = mv.clone();
                let player = state.player_to_move();
                state.do_move(&mv, rng);
                node = self.add_child(node, mv, player);
                self.stats.expansions += 1;
                break;
            }
            let (child, mv) = self.select_child(node, &legal);
            state.do_move(&mv, rng);
            node = child;
        }

        // Simulate: uniform random playout to a terminal state, no tree
        // growth.
        loop {
            let legal = state.legal_moves();
            match legal.choose(rng) {
                Some(mv) => {
                    state.do_move(mv, rng);
                    self.stats.rollout_moves += 1;
                }
                None => break,
            }
        }

        // Backpropagate along parent links, root inclusive.
        let mut cur = Some(node);
        while let Some(id) = cur {
            let reward = self
                .arena
                .get(id)
                .player_just_moved
                .map(|p| state.result(p, self.cfg.score_mode));
            let n = self.arena.get_mut(id);
            n.update(reward);
            cur = n.parent;
        }
    }

    /// Moves in `legal` that have no child edge yet at `node`.
    fn untried_moves(&self, node: NodeId, legal: &[G::Move]) -> Vec<G::Move> {
        let n = self.arena.get(node);
        legal
            .iter()
            .filter(|m| {
                !n.children
                    .iter()
                    .any(|&c| self.arena.get(c).mv.as_ref() == Some(*m))
            })
            .cloned()
            .collect()
    }

    /// Pick the legal child maximizing availability-adjusted UCB1, then bump
    /// `avails` on every legal child, chosen or not. Ties keep the first
    /// maximal child encountered; the tie-break is order-dependent on
    /// purpose and documented as such.
    fn select_child(&mut self, node: NodeId, legal: &[G::Move]) -> (NodeId, G::Move) {
        let legal_children: Vec<NodeId> = self
            .arena
            .get(node)
            .children
            .iter()
            .copied()
            .filter(|&c| {
                self.arena
                    .get(c)
                    .mv
                    .as_ref()
                    .map_or(false, |m| legal.contains(m))
            })
            .collect();

        let mut best: Option<(NodeId, f64)> = None;
        for &c in &legal_children {
            let score = self.arena.get(c).ucb1(self.cfg.exploration);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((c, score));
            }
        }
        for &c in &legal_children {
            self.arena.get_mut(c).avails += 1;
        }

        // Selection only runs once every legal move has a child, so there is
        // always a candidate.
        let (chosen, _) = best.expect("select_child requires a fully expanded node");
        let mv = self
            .arena
            .get(chosen)
            .mv
            .clone()
            .expect("non-root child carries a move");
        (chosen, mv)
    }

    fn add_child(&mut self, parent: NodeId, mv: G::Move, player: G::Player) -> NodeId {
        debug_assert!(
            !self
                .arena
                .get(parent)
                .children
                .iter()
                .any(|&c| self.arena.get(c).mv.as_ref() == Some(&mv)),
            "duplicate child move"
        );
        let id = self.arena.push(SearchNode::child(mv, parent, player));
        self.arena.get_mut(parent).children.push(id);
        id
    }
}
