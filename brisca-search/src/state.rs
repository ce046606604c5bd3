//! The capability contract a game must expose to the search engine.

use rand_chacha::ChaCha8Rng;
use std::fmt;

/// How a terminal state is scored during backpropagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// 1.0 if the player's side won, else 0.0.
    Wins,
    /// Signed point differential from the player's point of view.
    Points,
}

/// One player's view of a sequential, turn-based game.
///
/// `Clone` must produce a deep, independent copy: sharing any mutable
/// container (hands, piles, table contents) between a state and its clone
/// breaks iteration independence and corrupts search statistics.
///
/// All randomness is drawn from an injected, seedable RNG rather than a
/// process-global source, so searches are reproducible per seed.
pub trait GameState: Clone {
    /// A legal move. Equality is how tree edges are matched against
    /// legal-move lists.
    type Move: Clone + PartialEq + fmt::Debug;
    /// A player identity.
    type Player: Copy + Eq + fmt::Debug;

    /// The player whose legal moves [`GameState::legal_moves`] currently
    /// enumerates.
    fn player_to_move(&self) -> Self::Player;

    /// Deep copy in which every piece of information hidden from `observer`
    /// is resampled uniformly at random, consistent with everything already
    /// revealed. Information visible to `observer` (their own holdings,
    /// public history) must be preserved exactly.
    fn clone_and_randomize(&self, observer: Self::Player, rng: &mut ChaCha8Rng) -> Self;

    /// Legal moves for the current player, empty exactly when the state is
    /// terminal.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Apply `mv` and advance whose turn it is. Chance events (dealing,
    /// drawing) take their randomness from `rng`.
    ///
    /// Must be a total function over the sequence just returned by
    /// [`GameState::legal_moves`].
    fn do_move(&mut self, mv: &Self::Move, rng: &mut ChaCha8Rng);

    /// Outcome for `player` on a terminal state: a point differential in
    /// [`ScoreMode::Points`], a 0/1 win indicator in [`ScoreMode::Wins`].
    /// Behavior is undefined on non-terminal states.
    fn result(&self, player: Self::Player, mode: ScoreMode) -> f64;
}
