//! brisca-core: Briscola rules, cards, and match configuration.

pub mod card;
pub mod config;
pub mod state;

pub use card::{new_deck, Card, Rank, Suit};
pub use config::{Config, ConfigError, GameConfig, SeatConfig};
pub use state::{team_of, BriscolaState, RulesError};

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

#[cfg(test)]
mod card_tests;
