//! Match configuration shared by the CLI and the experiment harness.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Table-level settings.
    #[serde(default)]
    pub game: GameConfig,
    /// Per-seat engine settings, in seat order. Missing seats use defaults.
    #[serde(default)]
    pub seats: Vec<SeatConfig>,
}

/// Table-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GameConfig {
    /// Number of seats at the table (2 or 4).
    #[serde(default = "default_players")]
    pub players: u8,
    /// Number of games to play.
    #[serde(default = "default_games")]
    pub games: u32,
    /// Base seed; per-game and per-seat seeds are derived from it.
    #[serde(default)]
    pub seed: u64,
}

fn default_players() -> u8 {
    4
}

fn default_games() -> u32 {
    1
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            games: default_games(),
            seed: 0,
        }
    }
}

/// Per-seat search engine settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeatConfig {
    /// If true, budget decisions by `thinking_time_ms` instead of `itermax`.
    #[serde(default)]
    pub timed: bool,
    /// Iteration budget per decision.
    #[serde(default = "default_itermax")]
    pub itermax: u32,
    /// Wall-clock budget per decision, in milliseconds.
    #[serde(default = "default_thinking_time_ms")]
    pub thinking_time_ms: u64,
    /// UCB1 exploration constant.
    #[serde(default = "default_exploration")]
    pub exploration: f64,
    /// If true, back up point differentials instead of win indicators.
    #[serde(default)]
    pub score_points: bool,
}

fn default_itermax() -> u32 {
    100
}

fn default_thinking_time_ms() -> u64 {
    5000
}

fn default_exploration() -> f64 {
    0.7
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            timed: false,
            itermax: default_itermax(),
            thinking_time_ms: default_thinking_time_ms(),
            exploration: default_exploration(),
            score_points: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seats: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_default_yaml() {
        let config =
            Config::load("../configs/default.yaml").expect("failed to load configs/default.yaml");

        assert_eq!(config.game.players, 4);
        assert_eq!(config.game.games, 100);
        assert_eq!(config.game.seed, 0);
        assert_eq!(config.seats.len(), 4);
        assert_eq!(config.seats[0].itermax, 200);
        assert_eq!(config.seats[1].itermax, 100);
        assert!(config.seats[2].score_points);
        assert!(!config.seats[3].timed);
    }

    #[test]
    fn parse_yaml_string_applies_defaults() {
        let yaml = r#"
game:
  players: 2
  games: 10

seats:
  - itermax: 50
  - timed: true
    thinking_time_ms: 250
"#;
        let config = Config::from_yaml(yaml).expect("failed to parse YAML");
        assert_eq!(config.game.players, 2);
        assert_eq!(config.game.games, 10);
        assert_eq!(config.game.seed, 0);

        assert_eq!(config.seats[0].itermax, 50);
        assert!(!config.seats[0].timed);
        assert_eq!(config.seats[0].thinking_time_ms, 5000);
        assert!((config.seats[0].exploration - 0.7).abs() < 1e-12);

        assert!(config.seats[1].timed);
        assert_eq!(config.seats[1].thinking_time_ms, 250);
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        let config = Config::from_yaml("{}").expect("failed to parse YAML");
        assert_eq!(config.game.players, 4);
        assert_eq!(config.game.games, 1);
        assert!(config.seats.is_empty());
    }

    #[test]
    fn invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        assert!(Config::from_yaml(invalid_yaml).is_err());
    }
}
