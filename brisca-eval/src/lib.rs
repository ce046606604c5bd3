//! brisca-eval: drives full games between ISMCTS agents and aggregates
//! experiment statistics.

use std::time::{Duration, Instant};

use brisca_core::config::{Config, SeatConfig};
use brisca_core::state::BriscolaState;
use brisca_core::{Card, RulesError};
use brisca_search::{GameState, Ismcts, ScoreMode, SearchBudget, SearchConfig, SearchError};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(&'static str),
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
    #[error("rules rejected setup: {0}")]
    Rules(#[from] RulesError),
}

/// One finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub episode_seed: u64,
    pub score: [i32; 2],
    /// `None` on a 60-60 split.
    pub winning_team: Option<u8>,
    pub plies: u32,
}

/// Per-decision details for observers.
#[derive(Debug, Clone)]
pub struct MoveInfo {
    pub ply: u32,
    pub seat: u8,
    pub card: Card,
    pub iterations: u32,
    /// Visit count of the chosen root child.
    pub best_visits: u32,
}

/// Observer hooks for CLI printing and NDJSON logging.
pub trait GameSink {
    fn on_move(&mut self, _game_idx: u32, _info: &MoveInfo) {}
    fn on_game(&mut self, _game_idx: u32, _record: &GameRecord) {}
}

/// Sink that ignores everything.
pub struct NoopSink;

impl GameSink for NoopSink {}

/// SplitMix64, used to derive independent per-game and per-seat seeds from
/// one base seed.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Translate one seat's configuration into an engine configuration.
pub fn seat_search_config(seat: &SeatConfig) -> SearchConfig {
    SearchConfig {
        budget: if seat.timed {
            SearchBudget::Time(Duration::from_millis(seat.thinking_time_ms))
        } else {
            SearchBudget::Iterations(seat.itermax)
        },
        exploration: seat.exploration,
        score_mode: if seat.score_points {
            ScoreMode::Points
        } else {
            ScoreMode::Wins
        },
    }
}

/// One engine per seat; seats beyond the configured list use defaults.
pub fn build_engines(cfg: &Config) -> Result<Vec<Ismcts<BriscolaState>>, MatchError> {
    let mut engines = Vec::with_capacity(cfg.game.players as usize);
    for seat in 0..cfg.game.players as usize {
        let sc = cfg.seats.get(seat).cloned().unwrap_or_default();
        engines.push(Ismcts::new(seat_search_config(&sc))?);
    }
    Ok(engines)
}

/// Play one full game to its terminal state.
///
/// Each seat searches with its own seeded RNG and the game's chance events
/// (dealing) use another, all derived from `episode_seed`, so a game is fully
/// reproducible from its seed.
pub fn play_game(
    engines: &mut [Ismcts<BriscolaState>],
    num_players: u8,
    episode_seed: u64,
    game_idx: u32,
    sink: &mut dyn GameSink,
) -> Result<GameRecord, MatchError> {
    if engines.len() != num_players as usize {
        return Err(MatchError::InvalidConfig("one engine per seat is required"));
    }

    let mut game_rng = ChaCha8Rng::seed_from_u64(splitmix64(episode_seed));
    let mut seat_rngs: Vec<ChaCha8Rng> = (0..num_players)
        .map(|s| ChaCha8Rng::seed_from_u64(splitmix64(episode_seed ^ (u64::from(s) + 1))))
        .collect();

    let mut state = BriscolaState::new(num_players, &mut game_rng)?;
    let mut plies = 0u32;
    loop {
        if state.legal_moves().is_empty() {
            break;
        }
        let seat = state.player_to_move();
        let res = engines[seat as usize].search(&state, &mut seat_rngs[seat as usize])?;
        state.do_move(&res.best_move, &mut game_rng);
        plies += 1;

        let best_visits = res
            .children
            .iter()
            .find(|c| c.mv == res.best_move)
            .map_or(0, |c| c.visits);
        sink.on_move(
            game_idx,
            &MoveInfo {
                ply: plies,
                seat,
                card: res.best_move,
                iterations: res.iterations,
                best_visits,
            },
        );
    }

    let winning_team = match state.score[0].cmp(&state.score[1]) {
        std::cmp::Ordering::Greater => Some(0),
        std::cmp::Ordering::Less => Some(1),
        std::cmp::Ordering::Equal => None,
    };
    let record = GameRecord {
        episode_seed,
        score: state.score,
        winning_team,
        plies,
    };
    sink.on_game(game_idx, &record);
    Ok(record)
}

/// Aggregate results over one experiment run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentReport {
    pub games: u32,
    /// Games won per team (seat parity).
    pub wins: [u32; 2],
    /// 60-60 splits.
    pub draws: u32,
    /// Mean point margin from team 0's point of view.
    pub avg_margin: f64,
    pub elapsed: Duration,
}

/// Play `config.game.games` games and aggregate team outcomes. Per-game seeds
/// are derived from the base seed, so a report is reproducible end to end.
pub fn run_experiment(cfg: &Config, sink: &mut dyn GameSink) -> Result<ExperimentReport, MatchError> {
    if cfg.game.games == 0 {
        return Err(MatchError::InvalidConfig("game.games must be > 0"));
    }
    let mut engines = build_engines(cfg)?;

    let start = Instant::now();
    let mut wins = [0u32; 2];
    let mut draws = 0u32;
    let mut margin_sum = 0i64;
    for i in 0..cfg.game.games {
        let episode_seed = splitmix64(cfg.game.seed ^ u64::from(i));
        let record = play_game(&mut engines, cfg.game.players, episode_seed, i, sink)?;
        match record.winning_team {
            Some(t) => wins[t as usize] += 1,
            None => draws += 1,
        }
        margin_sum += i64::from(record.score[0] - record.score[1]);
    }

    Ok(ExperimentReport {
        games: cfg.game.games,
        wins,
        draws,
        avg_margin: margin_sum as f64 / f64::from(cfg.game.games),
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod eval_tests;
