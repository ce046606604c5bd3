use crate::{
    build_engines, play_game, run_experiment, seat_search_config, GameRecord, GameSink, MatchError,
    MoveInfo, NoopSink,
};
use brisca_core::config::{Config, GameConfig, SeatConfig};
use brisca_core::state::BriscolaState;
use brisca_core::new_deck;
use brisca_search::{Ismcts, ScoreMode, SearchBudget, SearchConfig};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::time::Duration;

fn tiny_config(players: u8, games: u32, seed: u64) -> Config {
    Config {
        game: GameConfig {
            players,
            games,
            seed,
        },
        seats: vec![
            SeatConfig {
                itermax: 10,
                ..SeatConfig::default()
            };
            players as usize
        ],
    }
}

#[test]
fn seat_config_maps_to_search_config() {
    let iter_seat = SeatConfig {
        itermax: 42,
        exploration: 1.1,
        ..SeatConfig::default()
    };
    let sc = seat_search_config(&iter_seat);
    assert_eq!(sc.budget, SearchBudget::Iterations(42));
    assert!((sc.exploration - 1.1).abs() < 1e-12);
    assert_eq!(sc.score_mode, ScoreMode::Wins);

    let timed_seat = SeatConfig {
        timed: true,
        thinking_time_ms: 250,
        score_points: true,
        ..SeatConfig::default()
    };
    let sc = seat_search_config(&timed_seat);
    assert_eq!(sc.budget, SearchBudget::Time(Duration::from_millis(250)));
    assert_eq!(sc.score_mode, ScoreMode::Points);
}

#[test]
fn play_game_accounts_for_every_card_and_point() {
    let cfg = tiny_config(2, 1, 3);
    let mut engines = build_engines(&cfg).unwrap();
    let record = play_game(&mut engines, 2, 77, 0, &mut NoopSink).unwrap();

    assert_eq!(record.plies, 40);
    assert_eq!(record.score[0] + record.score[1], 120);
    match record.winning_team {
        Some(t) => assert!(record.score[t as usize] > 60),
        None => assert_eq!(record.score, [60, 60]),
    }
}

#[test]
fn play_game_requires_one_engine_per_seat() {
    let cfg = tiny_config(2, 1, 3);
    let mut engines = build_engines(&cfg).unwrap();
    let err = play_game(&mut engines, 4, 77, 0, &mut NoopSink).err().unwrap();
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

struct CountingSink {
    moves: u32,
    games: u32,
    last_record: Option<GameRecord>,
}

impl GameSink for CountingSink {
    fn on_move(&mut self, _game_idx: u32, info: &MoveInfo) {
        self.moves += 1;
        assert!(info.iterations >= 1);
        assert!(info.best_visits >= 1);
    }

    fn on_game(&mut self, _game_idx: u32, record: &GameRecord) {
        self.games += 1;
        self.last_record = Some(*record);
    }
}

#[test]
fn sink_sees_every_move_and_game() {
    let cfg = tiny_config(2, 2, 5);
    let mut sink = CountingSink {
        moves: 0,
        games: 0,
        last_record: None,
    };
    let report = run_experiment(&cfg, &mut sink).unwrap();

    assert_eq!(report.games, 2);
    assert_eq!(sink.games, 2);
    assert_eq!(sink.moves, 80);
    assert!(sink.last_record.is_some());
}

#[test]
fn experiments_are_reproducible_from_the_base_seed() {
    let cfg = tiny_config(2, 3, 12345);
    let a = run_experiment(&cfg, &mut NoopSink).unwrap();
    let b = run_experiment(&cfg, &mut NoopSink).unwrap();

    assert_eq!(a.wins, b.wins);
    assert_eq!(a.draws, b.draws);
    assert!((a.avg_margin - b.avg_margin).abs() < 1e-12);
    assert_eq!(a.wins[0] + a.wins[1] + a.draws, 3);
}

#[test]
fn zero_games_is_rejected() {
    let cfg = tiny_config(2, 0, 1);
    let err = run_experiment(&cfg, &mut NoopSink).err().unwrap();
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

/// A seat holding a single card must get that card back from the search,
/// whatever the budget.
#[test]
fn forced_card_is_always_chosen() {
    let deck = new_deck();
    let forced = deck[0];
    let last_card = deck[2];
    let state = BriscolaState {
        num_players: 2,
        player_to_move: 0,
        player_starting: 0,
        hands: vec![vec![forced], vec![deck[1]]],
        table: Vec::new(),
        discarded: deck[3..].to_vec(),
        last_card,
        trump_suit: last_card.suit,
        score: [30, 53],
    };

    for itermax in [1u32, 20, 200] {
        let mut engine: Ismcts<BriscolaState> = Ismcts::new(SearchConfig {
            budget: SearchBudget::Iterations(itermax),
            ..SearchConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(itermax));
        let res = engine.search(&state, &mut rng).unwrap();
        assert_eq!(res.best_move, forced);
    }
}

/// 200 completed iterations over a fresh three-card hand: the root children's
/// visits account for every iteration and availability never lags visits.
#[test]
fn two_hundred_iterations_spread_over_three_children() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let state = BriscolaState::new(2, &mut rng).unwrap();

    let mut engine: Ismcts<BriscolaState> = Ismcts::new(SearchConfig {
        budget: SearchBudget::Iterations(200),
        ..SearchConfig::default()
    })
    .unwrap();
    let mut search_rng = ChaCha8Rng::seed_from_u64(1);
    let res = engine.search(&state, &mut search_rng).unwrap();

    assert_eq!(res.iterations, 200);
    assert_eq!(res.children.len(), 3);
    let visit_sum: u32 = res.children.iter().map(|c| c.visits).sum();
    assert_eq!(visit_sum, 200);
    for c in &res.children {
        assert!(c.avails >= c.visits);
    }
}
