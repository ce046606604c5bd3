//! brisca: CLI driver for ISMCTS Briscola matches.
//!
//! Subcommands:
//! - play          Play one game, printing every decision
//! - experiment    Play many games and aggregate team outcomes

use std::env;
use std::process;

use brisca_core::config::{Config, SeatConfig};
use brisca_eval::{
    build_engines, play_game, run_experiment, splitmix64, GameRecord, GameSink, MoveInfo,
};
use brisca_logging::{
    now_ms, ExperimentSummaryEventV1, GameResultEventV1, NdjsonError, NdjsonWriter,
    SearchMoveEventV1, LOG_SCHEMA_VERSION,
};

#[derive(Default)]
struct CliOpts {
    config_path: Option<String>,
    players: Option<u8>,
    games: Option<u32>,
    seed: Option<u64>,
    itermax: Option<u32>,
    timed: bool,
    thinking_time_ms: Option<u64>,
    points: bool,
    log_path: Option<String>,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i + 1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("Invalid or missing value for {}", flag);
            process::exit(1);
        })
}

fn parse_opts(cmd: &str, args: &[String], help: &str) -> CliOpts {
    let mut opts = CliOpts::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("{}", help);
                process::exit(0);
            }
            "--config" => {
                opts.config_path = Some(args.get(i + 1).cloned().unwrap_or_else(|| {
                    eprintln!("Missing value for --config");
                    process::exit(1);
                }));
                i += 2;
            }
            "--players" => {
                opts.players = Some(parse_value(args, i, "--players"));
                i += 2;
            }
            "--games" => {
                opts.games = Some(parse_value(args, i, "--games"));
                i += 2;
            }
            "--seed" => {
                opts.seed = Some(parse_value(args, i, "--seed"));
                i += 2;
            }
            "--itermax" => {
                opts.itermax = Some(parse_value(args, i, "--itermax"));
                i += 2;
            }
            "--timed" => {
                opts.timed = true;
                i += 1;
            }
            "--thinking-time-ms" => {
                opts.thinking_time_ms = Some(parse_value(args, i, "--thinking-time-ms"));
                i += 2;
            }
            "--points" => {
                opts.points = true;
                i += 1;
            }
            "--log" => {
                opts.log_path = Some(args.get(i + 1).cloned().unwrap_or_else(|| {
                    eprintln!("Missing value for --log");
                    process::exit(1);
                }));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `brisca {}`: {}", cmd, other);
                eprintln!("Run `brisca {} --help` for usage.", cmd);
                process::exit(1);
            }
        }
    }
    opts
}

/// Build the effective config: file (if any), then flag overrides. Engine
/// flags apply to every seat.
fn effective_config(opts: &CliOpts) -> Config {
    let mut cfg = match &opts.config_path {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config {}: {}", path, e);
            process::exit(1);
        }),
        None => Config::default(),
    };

    if let Some(p) = opts.players {
        cfg.game.players = p;
    }
    if let Some(g) = opts.games {
        cfg.game.games = g;
    }
    if let Some(s) = opts.seed {
        cfg.game.seed = s;
    }

    let seats = cfg.game.players as usize;
    if cfg.seats.len() < seats {
        cfg.seats.resize_with(seats, SeatConfig::default);
    }
    for seat in &mut cfg.seats {
        if let Some(n) = opts.itermax {
            seat.itermax = n;
        }
        if opts.timed {
            seat.timed = true;
        }
        if let Some(t) = opts.thinking_time_ms {
            seat.thinking_time_ms = t;
        }
        if opts.points {
            seat.score_points = true;
        }
    }
    cfg
}

fn open_log(path: &Option<String>) -> Option<NdjsonWriter> {
    path.as_ref().map(|p| {
        NdjsonWriter::open_append_with_flush(p, 100).unwrap_or_else(|_| {
            eprintln!("Failed to open log file {}", p);
            process::exit(1);
        })
    })
}

struct CliSink {
    verbose: bool,
    total_games: u32,
    writer: Option<NdjsonWriter>,
    log_failed: bool,
}

impl CliSink {
    fn note_log_result(&mut self, res: Result<(), NdjsonError>) {
        if res.is_err() && !self.log_failed {
            eprintln!("Warning: NDJSON log write failed; further failures are silent");
            self.log_failed = true;
        }
    }
}

impl GameSink for CliSink {
    fn on_move(&mut self, game_idx: u32, info: &MoveInfo) {
        if self.verbose {
            println!(
                "ply {:2}: seat {} plays {} (visits {}/{})",
                info.ply, info.seat, info.card, info.best_visits, info.iterations
            );
        }
        if let Some(w) = &mut self.writer {
            let res = w.write_event(&SearchMoveEventV1 {
                event: "search_move",
                ts_ms: now_ms(),
                schema_version: LOG_SCHEMA_VERSION,
                game_idx,
                ply: info.ply,
                seat: info.seat,
                card: info.card.to_string(),
                iterations: info.iterations,
                best_visits: info.best_visits,
            });
            self.note_log_result(res);
        }
    }

    fn on_game(&mut self, game_idx: u32, record: &GameRecord) {
        if !self.verbose && (game_idx + 1) % 20 == 0 {
            println!("  {}/{} games completed", game_idx + 1, self.total_games);
        }
        if let Some(w) = &mut self.writer {
            let res = w.write_event(&GameResultEventV1 {
                event: "game_result",
                ts_ms: now_ms(),
                schema_version: LOG_SCHEMA_VERSION,
                game_idx,
                score: record.score,
                winning_team: record.winning_team,
                plies: record.plies,
            });
            self.note_log_result(res);
        }
    }
}

fn cmd_play(args: &[String]) {
    let help = r#"brisca play

Play a single game, printing every decision.

USAGE:
    brisca play [--config cfg.yaml] [--players N] [--seed S] [--itermax N]
                [--timed] [--thinking-time-ms N] [--points] [--log events.ndjson]

OPTIONS:
    --config PATH           YAML config file
    --players N             Number of seats, 2 or 4 (default: 4)
    --seed S                Base seed (default: 0)
    --itermax N             Iteration budget for every seat
    --timed                 Budget seats by thinking time instead of iterations
    --thinking-time-ms N    Thinking time per decision for every seat
    --points                Back up point differentials instead of win/loss
    --log PATH              Append NDJSON events to PATH
"#;
    let opts = parse_opts("play", args, help);
    let cfg = effective_config(&opts);

    let mut engines = build_engines(&cfg).unwrap_or_else(|e| {
        eprintln!("Failed to build engines: {}", e);
        process::exit(1);
    });

    let mut sink = CliSink {
        verbose: true,
        total_games: 1,
        writer: open_log(&opts.log_path),
        log_failed: false,
    };

    let episode_seed = splitmix64(cfg.game.seed);
    let record = play_game(&mut engines, cfg.game.players, episode_seed, 0, &mut sink)
        .unwrap_or_else(|e| {
            eprintln!("Game failed: {}", e);
            process::exit(1);
        });

    println!();
    match record.winning_team {
        Some(t) => println!("Team {} wins!", t),
        None => println!("Nobody wins!"),
    }
    println!("Final score: [{}, {}]", record.score[0], record.score[1]);
}

fn cmd_experiment(args: &[String]) {
    let help = r#"brisca experiment

Play many games and aggregate team outcomes.

USAGE:
    brisca experiment [--config cfg.yaml] [--games N] [--players N] [--seed S]
                      [--itermax N] [--timed] [--thinking-time-ms N] [--points]
                      [--log events.ndjson]

OPTIONS:
    --config PATH           YAML config file
    --games N               Number of games to play (default: 1)
    --players N             Number of seats, 2 or 4 (default: 4)
    --seed S                Base seed (default: 0)
    --itermax N             Iteration budget for every seat
    --timed                 Budget seats by thinking time instead of iterations
    --thinking-time-ms N    Thinking time per decision for every seat
    --points                Back up point differentials instead of win/loss
    --log PATH              Append NDJSON events to PATH
"#;
    let opts = parse_opts("experiment", args, help);
    let cfg = effective_config(&opts);

    println!("Starting {} games...", cfg.game.games);
    let mut sink = CliSink {
        verbose: false,
        total_games: cfg.game.games,
        writer: open_log(&opts.log_path),
        log_failed: false,
    };

    let report = run_experiment(&cfg, &mut sink).unwrap_or_else(|e| {
        eprintln!("Experiment failed: {}", e);
        process::exit(1);
    });

    if let Some(w) = &mut sink.writer {
        let _ = w.write_event(&ExperimentSummaryEventV1 {
            event: "experiment_summary",
            ts_ms: now_ms(),
            schema_version: LOG_SCHEMA_VERSION,
            games: report.games,
            wins: report.wins,
            draws: report.draws,
            avg_margin: report.avg_margin,
            elapsed_ms: report.elapsed.as_millis() as u64,
        });
        let _ = w.flush();
    }

    let pct = |w: u32| 100.0 * f64::from(w) / f64::from(report.games);
    println!();
    println!("Evaluation:");
    println!("  - Games: {}", report.games);
    println!(
        "  - Team 0 (even seats) wins: {} ({:.1}%)",
        report.wins[0],
        pct(report.wins[0])
    );
    println!(
        "  - Team 1 (odd seats) wins: {} ({:.1}%)",
        report.wins[1],
        pct(report.wins[1])
    );
    println!("  - Draws: {}", report.draws);
    println!("  - Avg margin (team 0): {:.2}", report.avg_margin);
    println!("Time taken: {:.2}s", report.elapsed.as_secs_f64());
}

fn print_help() {
    eprintln!(
        r#"brisca - ISMCTS Briscola driver

USAGE:
    brisca <COMMAND> [OPTIONS]

COMMANDS:
    play          Play one game, printing every decision
    experiment    Play many games and aggregate team outcomes

OPTIONS:
    -h, --help       Print this help message
    -V, --version    Print version

Run `brisca <COMMAND> --help` for per-command options.
"#
    );
}

fn print_version() {
    println!("brisca {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(cmd) = args.first() else {
        print_help();
        process::exit(2);
    };
    match cmd.as_str() {
        "play" => cmd_play(&args[1..]),
        "experiment" => cmd_experiment(&args[1..]),
        "help" | "--help" | "-h" => print_help(),
        "--version" | "-V" => print_version(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            process::exit(2);
        }
    }
}
