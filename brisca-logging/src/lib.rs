//! brisca-logging: append-only NDJSON event logs for post-mortem analysis of
//! games and experiments.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log event schema version.
pub const LOG_SCHEMA_VERSION: u32 = 1;

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

/// One engine decision inside a game.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMoveEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub game_idx: u32,
    pub ply: u32,
    pub seat: u8,
    pub card: String,
    pub iterations: u32,
    pub best_visits: u32,
}

/// Final score of one game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResultEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub game_idx: u32,
    pub score: [i32; 2],
    pub winning_team: Option<u8>,
    pub plies: u32,
}

/// Aggregate of one experiment run.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentSummaryEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub games: u32,
    pub wins: [u32; 2],
    pub draws: u32,
    pub avg_margin: f64,
    pub elapsed_ms: u64,
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        let mut out = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(line) {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        w.write_event(&GameResultEventV1 {
            event: "game_result",
            ts_ms: now_ms(),
            schema_version: LOG_SCHEMA_VERSION,
            game_idx: 0,
            score: [65, 55],
            winning_team: Some(0),
            plies: 40,
        })
        .unwrap();
        w.write_event(&GameResultEventV1 {
            event: "game_result",
            ts_ms: now_ms(),
            schema_version: LOG_SCHEMA_VERSION,
            game_idx: 1,
            score: [60, 60],
            winning_team: None,
            plies: 40,
        })
        .unwrap();
        w.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["score"][0], 65);
        assert_eq!(vals[1]["winning_team"], Value::Null);
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&SearchMoveEventV1 {
                event: "search_move",
                ts_ms: now_ms(),
                schema_version: LOG_SCHEMA_VERSION,
                game_idx: 0,
                ply: 1,
                seat: 0,
                card: "AC".to_string(),
                iterations: 100,
                best_visits: 61,
            })
            .unwrap();
            w.flush().unwrap();
        }

        // Simulate a crash: append a partial JSON line (no newline).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"search_move","ply":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["card"], "AC");
    }

    #[test]
    fn periodic_flush_counts_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 2).unwrap();

        for i in 0..4u32 {
            w.write_event(&ExperimentSummaryEventV1 {
                event: "experiment_summary",
                ts_ms: now_ms(),
                schema_version: LOG_SCHEMA_VERSION,
                games: i,
                wins: [0, 0],
                draws: 0,
                avg_margin: 0.0,
                elapsed_ms: 0,
            })
            .unwrap();
        }

        // Two flushes happened without an explicit flush() call.
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 4);
    }
}
