//! Lifetime statistics collaborator
//!
//! The record is read once when a session starts and upserted exactly once per
//! finished game. A store that cannot be read never stops play: the session
//! falls back to an all-zero record and logs a warning.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use blockfall_core::Engine;

/// Aggregates across every completed game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifetimeStats {
    pub high_score: u64,
    pub total_lines_cleared: u64,
    pub total_games_played: u64,
    /// Seconds
    pub total_time: u64,
}

/// Final counters of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSummary {
    pub score: u32,
    pub lines: u32,
    pub elapsed_secs: u32,
}

impl From<&Engine> for GameSummary {
    fn from(engine: &Engine) -> Self {
        Self {
            score: engine.score(),
            lines: engine.lines(),
            elapsed_secs: engine.elapsed_secs(),
        }
    }
}

impl LifetimeStats {
    /// Fold one finished game into the aggregates
    pub fn record(&self, game: &GameSummary) -> Self {
        Self {
            high_score: self.high_score.max(game.score as u64),
            total_lines_cleared: self.total_lines_cleared.saturating_add(game.lines as u64),
            total_games_played: self.total_games_played.saturating_add(1),
            total_time: self.total_time.saturating_add(game.elapsed_secs as u64),
        }
    }

    /// Field-wise maximum of two records. Every aggregate only grows, so
    /// this picks whichever record has seen more games.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            high_score: self.high_score.max(other.high_score),
            total_lines_cleared: self.total_lines_cleared.max(other.total_lines_cleared),
            total_games_played: self.total_games_played.max(other.total_games_played),
            total_time: self.total_time.max(other.total_time),
        }
    }
}

// Error type for stats storage
#[derive(Debug)]
pub enum StatsError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Io(e) => write!(f, "stats io error: {}", e),
            StatsError::Parse(e) => write!(f, "stats format error: {}", e),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Io(e) => Some(e),
            StatsError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for StatsError {
    fn from(err: io::Error) -> Self {
        StatsError::Io(err)
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Parse(err)
    }
}

/// Key-value storage for the lifetime record
pub trait StatsStore: Send {
    /// Read the stored record. A store with nothing saved yet returns the
    /// default record, not an error.
    fn load(&self) -> Result<LifetimeStats, StatsError>;

    fn save(&mut self, stats: &LifetimeStats) -> Result<(), StatsError>;
}

/// Read the record, treating any failure as "no record yet"
pub fn load_or_default(store: &dyn StatsStore) -> LifetimeStats {
    match store.load() {
        Ok(stats) => stats,
        Err(e) => {
            warn!(error = %e, "could not read lifetime stats, starting from zero");
            LifetimeStats::default()
        }
    }
}

/// Upsert the record with one finished game, starting from whichever is
/// further along: the stored record or the caller's `known` aggregates.
/// Write failures are logged and the updated aggregates are still returned.
pub fn record_game(
    store: &mut dyn StatsStore,
    known: &LifetimeStats,
    game: &GameSummary,
) -> LifetimeStats {
    let updated = load_or_default(store).merge(known).record(game);
    match store.save(&updated) {
        Ok(()) => debug!(?updated, "lifetime stats saved"),
        Err(e) => warn!(error = %e, "could not save lifetime stats"),
    }
    updated
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> Result<LifetimeStats, StatsError> {
        if !self.path.exists() {
            return Ok(LifetimeStats::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, stats: &LifetimeStats) -> Result<(), StatsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process store. Clones share the same record, so a caller can keep a
/// handle to inspect what a session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryRecord>>,
}

#[derive(Debug, Default)]
struct MemoryRecord {
    stats: Option<LifetimeStats>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(stats: LifetimeStats) -> Self {
        let store = Self::default();
        if let Ok(mut record) = store.inner.lock() {
            record.stats = Some(stats);
        }
        store
    }

    /// Currently stored record, if any
    pub fn stats(&self) -> Option<LifetimeStats> {
        self.inner.lock().ok().and_then(|r| r.stats)
    }

    /// How many times `save` has been called
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|r| r.saves).unwrap_or(0)
    }
}

impl StatsStore for MemoryStore {
    fn load(&self) -> Result<LifetimeStats, StatsError> {
        Ok(self.stats().unwrap_or_default())
    }

    fn save(&mut self, stats: &LifetimeStats) -> Result<(), StatsError> {
        let mut record = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stats store poisoned"))?;
        record.stats = Some(*stats);
        record.saves += 1;
        Ok(())
    }
}
