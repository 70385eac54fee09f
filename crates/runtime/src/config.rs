//! Runtime configuration from environment variables

use std::path::PathBuf;

/// Default single-writer queue capacity
pub const DEFAULT_COMMAND_QUEUE: usize = 32;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fixed bag seed; `None` seeds from entropy
    pub seed: Option<u32>,
    pub stats_path: PathBuf,
    pub command_queue: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            stats_path: default_stats_path(),
            command_queue: DEFAULT_COMMAND_QUEUE,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    ///
    /// - `BLOCKFALL_SEED`: u32 bag seed
    /// - `BLOCKFALL_STATS_PATH`: lifetime stats JSON file
    /// - `BLOCKFALL_COMMAND_QUEUE`: command queue capacity
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok());

        let stats_path = lookup("BLOCKFALL_STATS_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_stats_path);

        let command_queue = lookup("BLOCKFALL_COMMAND_QUEUE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_COMMAND_QUEUE)
            .max(1);

        Self {
            seed,
            stats_path,
            command_queue,
        }
    }
}

// Per-user data directory, or the working directory if there is none
fn default_stats_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("blockfall").join("stats.json"),
        None => PathBuf::from("blockfall_stats.json"),
    }
}
