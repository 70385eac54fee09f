//! Timer-driven game session.
//!
//! [`Session`] owns one [`blockfall_core::Engine`] on a tokio task and feeds it
//! gravity, the play clock and the line-clear deadline. Players talk to it
//! through a [`SessionHandle`]. Lifetime statistics go through the
//! [`StatsStore`] seam.

pub mod config;
pub mod session;
pub mod stats;

pub use config::RuntimeConfig;
pub use session::{Command, Session, SessionHandle};
pub use stats::{
    load_or_default, record_game, GameSummary, JsonFileStore, LifetimeStats, MemoryStore,
    StatsError, StatsStore,
};
