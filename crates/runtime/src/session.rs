//! Session runtime.
//!
//! A single tokio task owns the [`Engine`]. Every mutation, whether it comes
//! from a player command or one of the timers, is applied by that task in
//! arrival order, and a fresh [`GameSnapshot`] is published after each one.
//!
//! Timers:
//! - gravity, re-armed after every step with the current effective fall period
//! - a one second play clock
//! - the line-clear flash deadline
//!
//! All timers stop once the game is over. The lifetime stats record is
//! upserted exactly once per finished game.

use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use blockfall_core::{Board, Engine, GameSnapshot, PieceBag};
use blockfall_types::{GameAction, CLOCK_TICK_MS, LINE_CLEAR_FLASH_MS};

use crate::config::RuntimeConfig;
use crate::stats::{load_or_default, record_game, GameSummary, JsonFileStore, LifetimeStats, StatsStore};

/// Message delivered to the session task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Action(GameAction),
    /// Soft drop key pressed (true) or released (false)
    SoftDrop(bool),
    Shutdown,
}

impl From<GameAction> for Command {
    fn from(action: GameAction) -> Self {
        Command::Action(action)
    }
}

/// Cloneable handle for talking to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    lifetime: watch::Receiver<LifetimeStats>,
}

impl SessionHandle {
    /// Queue a command. Fails once the session has stopped.
    pub async fn send(&self, command: impl Into<Command>) -> anyhow::Result<()> {
        self.commands
            .send(command.into())
            .await
            .map_err(|_| anyhow!("session has stopped"))
    }

    /// Queue a command from a thread outside the tokio runtime
    pub fn blocking_send(&self, command: impl Into<Command>) -> anyhow::Result<()> {
        self.commands
            .blocking_send(command.into())
            .map_err(|_| anyhow!("session has stopped"))
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Lifetime stats as of the last finished game
    pub fn lifetime(&self) -> LifetimeStats {
        *self.lifetime.borrow()
    }
}

/// Game session: one engine, its timers and its stats store
pub struct Session {
    engine: Engine,
    store: Box<dyn StatsStore>,
    recorded: bool,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<GameSnapshot>,
    lifetime: watch::Sender<LifetimeStats>,
}

impl Session {
    /// Wrap an engine. The stats record is read here, once.
    pub fn new(
        engine: Engine,
        store: impl StatsStore + 'static,
        command_queue: usize,
    ) -> (Self, SessionHandle) {
        let store: Box<dyn StatsStore> = Box::new(store);
        let lifetime = load_or_default(store.as_ref());

        let (cmd_tx, cmd_rx) = mpsc::channel(command_queue.max(1));
        let (snap_tx, snap_rx) = watch::channel(engine.snapshot());
        let (stats_tx, stats_rx) = watch::channel(lifetime);

        let session = Self {
            engine,
            store,
            recorded: false,
            commands: cmd_rx,
            snapshots: snap_tx,
            lifetime: stats_tx,
        };
        let handle = SessionHandle {
            commands: cmd_tx,
            snapshots: snap_rx,
            lifetime: stats_rx,
        };
        (session, handle)
    }

    /// Build a session from configuration, with a JSON file stats store
    pub fn from_config(config: &RuntimeConfig) -> (Self, SessionHandle) {
        let bag = match config.seed {
            Some(seed) => PieceBag::new(seed),
            None => PieceBag::from_entropy(),
        };
        let engine = Engine::with_bag(bag, Board::new());
        let store = JsonFileStore::new(&config.stats_path);
        Self::new(engine, store, config.command_queue)
    }

    /// Run on the current tokio runtime
    pub fn spawn(self) -> JoinHandle<LifetimeStats> {
        tokio::spawn(self.run())
    }

    /// Drive the game until `Shutdown` arrives or every handle is dropped.
    /// Returns the lifetime stats as they stand at exit.
    pub async fn run(mut self) -> LifetimeStats {
        info!(
            high_score = self.lifetime.borrow().high_score,
            "session started"
        );

        let clock_period = Duration::from_millis(CLOCK_TICK_MS as u64);
        let mut clock = time::interval_at(Instant::now() + clock_period, clock_period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut fall_at = self.next_fall();
        let mut flash_at: Option<Instant> = None;

        loop {
            let falling = self.engine.is_falling();
            let running = !self.engine.is_game_over();
            let flash_deadline = flash_at;

            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    None | Some(Command::Shutdown) => break,
                    Some(Command::SoftDrop(engaged)) => {
                        if engaged != self.engine.soft_drop() {
                            self.engine.set_soft_drop(engaged);
                            fall_at = self.next_fall();
                        }
                    }
                    Some(Command::Action(GameAction::Restart)) => {
                        self.engine.restart();
                        self.recorded = false;
                        flash_at = None;
                        fall_at = self.next_fall();
                        clock.reset();
                    }
                    Some(Command::Action(action)) => {
                        let accepted = self.engine.apply_action(action);
                        if accepted && matches!(action, GameAction::HardDrop | GameAction::Hold) {
                            fall_at = self.next_fall();
                        }
                        debug!(?action, accepted, "command");
                    }
                },
                _ = time::sleep_until(fall_at), if falling => {
                    self.engine.tick();
                    fall_at = self.next_fall();
                }
                _ = time::sleep_until(flash_deadline.unwrap_or(fall_at)), if flash_deadline.is_some() => {
                    self.engine.advance(LINE_CLEAR_FLASH_MS);
                    flash_at = None;
                    fall_at = self.next_fall();
                }
                _ = clock.tick(), if running => {
                    self.engine.tick_clock();
                }
            }

            if flash_at.is_none() {
                if let Some(remaining) = self.engine.clear_remaining_ms() {
                    flash_at = Some(Instant::now() + Duration::from_millis(remaining as u64));
                }
            }
            self.record_if_finished();
            self.publish();
        }

        let lifetime = *self.lifetime.borrow();
        info!(games = lifetime.total_games_played, "session stopped");
        lifetime
    }

    fn next_fall(&self) -> Instant {
        Instant::now() + Duration::from_millis(self.engine.effective_fall_ms() as u64)
    }

    fn publish(&self) {
        let engine = &self.engine;
        self.snapshots.send_modify(|snap| engine.snapshot_into(snap));
    }

    fn record_if_finished(&mut self) {
        if self.recorded || !self.engine.is_game_over() {
            return;
        }
        self.recorded = true;

        let summary = GameSummary::from(&self.engine);
        let known = *self.lifetime.borrow();
        let updated = record_game(self.store.as_mut(), &known, &summary);
        info!(
            score = summary.score,
            lines = summary.lines,
            secs = summary.elapsed_secs,
            games = updated.total_games_played,
            "game finished"
        );
        self.lifetime.send_replace(updated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MemoryStore;
    use blockfall_core::{canonical_shape, PhaseKind};
    use blockfall_types::{PieceKind, BOARD_HEIGHT, SPAWN_X};

    fn start(engine: Engine) -> (JoinHandle<LifetimeStats>, SessionHandle, MemoryStore) {
        let store = MemoryStore::new();
        let (session, handle) = Session::new(engine, store.clone(), 8);
        (session.spawn(), handle, store)
    }

    async fn settle() {
        time::sleep(Duration::from_millis(1)).await;
    }

    /// Bottom row filled except where the first piece's lowest cells land
    fn one_line_engine(seed: u32) -> Engine {
        let kind = Engine::new(seed).active().unwrap().kind;
        let shape = canonical_shape(kind);
        let bottom = (BOARD_HEIGHT - 1) as i32;
        let last = shape.height() as i32 - 1;

        let mut board = Board::new();
        for x in 0..10 {
            board.set(x, bottom, Some(PieceKind::Z));
        }
        for (dx, _) in shape.cells().filter(|&(_, dy)| dy == last) {
            board.set(SPAWN_X + dx, bottom, None);
        }
        Engine::with_board(seed, board)
    }

    #[tokio::test(start_paused = true)]
    async fn test_gravity_and_clock_follow_timers() {
        let (task, handle, _) = start(Engine::new(1));

        time::sleep(Duration::from_millis(3_010)).await;
        let snap = handle.snapshot();
        assert_eq!(snap.active.unwrap().y, 3);
        assert_eq!(snap.elapsed_secs, 3);

        handle.send(Command::Shutdown).await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_drop_shortens_fall_period() {
        let (task, handle, _) = start(Engine::new(1));

        handle.send(Command::SoftDrop(true)).await.unwrap();
        time::sleep(Duration::from_millis(510)).await;
        let snap = handle.snapshot();
        assert!(snap.soft_drop);
        assert_eq!(snap.active.unwrap().y, 10);

        handle.send(Command::Shutdown).await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_flash_window_then_collapse() {
        let (task, handle, _) = start(one_line_engine(5));

        handle.send(GameAction::HardDrop).await.unwrap();
        settle().await;
        let snap = handle.snapshot();
        assert_eq!(snap.phase, PhaseKind::Clearing);
        assert_eq!(snap.flashing_rows.as_slice(), &[BOARD_HEIGHT - 1]);
        assert_eq!(snap.score, 40);
        assert!(snap.active.is_none());

        // Control is ignored while rows flash
        handle.send(GameAction::MoveLeft).await.unwrap();
        settle().await;
        assert!(handle.snapshot().active.is_none());

        time::sleep(Duration::from_millis(LINE_CLEAR_FLASH_MS as u64)).await;
        let snap = handle.snapshot();
        assert_eq!(snap.phase, PhaseKind::Falling);
        assert!(snap.flashing_rows.is_empty());
        assert_eq!(snap.lines, 1);
        assert!(snap.active.is_some());
        assert!(snap.board[BOARD_HEIGHT - 1].iter().any(|c| c.is_none()));

        handle.send(Command::Shutdown).await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_records_once_and_stops_timers() {
        let (task, handle, store) = start(Engine::new(3));

        for _ in 0..40 {
            handle.send(GameAction::HardDrop).await.unwrap();
        }
        settle().await;
        let over = handle.snapshot();
        assert!(over.game_over);
        assert_eq!(store.save_count(), 1);
        assert_eq!(handle.lifetime().total_games_played, 1);

        time::sleep(Duration::from_secs(5)).await;
        let later = handle.snapshot();
        assert_eq!(later.elapsed_secs, over.elapsed_secs);
        assert_eq!(store.save_count(), 1);

        handle.send(GameAction::Restart).await.unwrap();
        settle().await;
        let fresh = handle.snapshot();
        assert!(!fresh.game_over);
        assert_eq!(fresh.score, 0);
        assert!(fresh.board.iter().flatten().all(|c| c.is_none()));

        for _ in 0..40 {
            handle.send(GameAction::HardDrop).await.unwrap();
        }
        settle().await;
        assert_eq!(store.save_count(), 2);

        handle.send(Command::Shutdown).await.unwrap();
        let lifetime = task.await.unwrap();
        assert_eq!(lifetime.total_games_played, 2);
    }

    struct UnwritableStore;

    impl StatsStore for UnwritableStore {
        fn load(&self) -> Result<LifetimeStats, crate::stats::StatsError> {
            Ok(LifetimeStats::default())
        }

        fn save(&mut self, _stats: &LifetimeStats) -> Result<(), crate::stats::StatsError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifetime_keeps_growing_when_saves_fail() {
        let (session, handle) = Session::new(Engine::new(3), UnwritableStore, 8);
        let task = session.spawn();

        for round in 1..=2u64 {
            for _ in 0..40 {
                handle.send(GameAction::HardDrop).await.unwrap();
            }
            settle().await;
            assert!(handle.snapshot().game_over);
            assert_eq!(handle.lifetime().total_games_played, round);
            handle.send(GameAction::Restart).await.unwrap();
        }

        handle.send(Command::Shutdown).await.unwrap();
        let lifetime = task.await.unwrap();
        assert_eq!(lifetime.total_games_played, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handles_stops_session() {
        let (task, handle, store) = start(Engine::new(9));
        drop(handle);
        let lifetime = task.await.unwrap();
        assert_eq!(lifetime, LifetimeStats::default());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_existing_record_is_loaded() {
        let store = MemoryStore::with_stats(LifetimeStats {
            high_score: 999,
            total_games_played: 4,
            ..LifetimeStats::default()
        });
        let (session, handle) = Session::new(Engine::new(1), store, 4);
        assert_eq!(handle.lifetime().high_score, 999);

        let task = session.spawn();
        handle.send(Command::Shutdown).await.unwrap();
        assert_eq!(task.await.unwrap().total_games_played, 4);
    }
}
