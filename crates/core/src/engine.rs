//! Engine module - the complete state of one game
//!
//! Ties the board, piece supply, rotation and scoring together and exposes the
//! imperative operations a host drives: move, rotate, hold, tick, hard drop and
//! restart. Time never flows inside the engine; the host calls `tick` on its
//! fall timer, `tick_clock` once per second and `advance` while rows flash.
//!
//! Phases:
//!
//! - `Falling`: a piece is live and accepts input.
//! - `Clearing`: rows were just completed. The visible board still shows them
//!   (see `flashing_rows`) and the compacted board waits in the phase. No piece
//!   is live, so every control input is rejected until the flash window ends.
//! - `GameOver`: the spawn anchor collided. Only `restart` does anything.

use tracing::{debug, info};

use crate::board::{Board, ClearedRows};
use crate::pieces::{canonical_shape, kick_candidates};
use crate::rng::PieceBag;
use crate::scoring::{calculate_level, calculate_line_score, effective_fall_ms, fall_speed_ms};
use crate::shape::Shape;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, PhaseKind};
use crate::types::*;

/// Live falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Canonical orientation at the spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            shape: canonical_shape(kind),
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn color(&self) -> Rgb {
        self.kind.color()
    }
}

/// Where the engine is in its fall/lock/spawn cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Falling,
    Clearing {
        /// Board with the cleared rows already removed
        pending: Board,
        rows: ClearedRows,
        remaining_ms: u32,
    },
    GameOver,
}

/// What happened on the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    pub lines_cleared: u32,
    pub points: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    active: Option<ActivePiece>,
    next: PieceKind,
    hold: Option<PieceKind>,
    can_hold: bool,
    bag: PieceBag,
    phase: Phase,
    score: u32,
    lines: u32,
    elapsed_secs: u32,
    soft_drop: bool,
    last_event: Option<LockEvent>,
}

impl Engine {
    /// Start a game on an empty board with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_bag(PieceBag::new(seed), Board::new())
    }

    /// Start a game seeded from entropy
    pub fn from_entropy() -> Self {
        Self::with_bag(PieceBag::from_entropy(), Board::new())
    }

    /// Start a game on a prepared board. If the first piece cannot spawn the
    /// engine begins in `GameOver`.
    pub fn with_board(seed: u32, board: Board) -> Self {
        Self::with_bag(PieceBag::new(seed), board)
    }

    /// Start a game from an explicit piece supply and board
    pub fn with_bag(mut bag: PieceBag, board: Board) -> Self {
        let next = bag.draw_next();
        let mut engine = Self {
            board,
            active: None,
            next,
            hold: None,
            can_hold: true,
            bag,
            phase: Phase::Falling,
            score: 0,
            lines: 0,
            elapsed_secs: 0,
            soft_drop: false,
            last_event: None,
        };
        engine.spawn_next();
        engine
    }

    /// Throw this game away and start a fresh one.
    ///
    /// The new bag is seeded from the old one, so a seeded engine restarts
    /// into a reproducible sequence.
    pub fn restart(&mut self) {
        let seed = self.bag.fork_seed();
        *self = Self::new(seed);
        info!(seed, "game restarted");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    pub fn is_clearing(&self) -> bool {
        matches!(self.phase, Phase::Clearing { .. })
    }

    /// Rows currently flashing (empty outside the clearing window)
    pub fn flashing_rows(&self) -> &[usize] {
        match &self.phase {
            Phase::Clearing { rows, .. } => rows.as_slice(),
            _ => &[],
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        calculate_level(self.lines)
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Stored fall period; soft drop does not change it
    pub fn fall_speed_ms(&self) -> u32 {
        fall_speed_ms(self.lines)
    }

    /// Period the fall timer should wait before the next `tick`
    pub fn effective_fall_ms(&self) -> u32 {
        effective_fall_ms(self.fall_speed_ms(), self.soft_drop)
    }

    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    /// Press (true) or release (false) the soft-drop input
    pub fn set_soft_drop(&mut self, engaged: bool) {
        self.soft_drop = engaged;
    }

    /// Take and clear the last lock event
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Whether a live piece is accepting control and gravity
    pub fn is_falling(&self) -> bool {
        matches!(self.phase, Phase::Falling)
    }

    /// Place the queued piece at the spawn anchor and draw a new one.
    /// Returns false (and ends the game) when the anchor is blocked.
    fn spawn_next(&mut self) -> bool {
        let piece = ActivePiece::spawn(self.next);
        if self.board.collides(&piece.shape, piece.x, piece.y) {
            self.active = None;
            self.phase = Phase::GameOver;
            info!(
                kind = ?piece.kind,
                score = self.score,
                lines = self.lines,
                "spawn blocked, game over"
            );
            return false;
        }

        self.active = Some(piece);
        self.next = self.bag.draw_next();
        self.phase = Phase::Falling;
        debug!(kind = ?piece.kind, next = ?self.next, "spawned piece");
        true
    }

    /// Merge the live piece where it stands, clear rows and move on
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let merged = self.board.merge(&piece.shape, piece.x, piece.y, piece.kind);
        let (compacted, rows) = merged.clear_lines();
        let cleared = rows.len() as u32;
        let points = calculate_line_score(rows.len(), self.level());

        self.score = self.score.saturating_add(points);
        self.lines += cleared;
        self.can_hold = true;
        self.board = merged;
        self.last_event = Some(LockEvent {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
            lines_cleared: cleared,
            points,
        });

        debug!(
            kind = ?piece.kind,
            x = piece.x,
            y = piece.y,
            lines = cleared,
            points,
            "piece locked"
        );

        if rows.is_empty() {
            self.spawn_next();
        } else {
            self.phase = Phase::Clearing {
                pending: compacted,
                rows,
                remaining_ms: LINE_CLEAR_FLASH_MS,
            };
        }
    }

    /// Shift the live piece horizontally. Rejected if it would collide.
    pub fn move_piece(&mut self, dx: i32) -> bool {
        if !self.is_falling() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        if self.board.collides(&piece.shape, piece.x + dx, piece.y) {
            return false;
        }
        piece.x += dx;
        true
    }

    /// Rotate with SRS wall kicks; the first candidate that fits wins
    pub fn try_rotate(&mut self, direction: Direction) -> bool {
        if !self.is_falling() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        // O piece doesn't rotate
        if piece.kind == PieceKind::O {
            return false;
        }

        let shape = piece.shape.rotated(direction);
        let to = piece.rotation.rotate(direction);

        for &(kx, ky) in kick_candidates(piece.kind, piece.rotation, to) {
            let x = piece.x + kx;
            // kick tables are y-up, the board is y-down
            let y = piece.y - ky;
            if !self.board.collides(&shape, x, y) {
                piece.shape = shape;
                piece.rotation = to;
                piece.x = x;
                piece.y = y;
                return true;
            }
        }

        false
    }

    /// Swap the live piece with the hold slot (once per lock)
    pub fn hold(&mut self) -> bool {
        if !self.is_falling() || !self.can_hold {
            return false;
        }
        let Some(current) = self.active else {
            return false;
        };

        let incoming = match self.hold {
            Some(held) => held,
            None => {
                let promoted = self.next;
                self.next = self.bag.draw_next();
                promoted
            }
        };

        self.hold = Some(current.kind);
        self.can_hold = false;

        let piece = ActivePiece::spawn(incoming);
        if self.board.collides(&piece.shape, piece.x, piece.y) {
            self.active = None;
            self.phase = Phase::GameOver;
            info!(kind = ?incoming, score = self.score, "held piece cannot spawn, game over");
        } else {
            self.active = Some(piece);
            debug!(held = ?current.kind, active = ?incoming, "hold");
        }
        true
    }

    /// One gravity step: fall a row, or lock if resting
    pub fn tick(&mut self) -> bool {
        if !self.is_falling() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        if !self.board.collides(&piece.shape, piece.x, piece.y + 1) {
            piece.y += 1;
            return true;
        }

        self.lock_active();
        true
    }

    /// A player-initiated single row drop; identical to a gravity tick
    pub fn soft_drop_step(&mut self) -> bool {
        self.tick()
    }

    /// Where the live piece would come to rest
    pub fn ghost_y(&self) -> Option<i32> {
        let piece = self.active.as_ref()?;
        let mut y = piece.y;
        while !self.board.collides(&piece.shape, piece.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Drop straight to the ghost row and lock
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_falling() {
            return false;
        }
        let Some(ghost_y) = self.ghost_y() else {
            return false;
        };
        if let Some(piece) = self.active.as_mut() {
            piece.y = ghost_y;
        }

        self.lock_active();
        true
    }

    /// Count down the flash window; commits the cleared board when it ends
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        let Phase::Clearing { remaining_ms, .. } = &mut self.phase else {
            return false;
        };

        *remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
        if *remaining_ms > 0 {
            return false;
        }
        self.finish_clear()
    }

    /// Milliseconds left in the flash window, if clearing
    pub fn clear_remaining_ms(&self) -> Option<u32> {
        match &self.phase {
            Phase::Clearing { remaining_ms, .. } => Some(*remaining_ms),
            _ => None,
        }
    }

    /// End the flash window now: commit the compacted board and spawn
    pub fn finish_clear(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Falling) {
            Phase::Clearing { pending, rows, .. } => {
                debug!(rows = ?rows.as_slice(), "rows collapsed");
                self.board = pending;
                self.spawn_next();
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// One second of play time
    pub fn tick_clock(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_piece(-1),
            GameAction::MoveRight => self.move_piece(1),
            GameAction::SoftDrop => self.soft_drop_step(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.try_rotate(Direction::Clockwise),
            GameAction::RotateCcw => self.try_rotate(Direction::CounterClockwise),
            GameAction::Hold => self.hold(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board = *self.board.rows();
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.hold = self.hold;
        out.can_hold = self.can_hold;
        out.phase = PhaseKind::from(&self.phase);
        out.game_over = self.is_game_over();
        out.score = self.score;
        out.level = self.level();
        out.lines = self.lines;
        out.elapsed_secs = self.elapsed_secs;
        out.fall_speed_ms = self.fall_speed_ms();
        out.soft_drop = self.soft_drop;
        out.flashing_rows.clear();
        out.flashing_rows
            .extend(self.flashing_rows().iter().copied());
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(1)
    }
}
