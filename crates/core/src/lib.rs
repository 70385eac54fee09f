//! Core game logic module - pure state and transitions
//!
//! This crate holds all of the game rules. It has no dependencies on rendering,
//! timers or storage; a host drives it by calling its operations on a schedule
//! and reading [`GameSnapshot`]s back.
//!
//! # Module Structure
//!
//! - [`shape`]: boolean piece matrices and 90° rotation
//! - [`pieces`]: canonical tetromino shapes and SRS wall kick tables
//! - [`rng`]: 7-bag random piece supply
//! - [`board`]: 10x20 grid with collision, merge and line clearing
//! - [`scoring`]: line-clear points and fall speed progression
//! - [`engine`]: the fall/lock/spawn state machine with hold and ghost
//! - [`snapshot`]: read-only state handed to renderers
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every run of seven draws from a bag boundary holds each piece once
//! - **SRS-style kicks**: ordered candidates per transition, first fit wins; O never rotates
//! - **No lock delay**: a piece locks on the first gravity tick that cannot move it down
//! - **Hold**: once per lock, restoring the canonical orientation
//! - **Line clear flash**: cleared rows stay visible for 150ms before the board collapses
//! - **Scoring**: 40/100/300/1200 x (level + 1), level = lines / 10
//!
//! # Example
//!
//! ```
//! use blockfall_core::Engine;
//! use blockfall_types::{Direction, GameAction};
//!
//! let mut engine = Engine::new(12345);
//!
//! engine.apply_action(GameAction::MoveRight);
//! engine.try_rotate(Direction::Clockwise);
//! engine.hard_drop();
//!
//! assert!(!engine.is_game_over());
//! assert_eq!(engine.score(), 0);
//! ```

pub mod board;
pub mod engine;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod shape;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{clear_lines, collides, merge, Board, ClearedRows, Grid};
pub use engine::{ActivePiece, Engine, LockEvent, Phase};
pub use pieces::{canonical_shape, kick_candidates, shape_for};
pub use rng::{PieceBag, SimpleRng};
pub use scoring::{calculate_level, calculate_line_score, effective_fall_ms, fall_speed_ms};
pub use shape::{rotate_matrix, Shape};
pub use snapshot::{ActiveSnapshot, GameSnapshot, PhaseKind};
