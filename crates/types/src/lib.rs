//! Core types module - shared data structures and constants
//!
//! Pure data used by the engine, the runtime and any rendering collaborator.
//! Nothing in here knows about timers, storage or terminals.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, y grows downward)
//! - **Spawn anchor**: (3, 0), the top-left corner of the piece's shape matrix
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_MS` | 1000 | Fall period with 0-9 lines cleared |
//! | `FALL_STEP_MS` | 100 | Period reduction per 10 lines |
//! | `MIN_FALL_MS` | 100 | Fall period floor |
//! | `SOFT_DROP_FALL_MS` | 50 | Effective period while soft drop is held |
//! | `LINE_CLEAR_FLASH_MS` | 150 | Flash window before cleared rows collapse |
//! | `CLOCK_TICK_MS` | 1000 | Elapsed-time counter resolution |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Direction, GameAction, PieceKind, Rotation, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color().hex(), "#A000F0");
//!
//! assert_eq!(Rotation::North.rotate(Direction::Clockwise), Rotation::East);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!(BOARD_WIDTH, 10);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Spawn anchor column
pub const SPAWN_X: i32 = 3;

/// Spawn anchor row
pub const SPAWN_Y: i32 = 0;

/// Fall period before any lines are cleared
pub const BASE_FALL_MS: u32 = 1000;

/// Fall period reduction applied for every `LINES_PER_LEVEL` lines
pub const FALL_STEP_MS: u32 = 100;

/// Fall period floor
pub const MIN_FALL_MS: u32 = 100;

/// Effective fall period while the soft-drop input is held
pub const SOFT_DROP_FALL_MS: u32 = 50;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// How long cleared rows flash before the board collapses
pub const LINE_CLEAR_FLASH_MS: u32 = 150;

/// Elapsed-time counter period
pub const CLOCK_TICK_MS: u32 = 1000;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0. Multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// Every kind, in bag refill order before shuffling
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }

    /// Single uppercase letter, used by text renderings of the board
    pub fn letter(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Fixed display color
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0x00, 0xF0, 0xF0),
            PieceKind::O => Rgb::new(0xF0, 0xF0, 0x00),
            PieceKind::T => Rgb::new(0xA0, 0x00, 0xF0),
            PieceKind::L => Rgb::new(0xF0, 0xA0, 0x00),
            PieceKind::J => Rgb::new(0x00, 0x00, 0xF0),
            PieceKind::S => Rgb::new(0x00, 0xF0, 0x00),
            PieceKind::Z => Rgb::new(0xF0, 0x00, 0x00),
        }
    }
}

/// 24-bit display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` form
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn delta(&self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Rotation states (North = spawn orientation, index 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation index 0..3
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from any integer, wrapping modulo 4
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// `(from + direction + 4) mod 4`
    pub fn rotate(&self, direction: Direction) -> Self {
        Self::from_index(self.index() as i32 + direction.delta() + 4)
    }

    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        self.rotate(Direction::Clockwise)
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        self.rotate(Direction::CounterClockwise)
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Player/collaborator actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Restart => "restart",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: occupied; the kind doubles as the color token
pub type Cell = Option<PieceKind>;
