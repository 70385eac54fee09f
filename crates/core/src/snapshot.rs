//! Snapshot module - read-only view of the game for renderers

use std::fmt;

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::engine::{ActivePiece, Phase};
use crate::shape::Shape;
use crate::types::{Cell, PieceKind, Rgb, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub shape: Shape,
    pub color: Rgb,
    pub x: i32,
    pub y: i32,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            shape: value.shape,
            color: value.color(),
            x: value.x,
            y: value.y,
        }
    }
}

/// Phase without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PhaseKind {
    #[default]
    Falling,
    Clearing,
    GameOver,
}

impl From<&Phase> for PhaseKind {
    fn from(value: &Phase) -> Self {
        match value {
            Phase::Falling => PhaseKind::Falling,
            Phase::Clearing { .. } => PhaseKind::Clearing,
            Phase::GameOver => PhaseKind::GameOver,
        }
    }
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i32>,
    pub next: PieceKind,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub phase: PhaseKind,
    pub game_over: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub elapsed_secs: u32,
    pub fall_speed_ms: u32,
    pub soft_drop: bool,
    pub flashing_rows: ArrayVec<usize, BOARD_HEIGHT>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH]; BOARD_HEIGHT];
        self.active = None;
        self.ghost_y = None;
        self.next = PieceKind::I;
        self.hold = None;
        self.can_hold = true;
        self.phase = PhaseKind::Falling;
        self.game_over = false;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.elapsed_secs = 0;
        self.fall_speed_ms = 0;
        self.soft_drop = false;
        self.flashing_rows.clear();
    }

    /// Whether piece control is currently accepted
    pub fn playable(&self) -> bool {
        self.phase == PhaseKind::Falling
    }

    /// What a renderer would draw at (x, y): the live piece, its ghost, or
    /// the board cell. Anything off the board is empty.
    pub fn glyph(&self, x: i32, y: i32) -> char {
        if let Some(active) = &self.active {
            let covers = |at_y: i32| {
                active
                    .shape
                    .cells()
                    .any(|(dx, dy)| active.x + dx == x && at_y + dy == y)
            };
            if covers(active.y) {
                return active.kind.letter().to_ascii_lowercase();
            }
            if self.ghost_y.is_some_and(covers) {
                return '+';
            }
        }
        let cell = usize::try_from(y)
            .ok()
            .and_then(|y| self.board.get(y))
            .zip(usize::try_from(x).ok())
            .and_then(|(row, x)| row.get(x).copied())
            .flatten();
        match cell {
            Some(kind) => kind.letter(),
            None => '.',
        }
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[None; BOARD_WIDTH]; BOARD_HEIGHT],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            hold: None,
            can_hold: true,
            phase: PhaseKind::Falling,
            game_over: false,
            score: 0,
            level: 0,
            lines: 0,
            elapsed_secs: 0,
            fall_speed_ms: 0,
            soft_drop: false,
            flashing_rows: ArrayVec::new(),
        };
        s.clear();
        s
    }
}

impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_HEIGHT {
            if self.flashing_rows.contains(&y) {
                writeln!(f, "{}", "=".repeat(BOARD_WIDTH))?;
                continue;
            }
            for x in 0..BOARD_WIDTH {
                write!(f, "{}", self.glyph(x as i32, y as i32))?;
            }
            writeln!(f)?;
        }
        let hold = self.hold.map_or("-", |k| k.as_str());
        write!(
            f,
            "score {} lines {} level {} time {}s next {} hold {}{}",
            self.score,
            self.lines,
            self.level,
            self.elapsed_secs,
            self.next.as_str(),
            hold,
            if self.game_over { " GAME OVER" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    #[test]
    fn test_default_is_playable_and_empty() {
        let snap = GameSnapshot::default();
        assert!(snap.playable());
        assert!(snap.flashing_rows.is_empty());
        assert!(snap.board.iter().flatten().all(|c| c.is_none()));
    }

    #[test]
    fn test_display_draws_piece_and_ghost() {
        let engine = Engine::new(12345);
        let snap = engine.snapshot();
        let text = snap.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), BOARD_HEIGHT + 1);
        let letter = snap.active.unwrap().kind.letter().to_ascii_lowercase();
        assert!(lines[0].contains(letter) || lines[1].contains(letter));
        assert!(lines[BOARD_HEIGHT - 1].contains('+'));
        assert!(lines[BOARD_HEIGHT].starts_with("score 0"));
    }

    #[test]
    fn test_glyph_off_board_is_empty() {
        let mut snap = GameSnapshot::default();
        snap.board[0][0] = Some(PieceKind::S);
        assert_eq!(snap.glyph(0, 0), 'S');
        assert_eq!(snap.glyph(-1, 0), '.');
        assert_eq!(snap.glyph(0, -3), '.');
        assert_eq!(snap.glyph(BOARD_WIDTH as i32, 0), '.');
        assert_eq!(snap.glyph(0, BOARD_HEIGHT as i32), '.');
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = Engine::new(7).snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Falling\""));
        assert!(json.contains("\"flashing_rows\":[]"));
    }
}
