//! Pieces module - canonical tetromino shapes and SRS wall kick tables
//!
//! Kick offsets use the conventional SRS orientation (y grows upward), so a
//! candidate `(kx, ky)` is applied to a board anchor as `(x + kx, y - ky)`.
//! Reference: https://tetris.wiki/SRS

use crate::shape::Shape;
use crate::types::{Direction, PieceKind, Rotation};

/// Kick offset `(dx, dy)`, y-up
pub type Kick = (i32, i32);

/// Candidate list used when a piece/transition pair has no table entry
pub const DEFAULT_KICKS: &[Kick] = &[(0, 0)];

/// Canonical (spawn orientation) shape for a piece kind
pub fn canonical_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
        PieceKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
        PieceKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
        PieceKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        PieceKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
        PieceKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        PieceKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
    }
}

/// Shape of `kind` after turning clockwise from spawn to `rotation`
pub fn shape_for(kind: PieceKind, rotation: Rotation) -> Shape {
    let mut shape = canonical_shape(kind);
    for _ in 0..rotation.index() {
        shape = shape.rotated(Direction::Clockwise);
    }
    shape
}

/// JLSTZ kick table (shared by J, L, S, T, Z), indexed by `kick_index`
const JLSTZ_KICKS: [[Kick; 5]; 8] = [
    // 0->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 1->0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: [[Kick; 5]; 8] = [
    // 0->1
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 1->0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 0->3
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Table row for an adjacent `from>to` transition
fn kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    match (from, to) {
        (Rotation::North, Rotation::East) => Some(0),
        (Rotation::East, Rotation::North) => Some(1),
        (Rotation::East, Rotation::South) => Some(2),
        (Rotation::South, Rotation::East) => Some(3),
        (Rotation::South, Rotation::West) => Some(4),
        (Rotation::West, Rotation::South) => Some(5),
        (Rotation::West, Rotation::North) => Some(6),
        (Rotation::North, Rotation::West) => Some(7),
        _ => None,
    }
}

/// Ordered kick candidates for `kind` turning `from>to`.
///
/// The O piece has no entries; neither do non-adjacent transitions. Both fall
/// back to `DEFAULT_KICKS`.
pub fn kick_candidates(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [Kick] {
    let table = match kind {
        PieceKind::O => return DEFAULT_KICKS,
        PieceKind::I => &I_KICKS,
        PieceKind::T | PieceKind::L | PieceKind::J | PieceKind::S | PieceKind::Z => &JLSTZ_KICKS,
    };

    match kick_index(from, to) {
        Some(idx) => &table[idx],
        None => DEFAULT_KICKS,
    }
}
