//! Board module - manages the game grid
//!
//! The playfield is `BOARD_HEIGHT` rows of `BOARD_WIDTH` cells, each empty or
//! holding the piece kind that filled it. Coordinates are (x, y) with x growing
//! to the right and y growing downward; row 0 is the top of the visible board.
//!
//! The grid type is generic over its dimensions so row-clearing can be checked
//! on tiny boards; the game itself always uses [`Board`].

use std::fmt;

use arrayvec::ArrayVec;

use crate::shape::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Row indices removed by one clear, top to bottom. Sized to the grid height
/// so every full row fits.
pub type ClearedRows<const H: usize = BOARD_HEIGHT> = ArrayVec<usize, H>;

/// Fixed-size grid of cells, `H` rows of `W` columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid<const W: usize, const H: usize> {
    rows: [[Cell; W]; H],
}

/// The standard 10x20 playfield
pub type Board = Grid<BOARD_WIDTH, BOARD_HEIGHT>;

impl<const W: usize, const H: usize> Grid<W, H> {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [[None; W]; H],
        }
    }

    /// Create from explicit rows
    pub fn from_rows(rows: [[Cell; W]; H]) -> Self {
        Self { rows }
    }

    /// Get width of the board
    pub fn width(&self) -> usize {
        W
    }

    /// Get height of the board
    pub fn height(&self) -> usize {
        H
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x >= W as i32 || y >= H as i32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[[Cell; W]; H] {
        &self.rows
    }

    /// A single row, if in range
    pub fn row(&self, y: usize) -> Option<&[Cell; W]> {
        self.rows.get(y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.rows = [[None; W]; H];
    }

    /// Whether `shape` anchored at (x, y) overlaps walls, floor or filled cells.
    ///
    /// Cells above the top edge (y < 0) only check horizontal bounds; they
    /// never hit board contents.
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.cells().any(|(dx, dy)| {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= W as i32 || ny >= H as i32 {
                return true;
            }
            ny >= 0 && self.is_occupied(nx, ny)
        })
    }

    /// Write every in-bounds set cell of `shape` at (x, y) as `kind`.
    /// Cells above the board are dropped.
    pub fn merge_in_place(&mut self, shape: &Shape, x: i32, y: i32, kind: PieceKind) {
        for (dx, dy) in shape.cells() {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    /// Copy of this board with `shape` merged at (x, y)
    pub fn merge(&self, shape: &Shape, x: i32, y: i32, kind: PieceKind) -> Self {
        let mut out = *self;
        out.merge_in_place(shape, x, y, kind);
        out
    }

    /// Indices of every full row, top to bottom
    pub fn full_rows(&self) -> ClearedRows<H> {
        (0..H).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove all full rows and prepend as many empty rows at the top.
    /// Returns the compacted board and the removed indices (top to bottom).
    pub fn clear_lines(&self) -> (Self, ClearedRows<H>) {
        let cleared = self.full_rows();
        if cleared.is_empty() {
            return (*self, cleared);
        }

        let mut out = Self::new();
        let mut write_y = H;
        // Two pointers, bottom up: every surviving row slides down.
        for read_y in (0..H).rev() {
            if cleared.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            out.rows[write_y] = self.rows[read_y];
        }

        (out, cleared)
    }
}

impl<const W: usize, const H: usize> Default for Grid<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> fmt::Display for Grid<W, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            for cell in row {
                let ch = match cell {
                    Some(kind) => kind.letter(),
                    None => '.',
                };
                write!(f, "{}", ch)?;
            }
            if y + 1 < H {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Free-function form of [`Grid::collides`]
pub fn collides<const W: usize, const H: usize>(
    board: &Grid<W, H>,
    shape: &Shape,
    x: i32,
    y: i32,
) -> bool {
    board.collides(shape, x, y)
}

/// Free-function form of [`Grid::merge`]
pub fn merge<const W: usize, const H: usize>(
    board: &Grid<W, H>,
    shape: &Shape,
    x: i32,
    y: i32,
    kind: PieceKind,
) -> Grid<W, H> {
    board.merge(shape, x, y, kind)
}

/// Free-function form of [`Grid::clear_lines`]
pub fn clear_lines<const W: usize, const H: usize>(
    board: &Grid<W, H>,
) -> (Grid<W, H>, ClearedRows<H>) {
    board.clear_lines()
}
