//! Shape module - boolean piece matrices and 90° rotation
//!
//! A shape is a small row-major boolean matrix (at most 4x4). Rotating an
//! R x C matrix yields a C x R matrix; cells outside the live dimensions are
//! always kept clear so two equal shapes compare equal bit-for-bit.

use std::fmt;

use serde::Serialize;

use crate::types::Direction;

/// Largest matrix side any piece needs
pub const MAX_SHAPE_SIDE: usize = 4;

/// Boolean piece matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Build from rows of 0/1 values. Rows longer than 4 or more than 4 rows
    /// are truncated.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let row_count = rows.len().min(MAX_SHAPE_SIDE);
        let col_count = rows
            .iter()
            .take(row_count)
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .min(MAX_SHAPE_SIDE);

        let mut bits = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in rows.iter().take(row_count).enumerate() {
            for (c, &v) in row.iter().take(col_count).enumerate() {
                bits[r][c] = v != 0;
            }
        }

        Self {
            rows: row_count as u8,
            cols: col_count as u8,
            bits,
        }
    }

    /// An all-clear shape of the given size
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.min(MAX_SHAPE_SIDE) as u8,
            cols: cols.min(MAX_SHAPE_SIDE) as u8,
            bits: [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
        }
    }

    /// Number of rows (matrix height)
    pub fn height(&self) -> usize {
        self.rows as usize
    }

    /// Number of columns (matrix width)
    pub fn width(&self) -> usize {
        self.cols as usize
    }

    /// Whether the cell at (row, col) is set. Out of range reads as clear.
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.bits[row][col]
    }

    /// Local `(dx, dy)` offsets of every set cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height()).flat_map(move |r| {
            (0..self.width())
                .filter(move |&c| self.bits[r][c])
                .map(move |c| (c as i32, r as i32))
        })
    }

    /// Number of set cells
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// This shape turned 90° in `direction`
    pub fn rotated(&self, direction: Direction) -> Self {
        rotate_matrix(self, direction)
    }

    /// Row-major copy of the live area, for collaborators that draw matrices
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        (0..self.height())
            .map(|r| self.bits[r][..self.width()].to_vec())
            .collect()
    }
}

/// Rotate a shape matrix by 90°.
///
/// Clockwise maps `shape[r][c]` to `shape'[c][rows-1-r]`; counter-clockwise
/// maps it to `shape'[cols-1-c][r]`.
pub fn rotate_matrix(shape: &Shape, direction: Direction) -> Shape {
    let rows = shape.height();
    let cols = shape.width();
    let mut out = Shape::empty(cols, rows);

    for r in 0..rows {
        for c in 0..cols {
            if !shape.bits[r][c] {
                continue;
            }
            match direction {
                Direction::Clockwise => out.bits[c][rows - 1 - r] = true,
                Direction::CounterClockwise => out.bits[cols - 1 - c][r] = true,
            }
        }
    }

    out
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.height() {
            for c in 0..self.width() {
                f.write_str(if self.bits[r][c] { "#" } else { "." })?;
            }
            if r + 1 < self.height() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
