#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The groups of nine cells that must each hold every digit exactly once.
//!
//! A percent sudoku has thirty of them: nine rows, nine columns, nine boxes,
//! the anti-diagonal running from the top-right to the bottom-left corner,
//! and two extra 3×3 windows. The upper window covers rows and columns 2–4
//! (1-based) and the lower window rows and columns 6–8, each straddling four
//! ordinary boxes.
//!
//! Cells are `(row, col)` pairs, 0-based.

use std::fmt;

/// Side length of the grid.
pub const SIZE: usize = 9;

/// Side length of a box or window.
pub const BLOCK: usize = 3;

/// A `(row, col)` position, 0-based.
pub type Cell = (usize, usize);

/// Top-left cell of the upper window.
pub const UPPER_WINDOW_ORIGIN: Cell = (1, 1);

/// Top-left cell of the lower window.
pub const LOWER_WINDOW_ORIGIN: Cell = (5, 5);

/// A group of nine cells that must hold each digit once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum House {
    /// Rows are numbered from the top, `0..9`.
    Row(usize),
    /// Columns are numbered from the left, `0..9`.
    Column(usize),
    /// Boxes are numbered row-major, `0..9`.
    Box(usize),
    /// From the top-right cell to the bottom-left one.
    AntiDiagonal,
    /// The 3×3 block at [`UPPER_WINDOW_ORIGIN`].
    UpperWindow,
    /// The 3×3 block at [`LOWER_WINDOW_ORIGIN`].
    LowerWindow,
}

fn block_cells((top, left): Cell) -> [Cell; SIZE] {
    std::array::from_fn(|i| (top + i / BLOCK, left + i % BLOCK))
}

impl House {
    /// The nine cells of this house, in the order the encoder visits them:
    /// left to right, top to bottom, and for the anti-diagonal from the top
    /// row down.
    #[must_use]
    pub fn cells(self) -> [Cell; SIZE] {
        match self {
            Self::Row(row) => std::array::from_fn(|col| (row, col)),
            Self::Column(col) => std::array::from_fn(|row| (row, col)),
            Self::Box(index) => block_cells((index / BLOCK * BLOCK, index % BLOCK * BLOCK)),
            Self::AntiDiagonal => std::array::from_fn(|row| (row, SIZE - 1 - row)),
            Self::UpperWindow => block_cells(UPPER_WINDOW_ORIGIN),
            Self::LowerWindow => block_cells(LOWER_WINDOW_ORIGIN),
        }
    }

    /// Every house: rows, columns, boxes, the anti-diagonal, then the upper
    /// and lower windows.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SIZE)
            .map(Self::Row)
            .chain((0..SIZE).map(Self::Column))
            .chain((0..SIZE).map(Self::Box))
            .chain([Self::AntiDiagonal, Self::UpperWindow, Self::LowerWindow])
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {}", i + 1),
            Self::Column(i) => write!(f, "column {}", i + 1),
            Self::Box(i) => write!(f, "box {}", i + 1),
            Self::AntiDiagonal => f.write_str("anti-diagonal"),
            Self::UpperWindow => f.write_str("upper window"),
            Self::LowerWindow => f.write_str("lower window"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_thirty_houses_in_order() {
        let houses = House::all().collect_vec();
        assert_eq!(houses.len(), 30);
        assert_eq!(houses[0], House::Row(0));
        assert_eq!(houses[9], House::Column(0));
        assert_eq!(houses[18], House::Box(0));
        assert_eq!(&houses[27..], &[House::AntiDiagonal, House::UpperWindow, House::LowerWindow]);
    }

    #[test]
    fn test_box_cells() {
        let cells = House::Box(5).cells();
        assert_eq!(cells[0], (3, 6));
        assert_eq!(cells[8], (5, 8));
    }

    #[test]
    fn test_anti_diagonal_runs_top_right_to_bottom_left() {
        let cells = House::AntiDiagonal.cells();
        assert_eq!(cells[0], (0, 8));
        assert_eq!(cells[4], (4, 4));
        assert_eq!(cells[8], (8, 0));
    }

    #[test]
    fn test_windows() {
        assert_eq!(House::UpperWindow.cells()[0], (1, 1));
        assert_eq!(House::UpperWindow.cells()[8], (3, 3));
        assert_eq!(House::LowerWindow.cells()[0], (5, 5));
        assert_eq!(House::LowerWindow.cells()[8], (7, 7));
    }

    #[test]
    fn test_every_house_has_nine_distinct_cells() {
        for house in House::all() {
            assert!(house.cells().iter().all_unique(), "{house}");
            assert!(house.cells().iter().all(|&(r, c)| r < SIZE && c < SIZE));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(House::Row(0).to_string(), "row 1");
        assert_eq!(House::Box(8).to_string(), "box 9");
        assert_eq!(House::LowerWindow.to_string(), "lower window");
    }
}
