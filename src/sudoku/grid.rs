#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The puzzle state: a 9×9 grid of digits plus which cells were given.
//!
//! `0` stands for an empty cell. Given cells are fixed at load time and never
//! change afterwards; everything else may be filled by the solver or edited
//! through [`Grid::set`].

use crate::sudoku::error::SudokuError;
use crate::sudoku::houses::{Cell, House, SIZE};
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Number of cells, and of characters in a puzzle line.
pub const CELLS: usize = SIZE * SIZE;

/// A 9×9 percent sudoku grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Grid {
    values: [[u8; SIZE]; SIZE],
    given: [[bool; SIZE]; SIZE],
}

impl Grid {
    /// A grid with every cell empty.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            values: [[0; SIZE]; SIZE],
            given: [[false; SIZE]; SIZE],
        }
    }

    /// Builds a grid from digits; every non-zero cell becomes given.
    ///
    /// # Errors
    ///
    /// [`SudokuError::InvalidDigit`] for values above 9.
    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Result<Self, SudokuError> {
        let mut grid = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value > 9 {
                    return Err(SudokuError::InvalidDigit(value));
                }
                grid.values[r][c] = value;
                grid.given[r][c] = value != 0;
            }
        }
        Ok(grid)
    }

    /// Reads one puzzle in the single-line format: 81 characters, row-major,
    /// `1`-`9` for givens and `.` or `0` for empty cells. Any other character
    /// leaves its cell empty. Characters past the 81st are ignored.
    ///
    /// # Errors
    ///
    /// [`SudokuError::InvalidLine`] if the line is shorter than 81 characters.
    pub fn from_line(line: &str) -> Result<Self, SudokuError> {
        let len = line.chars().count();
        if len < CELLS {
            return Err(SudokuError::InvalidLine { len });
        }

        let mut grid = Self::empty();
        for (pos, ch) in line.chars().take(CELLS).enumerate() {
            if let Some(digit @ 1..=9) = ch.to_digit(10) {
                let (r, c) = (pos / SIZE, pos % SIZE);
                grid.values[r][c] = u8::try_from(digit).unwrap_or(0);
                grid.given[r][c] = true;
            }
        }
        Ok(grid)
    }

    /// Extracts every puzzle from a puzzle file's text. Blank lines and lines
    /// starting with `//` are skipped, as are lines too short to hold a grid.
    #[must_use]
    pub fn parse_puzzles(text: &str) -> Vec<Self> {
        text.lines()
            .enumerate()
            .filter_map(|(number, line)| {
                let line = line.trim_end();
                if line.is_empty() || line.starts_with("//") {
                    return None;
                }
                match Self::from_line(line) {
                    Ok(grid) => Some(grid),
                    Err(e) => {
                        debug!(line = number + 1, "skipping puzzle line: {e}");
                        None
                    }
                }
            })
            .collect()
    }

    /// Loads every puzzle from a file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read, or holds no puzzle.
    pub fn load_puzzles<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, SudokuError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let puzzles = Self::parse_puzzles(&text);
        debug!(path = %path.as_ref().display(), count = puzzles.len(), "loaded puzzles");
        if puzzles.is_empty() {
            return Err(SudokuError::NoPuzzles);
        }
        Ok(puzzles)
    }

    /// The digit at `(row, col)`, `0` if empty.
    ///
    /// # Panics
    ///
    /// If the position is outside the grid.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> u8 {
        self.values[row][col]
    }

    /// `true` if the cell was fixed at load time.
    #[must_use]
    pub const fn is_given(&self, row: usize, col: usize) -> bool {
        self.given[row][col]
    }

    /// Writes `value` (`0` clears) into a non-given cell.
    ///
    /// # Errors
    ///
    /// If the cell is outside the grid, is given, or `value` is above 9.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), SudokuError> {
        if row >= SIZE || col >= SIZE {
            return Err(SudokuError::OutOfBounds { row, col });
        }
        if value > 9 {
            return Err(SudokuError::InvalidDigit(value));
        }
        if self.given[row][col] {
            return Err(SudokuError::GivenCell { row, col });
        }
        self.values[row][col] = value;
        Ok(())
    }

    /// Empties every cell that was not given.
    pub fn clear_solved(&mut self) {
        for (values, given) in self.values.iter_mut().zip(&self.given) {
            for (value, &fixed) in values.iter_mut().zip(given) {
                if !fixed {
                    *value = 0;
                }
            }
        }
    }

    /// A copy of the digits, for rendering.
    #[must_use]
    pub const fn cells(&self) -> [[u8; SIZE]; SIZE] {
        self.values
    }

    /// Number of given cells.
    #[must_use]
    pub fn given_count(&self) -> usize {
        self.given.iter().flatten().filter(|&&g| g).count()
    }

    /// Positions of the empty cells, row-major.
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.values[r][c] == 0)
    }

    /// Checks that every house holds each digit exactly once.
    ///
    /// # Errors
    ///
    /// The first house (in [`House::all`] order) that does not; an incomplete
    /// grid always fails.
    pub fn check_rules(&self) -> Result<(), House> {
        for house in House::all() {
            let digits: FxHashSet<u8> = house
                .cells()
                .iter()
                .map(|&(r, c)| self.values[r][c])
                .filter(|&d| d != 0)
                .collect();
            if digits.len() != SIZE {
                return Err(house);
            }
        }
        Ok(())
    }

    pub(crate) fn fill(&mut self, row: usize, col: usize, value: u8) {
        self.values[row][col] = value;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.values.iter().enumerate() {
            if r > 0 && r % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for (c, &value) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(if c % 3 == 0 { " | " } else { " " })?;
                }
                if value == 0 {
                    f.write_str(".")?;
                } else {
                    write!(f, "{value}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
