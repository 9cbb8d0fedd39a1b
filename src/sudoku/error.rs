//! Errors of the sudoku front end.

use crate::sat::error::{AllocError, SolveError, VerifyError};
use crate::sudoku::solver::SudokuSolution;
use thiserror::Error;

/// Failures of puzzle loading, grid editing and the encode/solve/decode
/// pipeline. The grid being solved is left untouched whenever one of these is
/// returned.
#[derive(Debug, Error)]
pub enum SudokuError {
    /// A puzzle line holds fewer than 81 characters.
    #[error("puzzle line has {len} characters, expected at least 81")]
    InvalidLine {
        /// Characters found on the line.
        len: usize,
    },

    /// Given cells are fixed.
    #[error("cell ({row}, {col}) is given and cannot be changed")]
    GivenCell {
        /// 0-based row.
        row: usize,
        /// 0-based column.
        col: usize,
    },

    /// Cell values are `0` (empty) to `9`.
    #[error("{0} is not a digit between 0 and 9")]
    InvalidDigit(u8),

    /// Rows and columns are `0..9`.
    #[error("cell ({row}, {col}) is outside the 9x9 grid")]
    OutOfBounds {
        /// 0-based row.
        row: usize,
        /// 0-based column.
        col: usize,
    },

    /// The clause store for the puzzle could not be built.
    #[error("failed to encode puzzle: {0}")]
    Encode(#[from] AllocError),

    /// The encoding is UNSAT. Carries the encoding and the solver report.
    #[error("puzzle has no solution")]
    Unsatisfiable(Box<SudokuSolution>),

    /// The time budget ran out. Carries the attempt.
    #[error("solver timed out")]
    TimedOut(Box<SudokuSolution>),

    /// The search could not run. Carries the attempt.
    #[error("solver failed: {source}")]
    Solver {
        /// Why the search could not run.
        source: SolveError,
        /// The encoding and the ERROR report.
        attempt: Box<SudokuSolution>,
    },

    /// The model does not fit the encoding it was produced for.
    #[error("model rejected: {0}")]
    Verify(#[from] VerifyError),

    /// The model leaves an encoded clause unsatisfied.
    #[error("model violates clause {clause}")]
    ModelViolates {
        /// Index of the unsatisfied clause.
        clause: usize,
    },

    /// An empty cell has no true digit variable in the model.
    #[error("no digit assigned to cell ({row}, {col})")]
    Inconsistent {
        /// 0-based row.
        row: usize,
        /// 0-based column.
        col: usize,
    },

    /// A puzzle or export file could not be read or written.
    #[error("failed to read or write puzzle data: {0}")]
    Io(#[from] std::io::Error),

    /// A puzzle file held no usable line.
    #[error("no puzzles found")]
    NoPuzzles,
}

impl SudokuError {
    /// The encoding and solver report of a search that ran but found no
    /// model, so the attempt can still be exported.
    #[must_use]
    pub fn attempt(&self) -> Option<&SudokuSolution> {
        match self {
            Self::Unsatisfiable(attempt)
            | Self::TimedOut(attempt)
            | Self::Solver { attempt, .. } => Some(attempt),
            _ => None,
        }
    }
}
