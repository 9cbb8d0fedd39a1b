#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Percent sudoku: the grid model, its placement rules, and solving through
//! the SAT engine.

/// Errors raised while loading, editing or solving a grid.
pub mod error;

/// The 9×9 grid and its puzzle-file format.
pub mod grid;

/// The thirty groups of cells that must each contain every digit once.
pub mod houses;

/// CNF encoding, decoding and the end-to-end solve.
pub mod solver;
