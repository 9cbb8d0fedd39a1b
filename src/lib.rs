#![deny(missing_docs)]
//! A DPLL SAT solver for DIMACS CNF files, and a percent sudoku solver built
//! on top of it.

/// The `sat` module parses DIMACS CNF into either of two clause layouts,
/// searches for a model with DPLL and checks models independently.
pub mod sat;

/// The `sudoku` module encodes percent sudoku puzzles as CNF, solves them with
/// the `sat` module and writes the digits back into the grid.
pub mod sudoku;
