//! Error types shared by the clause stores, the DIMACS parsers, the search
//! engine and the model verifier.
//!
//! Unsatisfiability and timeouts are *not* errors; they are ordinary
//! [`Status`](crate::sat::solver::Status) values. The types here cover the
//! cases where an operation could not be carried out at all.

use crate::sat::literal::Literal;
use std::collections::TryReserveError;
use thiserror::Error;

/// A growth operation (literal pool, clause table, assignment, trail) could
/// not obtain memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("allocation failed: {0}")]
pub struct AllocError(#[from] pub TryReserveError);

/// Errors raised while reading a DIMACS CNF file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be opened or read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// No `p cnf` line was found before clause data (or before end of input).
    #[error("missing `p cnf` header (first content at line {line})")]
    MissingHeader {
        /// 1-based line number of the offending content, or of the end of input.
        line: usize,
    },

    /// A line starting with `p` did not have the `p cnf <vars> <clauses>` shape.
    #[error("malformed header at line {line}: {text:?}")]
    MalformedHeader {
        /// 1-based line number of the header.
        line: usize,
        /// The trimmed header text.
        text: String,
    },

    /// The header declared a negative variable or clause count.
    #[error("negative count in header at line {line}")]
    NegativeCount {
        /// 1-based line number of the header.
        line: usize,
    },

    /// A buffer could not grow while storing clauses.
    #[error(transparent)]
    Alloc(#[from] AllocError),
}

impl From<TryReserveError> for ParseError {
    fn from(e: TryReserveError) -> Self {
        Self::Alloc(AllocError(e))
    }
}

/// The verifier's error channel: the assignment and the store do not fit
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A clause mentions a variable outside `1..=num_vars` of the assignment.
    #[error("clause {clause} references literal {literal} outside 1..={num_vars}")]
    VariableOutOfRange {
        /// Index of the clause holding the literal.
        clause: usize,
        /// The offending literal.
        literal: Literal,
        /// Number of variables covered by the assignment.
        num_vars: u32,
    },
}

/// Internal failures of the search engine, reported as the ERROR status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The assignment or trail could not be allocated.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// The store holds a literal whose variable exceeds its declared count.
    #[error("clause {clause} references literal {literal} beyond the declared variable count")]
    VariableOutOfRange {
        /// Index of the clause holding the literal.
        clause: usize,
        /// The offending literal.
        literal: Literal,
    },
}

impl From<TryReserveError> for SolveError {
    fn from(e: TryReserveError) -> Self {
        Self::Alloc(AllocError(e))
    }
}
