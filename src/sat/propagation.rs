#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unit propagation by repeated full scans.
//!
//! Each pass visits every clause:
//! - a clause with a true literal is skipped;
//! - a clause with no unassigned literal left is a conflict;
//! - a clause with exactly one unassigned literal forces it.
//!
//! Forced values are written immediately, so later clauses in the same pass
//! already see them. Passes repeat until one forces nothing. There is no
//! watch or occurrence index: a pass costs the total number of literal
//! occurrences.

use crate::sat::assignment::Assignment;
use crate::sat::clause_storage::ClauseStore;
use crate::sat::literal::Literal;
use crate::sat::trail::Trail;

/// How a clause evaluates under a partial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseState {
    /// Some literal is true.
    Satisfied,
    /// All literals are false.
    Falsified,
    /// Exactly one literal is unassigned and the rest are false.
    Unit(Literal),
    /// At least two literals are unassigned.
    Unresolved,
}

/// Classifies `clause` under `assignment`.
#[must_use]
pub fn clause_state(clause: &[Literal], assignment: &Assignment) -> ClauseState {
    let mut unassigned = 0_usize;
    let mut last = 0;
    for &lit in clause {
        match assignment.literal_value(lit) {
            Some(true) => return ClauseState::Satisfied,
            Some(false) => {}
            None => {
                unassigned += 1;
                last = lit;
            }
        }
    }
    match unassigned {
        0 => ClauseState::Falsified,
        1 => ClauseState::Unit(last),
        _ => ClauseState::Unresolved,
    }
}

/// Result of running propagation to its fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// No clause is falsified.
    Fixpoint {
        /// Assignments made.
        forced: usize,
    },
    /// The clause with this index became false; `forced` assignments were made
    /// before it was found.
    Conflict {
        /// Index of the falsified clause.
        clause: usize,
        /// Assignments made before it was found.
        forced: usize,
    },
}

/// Runs unit propagation until a pass forces nothing or a conflict appears.
/// Every forced assignment is recorded on `trail`.
pub fn propagate<S: ClauseStore>(
    store: &S,
    assignment: &mut Assignment,
    trail: &mut Trail,
) -> Propagation {
    let mut forced = 0;
    loop {
        let mut changed = false;
        for index in 0..store.num_clauses() {
            match clause_state(store.clause(index), assignment) {
                ClauseState::Satisfied | ClauseState::Unresolved => {}
                ClauseState::Falsified => {
                    return Propagation::Conflict {
                        clause: index,
                        forced,
                    };
                }
                ClauseState::Unit(lit) => {
                    trail.assign(assignment, lit);
                    forced += 1;
                    changed = true;
                }
            }
        }
        if !changed {
            return Propagation::Fixpoint { forced };
        }
    }
}

/// `true` if every clause has a true literal.
#[must_use]
pub fn all_satisfied<S: ClauseStore>(store: &S, assignment: &Assignment) -> bool {
    (0..store.num_clauses()).all(|i| {
        store
            .clause(i)
            .iter()
            .any(|&lit| assignment.literal_value(lit) == Some(true))
    })
}
