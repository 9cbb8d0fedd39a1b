#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Independent check of a model against a clause store.
//!
//! The verifier shares nothing with the search engine besides the
//! [`Assignment`] type: it re-evaluates every clause from scratch, so a SAT
//! result that survives it does not depend on propagation being correct.

use crate::sat::assignment::Assignment;
use crate::sat::clause_storage::ClauseStore;
use crate::sat::error::VerifyError;
use crate::sat::literal::variable;

/// Outcome of checking a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Every clause has a true literal.
    Satisfied,
    /// The first clause without a true literal. Unassigned literals never
    /// satisfy a clause.
    Violated {
        /// Index of the clause.
        clause: usize,
    },
}

impl Verdict {
    /// `true` for [`Verdict::Satisfied`].
    #[must_use]
    pub const fn is_satisfied(self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Checks `assignment` against every clause of `store`.
///
/// # Errors
///
/// [`VerifyError::VariableOutOfRange`] if any clause mentions a variable that
/// the assignment does not cover. The whole store is range-checked before any
/// clause is evaluated, so an out-of-range literal is reported even when an
/// earlier clause is violated.
pub fn verify<S: ClauseStore>(store: &S, assignment: &Assignment) -> Result<Verdict, VerifyError> {
    let num_vars = assignment.num_vars();

    for index in 0..store.num_clauses() {
        if let Some(&literal) = store
            .clause(index)
            .iter()
            .find(|&&lit| !assignment.contains(variable(lit)))
        {
            return Err(VerifyError::VariableOutOfRange {
                clause: index,
                literal,
                num_vars,
            });
        }
    }

    let violated = (0..store.num_clauses()).find(|&index| {
        !store
            .clause(index)
            .iter()
            .any(|&lit| assignment.literal_value(lit) == Some(true))
    });

    Ok(violated.map_or(Verdict::Satisfied, |clause| Verdict::Violated { clause }))
}
