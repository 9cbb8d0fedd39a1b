#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The undo log used for backtracking.
//!
//! Every assignment made during search (by propagation or by a decision) is
//! recorded as a [`Step`]. A choice point remembers the trail length at the
//! time it was taken; returning to it pops and reverts every later step.
//! Only the variables touched since the choice point are written back.

use crate::sat::assignment::{Assignment, VarState};
use crate::sat::error::AllocError;
use crate::sat::literal::{variable, Literal, Variable};
use core::ops::Index;

/// One recorded assignment.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Step {
    /// The variable that was assigned.
    pub var: Variable,
    /// Its state before the assignment.
    pub previous: VarState,
}

/// Assignments in the order they were made, newest last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    steps: Vec<Step>,
}

impl Trail {
    /// A trail with room for every variable to be assigned once.
    ///
    /// # Errors
    ///
    /// If the step buffer cannot be allocated.
    pub fn new(num_vars: u32) -> Result<Self, AllocError> {
        let mut steps = Vec::new();
        steps.try_reserve_exact(num_vars as usize)?;
        Ok(Self { steps })
    }

    /// Number of recorded steps; doubles as a mark for [`Self::undo_to`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` if nothing has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Makes `lit` true in `assignment` and records the previous value.
    pub fn assign(&mut self, assignment: &mut Assignment, lit: Literal) {
        let var = variable(lit);
        self.steps.push(Step {
            var,
            previous: assignment[var],
        });
        assignment.assign(lit);
    }

    /// Reverts every step recorded after `mark` (a length previously
    /// returned by [`Self::len`]).
    pub fn undo_to(&mut self, assignment: &mut Assignment, mark: usize) {
        while self.steps.len() > mark {
            if let Some(step) = self.steps.pop() {
                assignment.set(step.var, step.previous);
            }
        }
    }
}

impl Index<usize> for Trail {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}
