#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Branching variable choice.

use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;

/// Chooses the next branching variable.
pub trait VariableSelection {
    /// The next variable to branch on, or `None` once all are assigned.
    fn pick(&mut self, assignment: &Assignment) -> Option<Variable>;
}

/// Always branches on the lowest-numbered unassigned variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedOrder;

impl VariableSelection for FixedOrder {
    fn pick(&mut self, assignment: &Assignment) -> Option<Variable> {
        assignment.first_unassigned()
    }
}
