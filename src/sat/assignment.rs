#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Trinary variable assignments.

use crate::sat::error::AllocError;
use crate::sat::literal::{apply, from_parts, variable, Literal, Variable};
use core::ops::Index;
use itertools::Itertools;
use std::fmt;

/// The value of one variable.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// Not yet given a value.
    #[default]
    Unassigned,
    /// Holds the given truth value.
    Assigned(bool),
}

impl VarState {
    /// `true` once a value is set.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// `true` while no value is set.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }

    /// `true` if assigned true.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    /// `true` if assigned false.
    #[must_use]
    pub const fn is_false(self) -> bool {
        matches!(self, Self::Assigned(false))
    }

    /// The truth value, if any.
    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

/// A mapping from variables `1..=num_vars` to [`VarState`].
///
/// Slot 0 is allocated but never used so that a variable id indexes directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    states: Vec<VarState>,
}

impl Assignment {
    /// A fully unassigned assignment over `num_vars` variables.
    ///
    /// # Errors
    ///
    /// If the value array cannot be allocated.
    pub fn new(num_vars: u32) -> Result<Self, AllocError> {
        let slots = num_vars as usize + 1;
        let mut states = Vec::new();
        states.try_reserve_exact(slots)?;
        states.resize(slots, VarState::Unassigned);
        Ok(Self { states })
    }

    /// Number of variables covered.
    #[must_use]
    pub fn num_vars(&self) -> u32 {
        u32::try_from(self.states.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// `true` if `var` lies in `1..=num_vars`.
    #[must_use]
    pub fn contains(&self, var: Variable) -> bool {
        var != 0 && var <= self.num_vars()
    }

    /// The state of `var`; out-of-range variables read as unassigned.
    #[must_use]
    pub fn state(&self, var: Variable) -> VarState {
        self.states
            .get(var as usize)
            .copied()
            .unwrap_or(VarState::Unassigned)
    }

    /// The truth value of `var`, if assigned.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.state(var).value()
    }

    /// The value of a literal: `Some(true)` if it holds, `Some(false)` if its
    /// negation holds, `None` while its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(variable(lit)).map(|b| apply(lit, b))
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal) {
        self.states[variable(lit) as usize] = VarState::Assigned(lit > 0);
    }

    /// Overwrites the state of `var`, e.g. to restore it on backtrack.
    pub fn set(&mut self, var: Variable, state: VarState) {
        self.states[var as usize] = state;
    }

    /// The lowest variable id that is still unassigned.
    #[must_use]
    pub fn first_unassigned(&self) -> Option<Variable> {
        self.states
            .iter()
            .skip(1)
            .position(|s| s.is_unassigned())
            .and_then(|i| Variable::try_from(i + 1).ok())
    }

    /// One literal per variable `1..=num_vars`, signed by its value.
    ///
    /// Variables left unassigned (they occur in no clause the search had to
    /// decide) are reported as the positive literal.
    pub fn model_literals(&self) -> impl Iterator<Item = Literal> + '_ {
        (1..=self.num_vars()).map(|var| from_parts(var, self.state(var) != VarState::Assigned(false)))
    }

    /// The variables currently true, ascending.
    #[must_use]
    pub fn true_variables(&self) -> Vec<Variable> {
        (1..=self.num_vars())
            .filter(|&var| self.state(var).is_true())
            .collect_vec()
    }
}

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.states[index as usize]
    }
}

/// Prints the model literals separated by spaces (no terminating `0`).
impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.model_literals().join(" "))
    }
}
