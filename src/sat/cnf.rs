#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The direct-layout Clause Store: one heap-allocated literal array per clause.

use crate::sat::clause::Clause;
use crate::sat::clause_storage::{write_dimacs, ClauseStore};
use crate::sat::error::AllocError;
use crate::sat::literal::{variable, Literal};
use crate::sat::pooled::PooledCnf;
use core::ops::Index;
use std::fmt;

/// Initial capacity of the clause table; it doubles from there.
pub const INITIAL_CLAUSE_CAPACITY: usize = 1024;

/// A CNF formula whose clauses each own their literals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    /// Declared number of variables.
    pub num_vars: u32,
    /// The clauses, in input order.
    pub clauses: Vec<Clause>,
}

impl Cnf {
    /// Builds a store from literal lists. The variable count is the largest
    /// variable mentioned.
    pub fn new<I, J>(clauses: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = Literal>,
    {
        let clauses: Vec<Clause> = clauses
            .into_iter()
            .map(|c| Clause::new(c.into_iter().collect()))
            .collect();
        let num_vars = clauses
            .iter()
            .flat_map(Clause::iter)
            .map(|&l| variable(l))
            .max()
            .unwrap_or(0);
        Self { num_vars, clauses }
    }

    /// An empty store declaring `num_vars` variables.
    #[must_use]
    pub const fn with_vars(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    /// Appends a clause, growing the clause table by doubling.
    ///
    /// # Errors
    ///
    /// If the table or the clause's own literal array cannot grow.
    pub fn push_clause(&mut self, literals: &[Literal]) -> Result<(), AllocError> {
        if self.clauses.len() == self.clauses.capacity() {
            let extra = self.clauses.capacity().max(INITIAL_CLAUSE_CAPACITY);
            self.clauses.try_reserve_exact(extra)?;
        }
        self.clauses.push(Clause::try_from_slice(literals)?);
        Ok(())
    }

    /// The clauses in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// `true` if the formula has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl ClauseStore for Cnf {
    fn num_vars(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    fn clause(&self, index: usize) -> &[Literal] {
        self.clauses[index].as_slice()
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dimacs(self, f)
    }
}

impl From<Vec<Vec<Literal>>> for Cnf {
    fn from(clauses: Vec<Vec<Literal>>) -> Self {
        Self::new(clauses)
    }
}

impl From<&PooledCnf> for Cnf {
    fn from(pooled: &PooledCnf) -> Self {
        Self {
            num_vars: pooled.num_vars(),
            clauses: pooled.clauses().map(Clause::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_var_count() {
        let cnf = Cnf::new(vec![vec![1, -2], vec![2, 3]]);
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.clause(0), &[1, -2]);
    }

    #[test]
    fn test_empty_clause_is_kept() {
        let cnf = Cnf::new(vec![vec![], vec![1]]);
        assert_eq!(cnf.num_clauses(), 2);
        assert!(cnf[0].is_empty());
    }

    #[test]
    fn test_push_clause_grows() {
        let mut cnf = Cnf::with_vars(2);
        for _ in 0..INITIAL_CLAUSE_CAPACITY + 5 {
            cnf.push_clause(&[1, -2]).unwrap();
        }
        assert_eq!(cnf.len(), INITIAL_CLAUSE_CAPACITY + 5);
        assert_eq!(cnf.num_literals(), 2 * (INITIAL_CLAUSE_CAPACITY + 5));
    }

    #[test]
    fn test_display() {
        let mut cnf = Cnf::with_vars(3);
        cnf.push_clause(&[1, 2]).unwrap();
        cnf.push_clause(&[-1, 3]).unwrap();
        cnf.push_clause(&[]).unwrap();
        assert_eq!(cnf.to_string(), "p cnf 3 3\n1 2 0\n-1 3 0\n0\n");
    }

    #[test]
    fn test_first_out_of_range() {
        let mut cnf = Cnf::with_vars(2);
        cnf.push_clause(&[1, 2]).unwrap();
        cnf.push_clause(&[-1, 3]).unwrap();
        assert_eq!(cnf.first_out_of_range(), Some((1, 3)));
    }
}
