//! The read-only view of a CNF formula shared by both storage layouts.
//!
//! The parser exists in two variants (one heap array per clause, or one
//! contiguous pool indexed by `(start, len)` spans). Everything downstream of
//! parsing (search, verification, printing) is written against
//! [`ClauseStore`] so either layout can be handed to it.

use crate::sat::literal::{variable, Literal};
use std::fmt;

/// A CNF formula: a declared variable count and an ordered list of clauses.
pub trait ClauseStore {
    /// Number of variables; every literal's variable lies in `1..=num_vars`.
    fn num_vars(&self) -> u32;

    /// Number of stored clauses.
    fn num_clauses(&self) -> usize;

    /// The literals of clause `index`, in stored order.
    ///
    /// # Panics
    ///
    /// If `index >= self.num_clauses()`.
    fn clause(&self, index: usize) -> &[Literal];

    /// Total number of literal occurrences over all clauses.
    fn num_literals(&self) -> usize {
        (0..self.num_clauses()).map(|i| self.clause(i).len()).sum()
    }

    /// Iterates the clauses in stored order.
    fn clauses(&self) -> Clauses<'_, Self>
    where
        Self: Sized,
    {
        Clauses {
            store: self,
            next: 0,
        }
    }

    /// The first literal whose variable lies outside `1..=num_vars`, with the
    /// index of its clause.
    fn first_out_of_range(&self) -> Option<(usize, Literal)>
    where
        Self: Sized,
    {
        let num_vars = self.num_vars();
        self.clauses().enumerate().find_map(|(i, clause)| {
            clause
                .iter()
                .find(|&&lit| variable(lit) == 0 || variable(lit) > num_vars)
                .map(|&lit| (i, lit))
        })
    }
}

/// Iterator over the clauses of a [`ClauseStore`].
#[derive(Debug)]
pub struct Clauses<'a, S: ClauseStore + ?Sized> {
    store: &'a S,
    next: usize,
}

impl<'a, S: ClauseStore + ?Sized> Iterator for Clauses<'a, S> {
    type Item = &'a [Literal];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.store.num_clauses() {
            return None;
        }
        let clause = self.store.clause(self.next);
        self.next += 1;
        Some(clause)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.store.num_clauses().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<S: ClauseStore + ?Sized> ExactSizeIterator for Clauses<'_, S> {}

/// Renders a store in DIMACS form: the header line, then one line per clause,
/// each literal followed by a space and the clause closed by `0`.
///
/// Comments and original spacing are not reproduced, but re-parsing the output
/// yields the same variable count and clause sequence.
///
/// # Errors
///
/// Propagates formatter errors.
pub fn write_dimacs<S: ClauseStore + ?Sized>(store: &S, f: &mut impl fmt::Write) -> fmt::Result {
    writeln!(f, "p cnf {} {}", store.num_vars(), store.num_clauses())?;
    for i in 0..store.num_clauses() {
        for lit in store.clause(i) {
            write!(f, "{lit} ")?;
        }
        writeln!(f, "0")?;
    }
    Ok(())
}
