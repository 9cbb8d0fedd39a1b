#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The pooled Clause Store: every clause lives in one contiguous literal
//! buffer and is addressed by a `(start, len)` span.
//!
//! Both the pool and the span table grow geometrically (factor 2). Growth is
//! done through `try_reserve`, so running out of memory fails the enclosing
//! operation with [`AllocError`] instead of leaving a truncated store behind.

use crate::sat::clause_storage::{write_dimacs, ClauseStore};
use crate::sat::cnf::Cnf;
use crate::sat::error::AllocError;
use crate::sat::literal::Literal;
use std::fmt;

/// Initial capacity of the literal pool.
pub const INITIAL_POOL_CAPACITY: usize = 1024;

/// Initial capacity of the span table.
pub const INITIAL_SPAN_CAPACITY: usize = 1024;

/// Location of one clause inside the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Pool index of the first literal.
    pub start: usize,
    /// Number of literals.
    pub len: usize,
}

impl Span {
    /// One past the last literal.
    #[must_use]
    pub const fn end(self) -> usize {
        self.start + self.len
    }
}

/// A CNF formula stored as one literal pool plus a span per clause.
///
/// Spans never overlap: clauses are only ever appended, each one directly
/// after the previous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PooledCnf {
    num_vars: u32,
    spans: Vec<Span>,
    pool: Vec<Literal>,
}

/// Doubles `buf`'s capacity (or gives it `initial`) until it can hold
/// `needed` more elements.
fn grow<T>(buf: &mut Vec<T>, needed: usize, initial: usize) -> Result<(), AllocError> {
    let required = buf.len() + needed;
    if required <= buf.capacity() {
        return Ok(());
    }
    let mut target = buf.capacity().max(initial);
    while target < required {
        target = target.saturating_mul(2);
    }
    buf.try_reserve_exact(target - buf.len())?;
    Ok(())
}

impl PooledCnf {
    /// An empty store declaring `num_vars` variables, with the initial
    /// buffers already reserved.
    ///
    /// # Errors
    ///
    /// If the initial buffers cannot be allocated.
    pub fn with_vars(num_vars: u32) -> Result<Self, AllocError> {
        let mut store = Self {
            num_vars,
            spans: Vec::new(),
            pool: Vec::new(),
        };
        store.pool.try_reserve_exact(INITIAL_POOL_CAPACITY)?;
        store.spans.try_reserve_exact(INITIAL_SPAN_CAPACITY)?;
        Ok(store)
    }

    /// Appends a clause at the end of the pool.
    ///
    /// # Errors
    ///
    /// If the pool or the span table cannot grow. The store is left unchanged.
    pub fn push_clause(&mut self, literals: &[Literal]) -> Result<(), AllocError> {
        grow(&mut self.spans, 1, INITIAL_SPAN_CAPACITY)?;
        grow(&mut self.pool, literals.len(), INITIAL_POOL_CAPACITY)?;
        self.spans.push(Span {
            start: self.pool.len(),
            len: literals.len(),
        });
        self.pool.extend_from_slice(literals);
        Ok(())
    }

    /// Starts a clause whose literals will follow through [`Self::push_literal`].
    ///
    /// # Errors
    ///
    /// If the span table cannot grow.
    pub fn begin_clause(&mut self) -> Result<(), AllocError> {
        grow(&mut self.spans, 1, INITIAL_SPAN_CAPACITY)?;
        self.spans.push(Span {
            start: self.pool.len(),
            len: 0,
        });
        Ok(())
    }

    /// Appends a literal to the clause opened by the last [`Self::begin_clause`].
    ///
    /// # Errors
    ///
    /// If the pool cannot grow.
    ///
    /// # Panics
    ///
    /// If no clause has been started.
    pub fn push_literal(&mut self, lit: Literal) -> Result<(), AllocError> {
        grow(&mut self.pool, 1, INITIAL_POOL_CAPACITY)?;
        self.pool.push(lit);
        let span = self
            .spans
            .last_mut()
            .expect("push_literal called before begin_clause");
        span.len += 1;
        Ok(())
    }

    /// Drops the last clause and hands its literal slots back to the pool.
    pub fn abandon_last_clause(&mut self) {
        if let Some(span) = self.spans.pop() {
            self.pool.truncate(span.start);
        }
    }

    /// Clause locations, in order.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Number of literal slots in use.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// The whole literal pool.
    #[must_use]
    pub fn pool(&self) -> &[Literal] {
        &self.pool
    }
}

impl ClauseStore for PooledCnf {
    fn num_vars(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> usize {
        self.spans.len()
    }

    fn clause(&self, index: usize) -> &[Literal] {
        let span = self.spans[index];
        &self.pool[span.start..span.end()]
    }

    fn num_literals(&self) -> usize {
        self.pool.len()
    }
}

impl fmt::Display for PooledCnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dimacs(self, f)
    }
}

impl TryFrom<&Cnf> for PooledCnf {
    type Error = AllocError;

    fn try_from(cnf: &Cnf) -> Result<Self, Self::Error> {
        let mut pooled = Self::with_vars(cnf.num_vars)?;
        for clause in cnf.iter() {
            pooled.push_clause(clause.as_slice())?;
        }
        Ok(pooled)
    }
}
