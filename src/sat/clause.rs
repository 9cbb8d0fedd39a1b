//! Clauses of the direct layout.

use crate::sat::error::AllocError;
use crate::sat::literal::Literal;
use core::ops::Index;

/// A clause in the direct layout: its own heap array of literals.
///
/// Literal order is kept exactly as read so that printing a store reproduces
/// the input clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    /// The literals, in input order.
    pub literals: Vec<Literal>,
}

impl Clause {
    /// Wraps an existing literal vector.
    #[must_use]
    pub const fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Copies `literals` into a freshly allocated clause, reporting allocation
    /// failure instead of aborting.
    ///
    /// # Errors
    ///
    /// If the literal array cannot be allocated.
    pub fn try_from_slice(literals: &[Literal]) -> Result<Self, AllocError> {
        let mut owned = Vec::new();
        owned.try_reserve_exact(literals.len())?;
        owned.extend_from_slice(literals);
        Ok(Self { literals: owned })
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// `true` for the empty clause, which no assignment satisfies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// `true` for a single-literal clause.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// The literals in order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// The literals as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Literal] {
        &self.literals
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl AsRef<[Literal]> for Clause {
    fn as_ref(&self) -> &[Literal] {
        &self.literals
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        Self::new(literals)
    }
}

impl From<&[Literal]> for Clause {
    fn from(literals: &[Literal]) -> Self {
        Self::new(literals.to_vec())
    }
}

impl From<&Clause> for Vec<Literal> {
    fn from(clause: &Clause) -> Self {
        clause.literals.clone()
    }
}
