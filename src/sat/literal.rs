#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literals are plain signed integers, exactly as they appear in DIMACS text:
//! the magnitude is the 1-based variable id and the sign is the polarity.
//! `0` is the clause terminator and never appears inside a stored clause.

/// A signed literal (`3`, `-7`, ...).
pub type Literal = i32;

/// A 1-based variable id.
pub type Variable = u32;

/// The variable a literal refers to.
#[inline]
#[must_use]
pub const fn variable(lit: Literal) -> Variable {
    lit.unsigned_abs()
}

/// `true` for a positive literal, `false` for a negated one.
#[inline]
#[must_use]
pub const fn polarity(lit: Literal) -> bool {
    lit > 0
}

/// Builds the literal of `var` with the given polarity.
///
/// # Panics
///
/// If `var` does not fit in an `i32`. Variable ids come from a DIMACS header or
/// the sudoku encoder, both of which stay far below that bound.
#[inline]
#[must_use]
pub fn from_parts(var: Variable, polarity: bool) -> Literal {
    let var = i32::try_from(var).expect("variable id overflowed i32");
    if polarity { var } else { -var }
}

/// Value of `lit` given the value of its variable.
#[inline]
#[must_use]
pub const fn apply(lit: Literal, var_value: bool) -> bool {
    var_value == polarity(lit)
}
