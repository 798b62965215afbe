#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Atoms and signed literals.
//!
//! A literal is stored the way DIMACS writes it: a non-zero `i32` whose magnitude
//! is the atom and whose sign is the polarity. Negation is arithmetic negation.

use crate::sat::error::InputError;
use core::ops::{Neg, Not};
use std::fmt::{self, Display, Formatter};

/// A propositional variable, numbered from 1.
pub type Atom = u32;

/// A signed occurrence of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(i32);

impl Literal {
    /// Builds the literal of `atom` with the given polarity.
    ///
    /// # Panics
    ///
    /// If `atom` is zero or does not fit in an `i32`.
    #[must_use]
    pub fn new(atom: Atom, polarity: bool) -> Self {
        assert!(atom != 0, "atom 0 has no literal");
        let value = i32::try_from(atom).expect("atom overflowed i32");
        if polarity { Self(value) } else { Self(-value) }
    }

    /// Wraps a DIMACS integer. Returns `None` for `0`, which terminates clauses
    /// and is never a literal.
    #[must_use]
    pub const fn from_dimacs(value: i32) -> Option<Self> {
        if value == 0 || value == i32::MIN {
            None
        } else {
            Some(Self(value))
        }
    }

    #[must_use]
    pub const fn atom(self) -> Atom {
        self.0.unsigned_abs()
    }

    /// `true` for a positive occurrence.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0.is_positive()
    }

    #[must_use]
    pub const fn negated(self) -> Self {
        Self(-self.0)
    }

    /// The DIMACS integer for this literal.
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        self.0
    }

    /// Position of the atom in dense atom-indexed tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.atom() as usize
    }
}

/// Reads a DIMACS integer as a literal.
///
/// `0` is [`InputError::ZeroLiteral`]. `i32::MIN` has no negation and is
/// [`InputError::UnrepresentableLiteral`].
impl TryFrom<i32> for Literal {
    type Error = InputError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Err(InputError::ZeroLiteral),
            i32::MIN => Err(InputError::UnrepresentableLiteral {
                literal: i64::from(value),
            }),
            _ => Ok(Self(value)),
        }
    }
}

#[cfg(test)]
impl Literal {
    pub fn from(value: i32) -> Self {
        Self::from_dimacs(value).unwrap_or_else(|| panic!("{value} is not a literal"))
    }
}

impl From<Literal> for i32 {
    fn from(literal: Literal) -> Self {
        literal.0
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Neg for &Literal {
    type Output = Literal;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1, false).negated(), Literal::new(1, true));
        assert_eq!(-Literal::from(-4), Literal::from(4));
        assert_eq!(!Literal::from(7), Literal::from(-7));
    }

    #[test]
    fn test_atom_and_polarity() {
        let lit = Literal::from(-12);
        assert_eq!(lit.atom(), 12);
        assert!(!lit.polarity());
        assert!(lit.negated().polarity());
        assert_eq!(lit.index(), 12);
    }

    #[test]
    fn test_from_dimacs_rejects_zero() {
        assert_eq!(Literal::from_dimacs(0), None);
        assert_eq!(Literal::from_dimacs(3), Some(Literal::from(3)));
    }

    #[test]
    fn test_try_from_reports_non_literals() {
        assert_eq!(Literal::try_from(-9).map(Literal::to_i32).ok(), Some(-9));
        assert!(matches!(Literal::try_from(0), Err(InputError::ZeroLiteral)));
        assert!(matches!(
            Literal::try_from(i32::MIN),
            Err(InputError::UnrepresentableLiteral { literal }) if literal == i64::from(i32::MIN)
        ));
    }

    #[test]
    fn test_display_matches_dimacs() {
        assert_eq!(Literal::from(-3).to_string(), "-3");
        assert_eq!(i32::from(Literal::new(5, true)), 5);
    }
}
