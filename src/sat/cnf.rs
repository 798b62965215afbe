#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A CNF problem as read from input, before any solver state exists.

use crate::sat::clause::{Disjunction, is_tautology};
use crate::sat::error::InputError;
use crate::sat::literal::Literal;
use crate::sat::solver::Solutions;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Clauses over atoms `1..=atom_count`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    pub atom_count: usize,
    pub clauses: Vec<Disjunction>,
}

impl Cnf {
    /// Checks every literal against the atom range.
    ///
    /// `LiteralOutOfRange` reports the 1-based clause number in place of a line.
    ///
    /// # Errors
    ///
    /// [`InputError::ZeroLiteral`] for a `0` inside a clause,
    /// [`InputError::UnrepresentableLiteral`] for `i32::MIN`, and
    /// [`InputError::LiteralOutOfRange`] for an atom above `atom_count`.
    pub fn try_new(atom_count: usize, clauses: Vec<Vec<i32>>) -> Result<Self, InputError> {
        let clauses = clauses
            .into_iter()
            .enumerate()
            .map(|(idx, clause)| {
                clause
                    .into_iter()
                    .map(|value| {
                        let literal = Literal::try_from(value)?;
                        if literal.index() > atom_count {
                            return Err(InputError::LiteralOutOfRange {
                                line: idx + 1,
                                literal: i64::from(value),
                                atom_count,
                            });
                        }
                        Ok(literal)
                    })
                    .collect::<Result<Disjunction, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            atom_count,
            clauses,
        })
    }

    /// Like [`Cnf::try_new`], with the atom range sized to the largest atom
    /// mentioned.
    ///
    /// # Errors
    ///
    /// As [`Cnf::try_new`], except that no atom can be out of range.
    pub fn try_from_clauses(clauses: Vec<Vec<i32>>) -> Result<Self, InputError> {
        let atom_count = clauses
            .iter()
            .flatten()
            .map(|value| value.unsigned_abs() as usize)
            .max()
            .unwrap_or(0);
        Self::try_new(atom_count, clauses)
    }

    /// Largest atom named by any clause, which may exceed `atom_count` if the
    /// fields were filled in by hand.
    #[must_use]
    pub fn max_atom(&self) -> usize {
        self.clauses
            .iter()
            .flatten()
            .map(|lit| lit.index())
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Disjunction> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(|c| c.len()).sum()
    }

    /// `true` if `model` makes some literal of every clause true.
    ///
    /// Tautologies hold whatever the model says about their atoms.
    #[must_use]
    pub fn verify(&self, model: &Solutions) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|lit| model.satisfies(*lit)) || is_tautology(clause)
        })
    }
}

/// Builds a problem from trusted raw clauses, sizing the atom range to the
/// largest atom mentioned. Values that are not literals (`0` and `i32::MIN`)
/// are dropped. Input from outside goes through [`Cnf::try_from_clauses`].
impl From<Vec<Vec<i32>>> for Cnf {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        let clauses: Vec<Disjunction> = clauses
            .into_iter()
            .map(|clause| clause.into_iter().filter_map(Literal::from_dimacs).collect())
            .collect();
        let mut cnf = Self {
            atom_count: 0,
            clauses,
        };
        cnf.atom_count = cnf.max_atom();
        cnf
    }
}

/// Renders the problem back as DIMACS.
impl Display for Cnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.atom_count, self.clauses.len())?;
        for clause in &self.clauses {
            if clause.is_empty() {
                writeln!(f, "0")?;
            } else {
                writeln!(f, "{} 0", clause.iter().join(" "))?;
            }
        }
        Ok(())
    }
}
