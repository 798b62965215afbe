#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solver interface and what a solve produces.
//!
//! [`Solver`] is implemented by the CDCL engine for every formula
//! representation, and by [`SolverImpls`], which picks the representation once
//! at construction and then delegates.

use crate::sat::cdcl::Cdcl;
use crate::sat::clause::{MapClause, VecClause};
use crate::sat::cnf::Cnf;
use crate::sat::config::{RepresentationType, SolverOptions};
use crate::sat::error::SolverError;
use crate::sat::formula::{PriorityFormula, ScanFormula};
use crate::sat::literal::{Atom, Literal};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Solution {
    Satisfiable,
    Unsatisfiable,
    /// The search stopped on an internal failure. See [`Solver::failure`].
    #[default]
    Unknown,
}

impl Solution {
    #[must_use]
    pub const fn is_sat(self) -> bool {
        matches!(self, Self::Satisfiable)
    }

    #[must_use]
    pub const fn is_unsat(self) -> bool {
        matches!(self, Self::Unsatisfiable)
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A satisfying assignment, one literal per assigned atom, sorted by atom.
///
/// Atoms the search never had to assign are absent; either value works for them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solutions(Vec<Literal>);

impl Solutions {
    #[must_use]
    pub fn new<I: IntoIterator<Item = Literal>>(literals: I) -> Self {
        Self(literals.into_iter().sorted_by_key(|l| l.atom()).collect())
    }

    /// Value of `atom`, or `None` if it is unassigned.
    #[must_use]
    pub fn value(&self, atom: Atom) -> Option<bool> {
        self.0
            .binary_search_by_key(&atom, |l| l.atom())
            .ok()
            .map(|idx| self.0[idx].polarity())
    }

    /// `true` if `literal` holds under this assignment.
    #[must_use]
    pub fn satisfies(&self, literal: Literal) -> bool {
        self.value(literal.atom()) == Some(literal.polarity())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// Counters collected while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    pub conflicts: usize,
    pub decisions: usize,
    pub propagations: usize,
    /// Clauses added by conflict analysis.
    pub learnt_clauses: usize,
    /// Resolution steps taken across all conflicts.
    pub resolutions: usize,
    /// Formula resets before a repeated solve.
    pub restarts: usize,
}

pub trait Solver {
    /// Builds a solver for `cnf`.
    fn new(cnf: &Cnf, options: &SolverOptions) -> Self
    where
        Self: Sized;

    /// Runs the search to completion.
    ///
    /// Calling it again restarts from an empty trail. Learnt clauses are kept,
    /// so the outcome is the same.
    fn solve(&mut self) -> Solution;

    /// The satisfying assignment, if the last solve found one.
    fn solutions(&self) -> Option<Solutions>;

    fn stats(&self) -> SolutionStats;

    /// The error that made the last solve end as [`Solution::Unknown`].
    fn failure(&self) -> Option<&SolverError>;
}

/// A solver whose clause representation was picked at runtime.
#[derive(Debug, Clone)]
pub enum SolverImpls {
    /// Vector-backed clauses in a formula scanned on every step.
    Array(Box<Cdcl<ScanFormula<VecClause>>>),
    /// Map-backed clauses in a status-ordered formula.
    Map(Box<Cdcl<PriorityFormula<MapClause>>>),
}

impl Solver for SolverImpls {
    fn new(cnf: &Cnf, options: &SolverOptions) -> Self {
        match options.representation {
            RepresentationType::Array => Self::Array(Box::new(Cdcl::new(cnf, options))),
            RepresentationType::Map => Self::Map(Box::new(Cdcl::new(cnf, options))),
        }
    }

    fn solve(&mut self) -> Solution {
        match self {
            Self::Array(s) => s.solve(),
            Self::Map(s) => s.solve(),
        }
    }

    fn solutions(&self) -> Option<Solutions> {
        match self {
            Self::Array(s) => s.solutions(),
            Self::Map(s) => s.solutions(),
        }
    }

    fn stats(&self) -> SolutionStats {
        match self {
            Self::Array(s) => s.stats(),
            Self::Map(s) => s.stats(),
        }
    }

    fn failure(&self) -> Option<&SolverError> {
        match self {
            Self::Array(s) => s.failure(),
            Self::Map(s) => s.failure(),
        }
    }
}
