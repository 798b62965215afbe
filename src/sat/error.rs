//! Error types for reading problems and for solving them.
//!
//! Two families exist. [`InputError`] is raised while a problem is read, before any
//! solver is built. [`StructuralError`] is raised from inside the search when the
//! trail, the check index and the formula stop agreeing. It is wrapped in a
//! [`SolverError`] naming the step that failed, and the solve ends as unknown.

use crate::sat::literal::Literal;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while reading a DIMACS formula.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be opened or read.
    #[error("could not read {}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading from a stream failed part way through.
    #[error("could not read input")]
    Stream(#[from] std::io::Error),

    /// Neither a path nor piped input was given.
    #[error("no input was provided")]
    NoInput,

    /// A clause appeared before the `p` line, so literals cannot be range checked.
    #[error("line {line}: clause found before the problem line")]
    MissingProblemLine {
        /// 1-based line number.
        line: usize,
    },

    /// The `p` line is not `p cnf <atoms> <clauses>`.
    #[error("line {line}: malformed problem line `{content}`")]
    MalformedProblemLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// A token in a clause is not an integer.
    #[error("line {line}: `{token}` is not a literal")]
    InvalidLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
        /// Parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A literal names an atom outside `1..=atom_count`.
    #[error("line {line}: literal {literal} is outside the declared {atom_count} atoms")]
    LiteralOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending literal.
        literal: i64,
        /// Atom count from the problem line.
        atom_count: usize,
    },

    /// A literal whose magnitude is not a 32-bit atom, such as `i32::MIN`.
    #[error("literal {literal} has no representable negation")]
    UnrepresentableLiteral {
        /// The offending literal.
        literal: i64,
    },

    /// A clause handed over programmatically contained `0`.
    #[error("0 is a clause terminator, not a literal")]
    ZeroLiteral,
}

/// Failure of [`Trail::search_last_literal`](crate::sat::trail::Trail::search_last_literal).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrailError {
    /// No assignment on the trail refutes the clause.
    #[error("no assignment on the trail refutes the clause")]
    NotFound,
}

/// A broken invariant inside the search.
///
/// None of these are caused by malformed input. Each one points at a defect in
/// propagation or analysis.
#[derive(Debug, Clone, Error)]
pub enum StructuralError {
    /// Every atom is already assigned.
    #[error("trail already holds all {atom_count} atoms")]
    TrailFull {
        /// Size of the atom universe.
        atom_count: usize,
    },

    /// The literal's atom already has an assignment on the trail.
    #[error("atom of {literal} is already on the trail")]
    AtomRepeated {
        /// The literal that was to be pushed.
        literal: Literal,
    },

    /// A unit or decision clause offered no live literal to assign.
    #[error("{clause} has no live literal to assign")]
    NoLiveLiteral {
        /// Rendering of the clause.
        clause: String,
    },

    /// Resolution reached a decision literal before a UIP was found.
    #[error("{literal} needs resolution but has no reason")]
    MissingReason {
        /// The decision literal.
        literal: Literal,
    },

    /// A clause that should be falsified has no refuting assignment.
    #[error("nothing on the trail refutes {clause}")]
    NoRefutingLiteral {
        /// Rendering of the clause.
        clause: String,
        /// Trail failure.
        #[source]
        source: TrailError,
    },
}

/// A failed solve, naming the step where the search broke.
#[derive(Debug, Clone, Error)]
pub enum SolverError {
    /// Failure while asserting a unit literal.
    #[error("unit propagation failed")]
    UnitPropagation(#[source] StructuralError),

    /// Failure while asserting a decision.
    #[error("decision failed")]
    Decide(#[source] StructuralError),

    /// Failure while analysing a conflict or backjumping.
    #[error("conflict resolution failed")]
    ConflictResolution(#[source] StructuralError),
}

/// Renders an error and every cause beneath it, separated by `: `.
#[must_use]
pub fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut cause = error.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}
