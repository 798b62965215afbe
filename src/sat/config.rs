//! Construction-time solver configuration.

use crate::sat::literal_selection::LiteralSelectionType;
use clap::ValueEnum;
use std::fmt::Display;

/// How clauses and the formula holding them are represented.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum RepresentationType {
    /// Vector-backed clauses, scanned for the next clause on every step
    #[default]
    Array,
    /// Map-backed clauses in a formula ordered by clause status
    Map,
}

impl Display for RepresentationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array => write!(f, "Array clauses, scanning formula"),
            Self::Map => write!(f, "Map clauses, priority formula"),
        }
    }
}

/// Everything a solver is built from besides the problem itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SolverOptions {
    pub representation: RepresentationType,
    pub selection: LiteralSelectionType,
    /// Seed for randomised literal selection.
    pub seed: u64,
}

impl SolverOptions {
    #[must_use]
    pub const fn new(representation: RepresentationType, selection: LiteralSelectionType) -> Self {
        Self {
            representation,
            selection,
            seed: 0,
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Display for SolverOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}; {}", self.representation, self.selection)?;
        if self.selection == LiteralSelectionType::Random {
            write!(f, " (seed {})", self.seed)?;
        }
        Ok(())
    }
}
