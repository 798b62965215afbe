#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Choice of the decision literal inside a clause that needs a decision.
//!
//! The engine always decides on the clause the formula ranks first. These
//! policies only pick which of its live literals to make true.

use crate::sat::clause::Clause;
use crate::sat::literal::Literal;
use clap::ValueEnum;
use fastrand::Rng;
use std::fmt::Display;

pub trait LiteralSelection {
    /// A live literal of `clause` to decide on, or `None` if nothing is live.
    fn pick<C: Clause>(&mut self, clause: &C) -> Option<Literal>;
}

/// Takes the first live literal in clause order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirstLive;

impl LiteralSelection for FirstLive {
    fn pick<C: Clause>(&mut self, clause: &C) -> Option<Literal> {
        clause.first_live()
    }
}

/// Draws uniformly among live literals from a seeded generator.
///
/// The same seed yields the same sequence of picks, so solves stay reproducible.
#[derive(Debug, Clone)]
pub struct RandomLive {
    rng: Rng,
}

impl RandomLive {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rng::with_seed(seed),
        }
    }
}

impl LiteralSelection for RandomLive {
    fn pick<C: Clause>(&mut self, clause: &C) -> Option<Literal> {
        let live = clause.live();
        if live.is_empty() {
            return None;
        }
        live.get(self.rng.usize(..live.len())).copied()
    }
}

/// Selection policies the engine can be built with.
#[derive(Debug, Clone)]
pub enum LiteralSelectionImpls {
    FirstLive(FirstLive),
    RandomLive(RandomLive),
}

impl Default for LiteralSelectionImpls {
    fn default() -> Self {
        Self::FirstLive(FirstLive)
    }
}

impl LiteralSelection for LiteralSelectionImpls {
    fn pick<C: Clause>(&mut self, clause: &C) -> Option<Literal> {
        match self {
            Self::FirstLive(s) => s.pick(clause),
            Self::RandomLive(s) => s.pick(clause),
        }
    }
}

/// Command-line name of a selection policy.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash, Default, ValueEnum)]
pub enum LiteralSelectionType {
    /// First live literal of the clause
    #[default]
    First,
    /// Seeded uniform choice among live literals
    Random,
}

impl Display for LiteralSelectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "First live literal"),
            Self::Random => write!(f, "Random live literal"),
        }
    }
}

impl LiteralSelectionType {
    /// Builds the policy. `seed` only matters for [`LiteralSelectionType::Random`].
    #[must_use]
    pub fn to_impl(self, seed: u64) -> LiteralSelectionImpls {
        match self {
            Self::First => LiteralSelectionImpls::FirstLive(FirstLive),
            Self::Random => LiteralSelectionImpls::RandomLive(RandomLive::new(seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::{MapClause, VecClause};

    fn clause<C: Clause>(values: &[i32]) -> C {
        C::new(values.iter().copied().map(Literal::from), false)
    }

    #[test]
    fn test_first_live_follows_clause_order() {
        let mut c: VecClause = clause(&[4, -2, 9]);
        c.apply(Literal::from(-4));
        assert_eq!(FirstLive.pick(&c), Some(Literal::from(-2)));
    }

    #[test]
    fn test_random_is_live_and_reproducible() {
        let mut c: MapClause = clause(&[1, 2, 3, 4, 5]);
        c.apply(Literal::from(-3));

        let mut a = LiteralSelectionType::Random.to_impl(7);
        let mut b = LiteralSelectionType::Random.to_impl(7);
        for _ in 0..32 {
            let picked = a.pick(&c);
            assert_eq!(picked, b.pick(&c));
            assert!(picked.is_some_and(|l| c.contains(l)));
        }
    }

    #[test]
    fn test_nothing_live_picks_nothing() {
        let mut c: VecClause = clause(&[1]);
        c.apply(Literal::from(-1));
        assert_eq!(FirstLive.pick(&c), None);
        assert_eq!(RandomLive::new(0).pick(&c), None);
    }
}
