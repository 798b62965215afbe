#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clauses as mutable views over a fixed disjunction.
//!
//! A clause keeps the literals it was built from (`original`) and tracks which of
//! them are still live, i.e. not falsified by the current trail. From that it
//! derives a [`ClauseStatus`] on demand. Nothing is cached between assignments,
//! so the status is always the one the current trail implies.
//!
//! Two representations implement [`Clause`]:
//! - [`VecClause`] keeps the live literals in a small vector and re-filters the
//!   original on undo.
//! - [`MapClause`] keeps a per-literal state in a hash map.
//!
//! Both keep live literals in original order, so the first live literal (the one
//! a decision picks) is the same for either.

use crate::sat::literal::{Atom, Literal};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::{self, Debug, Display, Formatter};

/// Literals of one clause. Most clauses are short, so up to eight stay inline.
pub type Disjunction = SmallVec<[Literal; 8]>;

/// What the current trail makes of a clause.
///
/// The variant order is the priority order in which a formula hands clauses to
/// the engine: conflicts first, then units, then decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClauseStatus {
    /// No live literal and nothing satisfied: a conflict.
    Empty,
    /// Exactly one live literal and nothing satisfied.
    Unit,
    /// Several live literals and nothing satisfied.
    Decision,
    /// Some literal is satisfied.
    Solved,
}

/// Interface shared by the clause representations.
///
/// `apply` and `undo` must be called in stack order: `undo(l)` reverses the most
/// recent `apply(l)` that has not been undone yet.
pub trait Clause: Clone + Debug + Display {
    /// Builds a clause over `literals`. Repeated literals are collapsed.
    fn new<I: IntoIterator<Item = Literal>>(literals: I, learnt: bool) -> Self;

    /// Status under the assignments applied so far.
    fn status(&self) -> ClauseStatus;

    /// Records that `literal` became true.
    fn apply(&mut self, literal: Literal);

    /// Reverses the most recent `apply(literal)`.
    fn undo(&mut self, literal: Literal);

    /// Forgets every assignment.
    fn reset(&mut self);

    /// `true` if `literal` is in the live view.
    fn contains(&self, literal: Literal) -> bool;

    /// The literals the clause was built from.
    fn original(&self) -> &[Literal];

    /// Live literals, in original order.
    fn live(&self) -> Disjunction;

    /// First live literal in original order.
    fn first_live(&self) -> Option<Literal>;

    fn is_learnt(&self) -> bool;

    fn is_solved(&self) -> bool {
        self.status() == ClauseStatus::Solved
    }

    /// `true` if some atom occurs with both polarities.
    fn is_tautology(&self) -> bool {
        is_tautology(self.original())
    }
}

/// Resolves two disjunctions on `pivot`.
///
/// The resolvent holds every literal of both inputs except the two polarities of
/// `pivot`, with duplicates collapsed. Literals of `first` come first.
#[must_use]
pub fn resolve(first: &[Literal], second: &[Literal], pivot: Atom) -> Disjunction {
    first
        .iter()
        .chain(second)
        .filter(|lit| lit.atom() != pivot)
        .copied()
        .unique()
        .collect()
}

/// `true` if `literals` contain some atom with both polarities.
#[must_use]
pub fn is_tautology(literals: &[Literal]) -> bool {
    literals
        .iter()
        .any(|lit| literals.contains(&lit.negated()))
}

fn render(literals: impl Iterator<Item = Literal>, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "({})", literals.map(|lit| lit.to_string()).join(" "))
}

/// Array-backed clause: the live view is a vector of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VecClause {
    original: Disjunction,
    live: Disjunction,
    solved: usize,
    learnt: bool,
}

impl Clause for VecClause {
    fn new<I: IntoIterator<Item = Literal>>(literals: I, learnt: bool) -> Self {
        let original: Disjunction = literals.into_iter().unique().collect();
        Self {
            live: original.clone(),
            original,
            solved: 0,
            learnt,
        }
    }

    fn status(&self) -> ClauseStatus {
        if self.solved > 0 {
            return ClauseStatus::Solved;
        }
        match self.live.len() {
            0 => ClauseStatus::Empty,
            1 => ClauseStatus::Unit,
            _ => ClauseStatus::Decision,
        }
    }

    fn apply(&mut self, literal: Literal) {
        if self.live.contains(&literal) {
            self.solved += 1;
        } else {
            let refuted = literal.negated();
            self.live.retain(|lit| *lit != refuted);
        }
    }

    fn undo(&mut self, literal: Literal) {
        if self.original.contains(&literal) {
            debug_assert!(self.solved > 0, "undo of {literal} without a matching apply");
            self.solved = self.solved.saturating_sub(1);
            return;
        }

        let restored = literal.negated();
        if self.original.contains(&restored) {
            let live = &self.live;
            self.live = self
                .original
                .iter()
                .filter(|lit| **lit == restored || live.contains(lit))
                .copied()
                .collect();
        }
    }

    fn reset(&mut self) {
        self.live.clone_from(&self.original);
        self.solved = 0;
    }

    fn contains(&self, literal: Literal) -> bool {
        self.live.contains(&literal)
    }

    fn original(&self) -> &[Literal] {
        &self.original
    }

    fn live(&self) -> Disjunction {
        self.live.clone()
    }

    fn first_live(&self) -> Option<Literal> {
        self.live.first().copied()
    }

    fn is_learnt(&self) -> bool {
        self.learnt
    }
}

impl Display for VecClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        render(self.original.iter().copied(), f)
    }
}

/// Where one literal of a [`MapClause`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiteralState {
    #[default]
    Unassigned,
    Satisfied,
    Refuted,
}

/// Map-backed clause: each literal carries its own [`LiteralState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapClause {
    original: Disjunction,
    states: FxHashMap<Literal, LiteralState>,
    solved: usize,
    learnt: bool,
}

impl MapClause {
    #[must_use]
    pub fn state(&self, literal: Literal) -> Option<LiteralState> {
        self.states.get(&literal).copied()
    }
}

impl Clause for MapClause {
    fn new<I: IntoIterator<Item = Literal>>(literals: I, learnt: bool) -> Self {
        let original: Disjunction = literals.into_iter().unique().collect();
        let states = original
            .iter()
            .map(|lit| (*lit, LiteralState::Unassigned))
            .collect();
        Self {
            original,
            states,
            solved: 0,
            learnt,
        }
    }

    fn status(&self) -> ClauseStatus {
        if self.solved > 0 {
            return ClauseStatus::Solved;
        }
        let unassigned = self
            .states
            .values()
            .filter(|state| **state == LiteralState::Unassigned)
            .count();
        match unassigned {
            0 => ClauseStatus::Empty,
            1 => ClauseStatus::Unit,
            _ => ClauseStatus::Decision,
        }
    }

    fn apply(&mut self, literal: Literal) {
        if let Some(state) = self.states.get_mut(&literal) {
            *state = LiteralState::Satisfied;
            self.solved += 1;
        }
        if let Some(state) = self.states.get_mut(&literal.negated()) {
            *state = LiteralState::Refuted;
        }
    }

    fn undo(&mut self, literal: Literal) {
        if let Some(state) = self.states.get_mut(&literal) {
            if *state == LiteralState::Satisfied {
                *state = LiteralState::Unassigned;
                self.solved = self.solved.saturating_sub(1);
            }
        }
        if let Some(state) = self.states.get_mut(&literal.negated()) {
            if *state == LiteralState::Refuted {
                *state = LiteralState::Unassigned;
            }
        }
    }

    fn reset(&mut self) {
        self.states
            .values_mut()
            .for_each(|state| *state = LiteralState::Unassigned);
        self.solved = 0;
    }

    fn contains(&self, literal: Literal) -> bool {
        self.states
            .get(&literal)
            .is_some_and(|state| *state != LiteralState::Refuted)
    }

    fn original(&self) -> &[Literal] {
        &self.original
    }

    fn live(&self) -> Disjunction {
        self.original
            .iter()
            .filter(|lit| self.contains(**lit))
            .copied()
            .collect()
    }

    fn first_live(&self) -> Option<Literal> {
        self.original
            .iter()
            .find(|lit| self.contains(**lit))
            .copied()
    }

    fn is_learnt(&self) -> bool {
        self.learnt
    }
}

impl Display for MapClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        render(self.original.iter().copied(), f)
    }
}
