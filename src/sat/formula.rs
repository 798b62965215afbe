#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause collection the engine works against.
//!
//! A formula owns every clause, loaded and learnt, and hands out [`ClauseKey`]s
//! so trail entries can name their reason without borrowing. It broadcasts each
//! assignment to all clauses and answers which clause the engine should act on
//! next.
//!
//! [`ScanFormula`] answers by scanning every clause. [`PriorityFormula`] keeps an
//! ordered index of `(status, key)` pairs and updates it as statuses change. Both
//! pick the lowest status and, among equals, the lowest key, so they drive the
//! engine through identical searches.

use crate::sat::clause::{Clause, ClauseStatus};
use crate::sat::literal::Literal;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Stable handle to a clause inside a formula.
///
/// Keys are positions in insertion order and remain valid for the life of the
/// formula, since clauses are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ClauseKey(pub usize);

impl ClauseKey {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Operations the engine needs from a clause collection.
pub trait Formula: Debug {
    type Clause: Clause;

    /// Builds a formula over loaded (not learnt) clauses.
    fn from_clauses(clauses: Vec<Self::Clause>) -> Self;

    /// The clause behind `key`.
    ///
    /// # Panics
    ///
    /// If `key` was not handed out by this formula.
    fn clause(&self, key: ClauseKey) -> &Self::Clause;

    /// The clause to act on next: the first one with the lowest
    /// [`ClauseStatus`]. `None` when the formula holds no clause at all.
    fn next_clause(&self) -> Option<ClauseKey>;

    /// Broadcasts `literal` becoming true.
    fn assign(&mut self, literal: Literal);

    /// Broadcasts the retraction of `literal`.
    fn unassign(&mut self, literal: Literal);

    /// Adds a learnt clause, already reflecting the current trail, and returns its key.
    fn learn(&mut self, clause: Self::Clause) -> ClauseKey;

    /// Resets every clause to its original view. Learnt clauses are kept.
    fn restart(&mut self);

    fn clauses(&self) -> &[Self::Clause];

    fn len(&self) -> usize {
        self.clauses().len()
    }

    fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }

    fn learnt_count(&self) -> usize {
        self.clauses().iter().filter(|c| c.is_learnt()).count()
    }

    /// Status of the clause [`next_clause`](Self::next_clause) would return, or
    /// [`ClauseStatus::Solved`] for a formula with no clauses.
    fn status(&self) -> ClauseStatus {
        self.next_clause()
            .map_or(ClauseStatus::Solved, |key| self.clause(key).status())
    }
}

/// Formula that scans all clauses for the next one to act on.
#[derive(Debug, Clone, Default)]
pub struct ScanFormula<C: Clause> {
    clauses: Vec<C>,
}

impl<C: Clause> Formula for ScanFormula<C> {
    type Clause = C;

    fn from_clauses(clauses: Vec<C>) -> Self {
        Self { clauses }
    }

    fn clause(&self, key: ClauseKey) -> &C {
        &self.clauses[key.0]
    }

    fn next_clause(&self) -> Option<ClauseKey> {
        // `min_by_key` keeps the first of equal minima.
        self.clauses
            .iter()
            .enumerate()
            .min_by_key(|(_, clause)| clause.status())
            .map(|(idx, _)| ClauseKey(idx))
    }

    fn assign(&mut self, literal: Literal) {
        self.clauses.iter_mut().for_each(|c| c.apply(literal));
    }

    fn unassign(&mut self, literal: Literal) {
        self.clauses.iter_mut().for_each(|c| c.undo(literal));
    }

    fn learn(&mut self, clause: C) -> ClauseKey {
        self.clauses.push(clause);
        ClauseKey(self.clauses.len() - 1)
    }

    fn restart(&mut self) {
        self.clauses.iter_mut().for_each(Clause::reset);
    }

    fn clauses(&self) -> &[C] {
        &self.clauses
    }
}

/// Formula that keeps its clauses ordered by status.
///
/// Every assignment touches every clause anyway, so the index is refreshed in
/// the same pass. Lookup of the next clause is then the first entry of the set.
#[derive(Debug, Clone, Default)]
pub struct PriorityFormula<C: Clause> {
    clauses: Vec<C>,
    statuses: Vec<ClauseStatus>,
    queue: BTreeSet<(ClauseStatus, usize)>,
}

impl<C: Clause> PriorityFormula<C> {
    fn refresh(&mut self, idx: usize) {
        let status = self.clauses[idx].status();
        let previous = self.statuses[idx];
        if status != previous {
            self.queue.remove(&(previous, idx));
            self.queue.insert((status, idx));
            self.statuses[idx] = status;
        }
    }

    fn broadcast(&mut self, literal: Literal, undo: bool) {
        for idx in 0..self.clauses.len() {
            if undo {
                self.clauses[idx].undo(literal);
            } else {
                self.clauses[idx].apply(literal);
            }
            self.refresh(idx);
        }
    }

    /// Number of clauses currently in each status, lowest status first.
    #[must_use]
    pub fn census(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for status in &self.statuses {
            counts[*status as usize] += 1;
        }
        counts
    }
}

impl<C: Clause> Formula for PriorityFormula<C> {
    type Clause = C;

    fn from_clauses(clauses: Vec<C>) -> Self {
        let statuses: Vec<_> = clauses.iter().map(Clause::status).collect();
        let queue = statuses
            .iter()
            .enumerate()
            .map(|(idx, status)| (*status, idx))
            .collect();
        Self {
            clauses,
            statuses,
            queue,
        }
    }

    fn clause(&self, key: ClauseKey) -> &C {
        &self.clauses[key.0]
    }

    fn next_clause(&self) -> Option<ClauseKey> {
        self.queue.first().map(|(_, idx)| ClauseKey(*idx))
    }

    fn assign(&mut self, literal: Literal) {
        self.broadcast(literal, false);
    }

    fn unassign(&mut self, literal: Literal) {
        self.broadcast(literal, true);
    }

    fn learn(&mut self, clause: C) -> ClauseKey {
        let idx = self.clauses.len();
        let status = clause.status();
        self.clauses.push(clause);
        self.statuses.push(status);
        self.queue.insert((status, idx));
        ClauseKey(idx)
    }

    fn restart(&mut self) {
        for idx in 0..self.clauses.len() {
            self.clauses[idx].reset();
            self.refresh(idx);
        }
    }

    fn clauses(&self) -> &[C] {
        &self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::{MapClause, VecClause};

    fn clauses<C: Clause>(raw: &[&[i32]]) -> Vec<C> {
        raw.iter()
            .map(|c| C::new(c.iter().copied().map(Literal::from), false))
            .collect()
    }

    fn sample<F: Formula>() -> F {
        F::from_clauses(clauses(&[&[1, 2], &[-1, 3], &[2, 3, 4]]))
    }

    fn priority_order<F: Formula>() {
        let mut formula: F = sample();
        assert_eq!(formula.next_clause(), Some(ClauseKey(0)));
        assert_eq!(formula.status(), ClauseStatus::Decision);

        formula.assign(Literal::from(1));
        assert_eq!(formula.next_clause(), Some(ClauseKey(1)));
        assert_eq!(formula.status(), ClauseStatus::Unit);

        formula.assign(Literal::from(-3));
        assert_eq!(formula.next_clause(), Some(ClauseKey(1)));
        assert_eq!(formula.status(), ClauseStatus::Empty);

        formula.unassign(Literal::from(-3));
        formula.assign(Literal::from(3));
        assert_eq!(formula.status(), ClauseStatus::Solved);
    }

    #[test]
    fn test_scan_priority_order() {
        priority_order::<ScanFormula<VecClause>>();
        priority_order::<ScanFormula<MapClause>>();
    }

    #[test]
    fn test_priority_formula_order() {
        priority_order::<PriorityFormula<MapClause>>();
        priority_order::<PriorityFormula<VecClause>>();
    }

    fn learnt_is_visible<F: Formula>() {
        let mut formula: F = sample();
        formula.assign(Literal::from(2));
        let mut learnt = <F::Clause as Clause>::new([Literal::from(-2), Literal::from(4)], true);
        learnt.apply(Literal::from(2));
        let key = formula.learn(learnt);
        assert_eq!(key, ClauseKey(3));
        assert_eq!(formula.next_clause(), Some(key));
        assert_eq!(formula.learnt_count(), 1);
        assert_eq!(formula.len(), 4);
    }

    #[test]
    fn test_learnt_clause_is_visible() {
        learnt_is_visible::<ScanFormula<VecClause>>();
        learnt_is_visible::<PriorityFormula<MapClause>>();
    }

    fn restart_replays<F: Formula>() {
        let sequence = [-1, -2, 4];
        let mut formula: F = sample();
        sequence
            .iter()
            .for_each(|l| formula.assign(Literal::from(*l)));
        let before: Vec<_> = formula.clauses().iter().map(Clause::live).collect();

        let mut learnt = <F::Clause as Clause>::new([Literal::from(1), Literal::from(5)], true);
        sequence.iter().for_each(|l| learnt.apply(Literal::from(*l)));
        formula.learn(learnt);

        formula.restart();
        assert!(formula.clauses().iter().all(|c| c.live().as_slice() == c.original()));
        sequence
            .iter()
            .for_each(|l| formula.assign(Literal::from(*l)));
        let after: Vec<_> = formula.clauses().iter().map(Clause::live).collect();

        assert_eq!(&after[..before.len()], before.as_slice());
        assert_eq!(formula.learnt_count(), 1);
    }

    #[test]
    fn test_restart_replays_identically() {
        restart_replays::<ScanFormula<VecClause>>();
        restart_replays::<PriorityFormula<MapClause>>();
    }

    #[test]
    fn test_empty_formula_has_no_next_clause() {
        let formula = ScanFormula::<VecClause>::from_clauses(Vec::new());
        assert_eq!(formula.next_clause(), None);
        assert_eq!(formula.status(), ClauseStatus::Solved);
        assert!(formula.is_empty());
    }

    #[test]
    fn test_census_tracks_statuses() {
        let mut formula: PriorityFormula<MapClause> = sample();
        formula.assign(Literal::from(-2));
        assert_eq!(formula.census(), [0, 1, 2, 0]);
        formula.unassign(Literal::from(-2));
        assert_eq!(formula.census(), [0, 0, 3, 0]);
    }
}
