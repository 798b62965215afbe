#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The assignment trail.
//!
//! Every assignment the engine makes is appended here in order, stamped with
//! the decision level it was made at and, for propagated literals, the key of
//! the clause that forced it.

use crate::sat::clause::Clause;
use crate::sat::error::TrailError;
use crate::sat::formula::ClauseKey;
use crate::sat::literal::Literal;
use std::ops::Index;

/// One assignment on the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelElement {
    pub literal: Literal,
    /// `true` for a free choice, `false` for a propagated literal.
    pub decision: bool,
    /// Decision level, stamped on push.
    pub level: usize,
    /// Clause that forced the literal. `None` for decisions.
    pub reason: Option<ClauseKey>,
}

impl ModelElement {
    #[must_use]
    pub const fn decision(literal: Literal) -> Self {
        Self {
            literal,
            decision: true,
            level: 0,
            reason: None,
        }
    }

    #[must_use]
    pub const fn implied(literal: Literal, reason: ClauseKey) -> Self {
        Self {
            literal,
            decision: false,
            level: 0,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    elements: Vec<ModelElement>,
    decision_level: usize,
}

impl Index<usize> for Trail {
    type Output = ModelElement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl Trail {
    #[must_use]
    pub fn with_capacity(atom_count: usize) -> Self {
        Self {
            elements: Vec::with_capacity(atom_count),
            decision_level: 0,
        }
    }

    /// Appends `element` and returns its position.
    ///
    /// A decision opens a new level before it is stamped.
    pub fn push_back(&mut self, mut element: ModelElement) -> usize {
        if element.decision {
            self.decision_level += 1;
        }
        element.level = self.decision_level;
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// The most recent element whose negation is live in `clause`, i.e. the
    /// latest assignment that refutes one of its literals.
    ///
    /// # Errors
    ///
    /// [`TrailError::NotFound`] if no element refutes the clause.
    pub fn search_last_literal<C: Clause>(&self, clause: &C) -> Result<&ModelElement, TrailError> {
        self.elements
            .iter()
            .rev()
            .find(|element| clause.contains(element.literal.negated()))
            .ok_or(TrailError::NotFound)
    }

    /// Detaches elements from the tail while their level exceeds `level`.
    ///
    /// The iterator is lazy: only elements actually pulled are removed.
    pub const fn pop_till_level(&mut self, level: usize) -> PopTillLevel<'_> {
        PopTillLevel { trail: self, level }
    }

    #[must_use]
    pub const fn decision_level(&self) -> usize {
        self.decision_level
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ModelElement> {
        self.elements.last()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ModelElement> {
        self.elements.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelElement> {
        self.elements.iter()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.decision_level = 0;
    }
}

/// Iterator returned by [`Trail::pop_till_level`].
#[derive(Debug)]
pub struct PopTillLevel<'a> {
    trail: &'a mut Trail,
    level: usize,
}

impl Iterator for PopTillLevel<'_> {
    type Item = ModelElement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.trail.elements.last()?.level <= self.level {
            return None;
        }
        let element = self.trail.elements.pop()?;
        if element.decision {
            self.trail.decision_level -= 1;
        }
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::VecClause;

    fn numbered_trail() -> Trail {
        let mut trail = Trail::default();
        for i in 1..20 {
            let literal = Literal::from(i);
            let element = if i % 5 == 3 {
                ModelElement::decision(literal)
            } else {
                ModelElement::implied(literal, ClauseKey(0))
            };
            trail.push_back(element);
        }
        trail
    }

    fn clause(values: &[i32]) -> VecClause {
        VecClause::new(values.iter().copied().map(Literal::from), false)
    }

    #[test]
    fn test_levels_are_non_decreasing() {
        let trail = numbered_trail();
        assert!(trail.iter().zip(trail.iter().skip(1)).all(|(a, b)| a.level <= b.level));
        assert_eq!(trail[0].level, 0);
        assert_eq!(trail[2].level, 1);
        assert_eq!(trail.decision_level(), 4);
    }

    #[test]
    fn test_search_last_literal() {
        let trail = numbered_trail();
        let found = trail.search_last_literal(&clause(&[-2, -4, 5]));
        assert_eq!(found.map(|e| e.literal), Ok(Literal::from(4)));

        let found = trail.search_last_literal(&clause(&[-1, 30, 8]));
        assert_eq!(found.map(|e| e.literal), Ok(Literal::from(1)));

        let found = trail.search_last_literal(&clause(&[1, 2, 3]));
        assert_eq!(found, Err(TrailError::NotFound));
    }

    #[test]
    fn test_pop_till_level() {
        let mut trail = numbered_trail();
        let popped: Vec<_> = trail.pop_till_level(2).map(|e| e.literal.to_i32()).collect();
        assert_eq!(popped, vec![19, 18, 17, 16, 15, 14, 13]);
        assert_eq!(trail.last().map(|e| e.literal), Some(Literal::from(12)));
        assert_eq!(trail.decision_level(), 2);
    }

    #[test]
    fn test_pop_till_level_zero_keeps_root_level() {
        let mut trail = numbered_trail();
        assert_eq!(trail.pop_till_level(0).count(), 17);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.decision_level(), 0);
        assert_eq!(trail.pop_till_level(0).next(), None);

        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.pop_till_level(0).next(), None);
    }
}
