#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Resolution-based conflict analysis.
//!
//! Starting from a falsified clause, the literal most recently refuted by the
//! trail is resolved away using the reason clause of its trail element, until
//! that literal is a unique implication point: the only literal of the clause
//! assigned at its decision level. The resulting clause is learnt, and its UIP
//! fixes both the literal to assert and the level to jump back to.

use crate::sat::assignment::Check;
use crate::sat::clause::{Clause, resolve};
use crate::sat::error::StructuralError;
use crate::sat::formula::{ClauseKey, Formula};
use crate::sat::literal::Literal;
use crate::sat::logging::targets;
use crate::sat::trail::{ModelElement, Trail};
use log::trace;

/// Outcome of analysing one conflict.
#[derive(Debug, Clone)]
pub struct Analysis<C: Clause> {
    /// The learnt clause, not yet reflecting any assignment.
    pub clause: C,
    /// The UIP literal on the trail. Its negation is asserted after the jump.
    pub uip: Literal,
    /// Decision level to jump back to.
    pub level: usize,
    /// Number of resolution steps taken.
    pub resolutions: usize,
}

impl<C: Clause> Analysis<C> {
    /// The literal the learnt clause forces once the trail is cut back.
    #[must_use]
    pub fn asserting(&self) -> Literal {
        self.uip.negated()
    }
}

/// Decision level at which `literal`'s atom was assigned, if it is assigned.
fn level_of(literal: Literal, trail: &Trail, check: &Check) -> Option<usize> {
    check
        .position(literal.atom())
        .and_then(|position| trail.get(position))
        .map(|element| element.level)
}

/// `true` if no other literal of `clause`, negated, was assigned at the same
/// decision level as `literal`. Unassigned literals are ignored.
#[must_use]
pub fn is_uip<C: Clause>(literal: Literal, clause: &C, trail: &Trail, check: &Check) -> bool {
    let Some(level) = level_of(literal, trail, check) else {
        return false;
    };
    clause
        .original()
        .iter()
        .filter(|other| other.atom() != literal.atom())
        .all(|other| level_of(*other, trail, check) != Some(level))
}

/// Highest decision level among the literals of `clause` other than `uip`, or
/// 0 when `uip` is the only one.
#[must_use]
pub fn backjump_level<C: Clause>(uip: Literal, clause: &C, trail: &Trail, check: &Check) -> usize {
    clause
        .original()
        .iter()
        .filter(|other| other.atom() != uip.atom())
        .filter_map(|other| level_of(*other, trail, check))
        .max()
        .unwrap_or(0)
}

fn last_refuted<C: Clause>(clause: &C, trail: &Trail) -> Result<ModelElement, StructuralError> {
    trail
        .search_last_literal(clause)
        .copied()
        .map_err(|source| StructuralError::NoRefutingLiteral {
            clause: clause.to_string(),
            source,
        })
}

/// Derives a learnt clause from the falsified clause `conflict`.
///
/// # Errors
///
/// - [`StructuralError::NoRefutingLiteral`] if some intermediate clause is not
///   refuted by the trail.
/// - [`StructuralError::MissingReason`] if a literal that still needs resolving
///   is a decision.
pub fn analyse_conflict<F: Formula>(
    formula: &F,
    trail: &Trail,
    check: &Check,
    conflict: ClauseKey,
) -> Result<Analysis<F::Clause>, StructuralError> {
    let original = formula.clause(conflict).original().iter().copied();
    let mut clause = <F::Clause as Clause>::new(original, true);
    let mut last = last_refuted(&clause, trail)?;
    let mut resolutions = 0;

    while !is_uip(last.literal, &clause, trail, check) {
        let reason = last.reason.ok_or(StructuralError::MissingReason {
            literal: last.literal,
        })?;
        let resolvent = resolve(
            formula.clause(reason).original(),
            clause.original(),
            last.literal.atom(),
        );
        trace!(
            target: targets::ANALYSIS,
            "resolved {clause} on {} with {}",
            last.literal.atom(),
            formula.clause(reason)
        );
        clause = <F::Clause as Clause>::new(resolvent, true);
        last = last_refuted(&clause, trail)?;
        resolutions += 1;
    }

    let level = backjump_level(last.literal, &clause, trail, check);
    Ok(Analysis {
        clause,
        uip: last.literal,
        level,
        resolutions,
    })
}
