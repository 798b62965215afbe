#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The conflict-driven clause learning engine.
//!
//! Each step asks the formula for its highest-priority clause and acts on its
//! status:
//!
//! 1.  **Empty:** a conflict. With no decision on the trail the formula is
//!     unsatisfiable. Otherwise the conflict is analysed, the trail is cut back
//!     to the backjump level, the learnt clause is added and its asserting
//!     literal is pushed.
//! 2.  **Unit:** the sole live literal is pushed with the clause as its reason.
//! 3.  **Decision:** a live literal chosen by the selection policy is pushed as a
//!     new decision.
//! 4.  **Solved:** every clause is satisfied and the trail is a model.
//!
//! Because the formula hands out conflicts before units and units before
//! decisions, propagation is always exhausted before the search branches.
//!
//! The engine owns the trail, the atom index into it and the formula. Trail
//! entries refer to their reasons by [`ClauseKey`], so nothing else holds on to
//! a clause.

use crate::sat::assignment::Check;
use crate::sat::clause::{Clause, ClauseStatus};
use crate::sat::cnf::Cnf;
use crate::sat::config::SolverOptions;
use crate::sat::conflict_analysis::analyse_conflict;
use crate::sat::error::{SolverError, StructuralError, report};
use crate::sat::formula::{ClauseKey, Formula};
use crate::sat::literal::Literal;
use crate::sat::literal_selection::{LiteralSelection, LiteralSelectionImpls};
use crate::sat::logging::targets;
use crate::sat::solver::{Solution, SolutionStats, Solutions, Solver};
use crate::sat::trail::{ModelElement, Trail};
use log::{debug, error, trace, warn};

/// A CDCL solver over the formula representation `F`.
#[derive(Debug, Clone)]
pub struct Cdcl<F: Formula> {
    /// Assignments in the order they were made.
    model: Trail,
    /// Atom to trail position. Updated in lockstep with `model`.
    check: Check,
    formula: F,
    atom_count: usize,
    /// Decisions currently on the trail.
    decision_count: usize,
    selection: LiteralSelectionImpls,
    stats: SolutionStats,
    solution: Solution,
    failure: Option<SolverError>,
}

impl<F: Formula> Cdcl<F> {
    /// The trail as it stands.
    #[must_use]
    pub const fn trail(&self) -> &Trail {
        &self.model
    }

    #[must_use]
    pub const fn formula(&self) -> &F {
        &self.formula
    }

    #[must_use]
    pub const fn decision_count(&self) -> usize {
        self.decision_count
    }

    #[must_use]
    pub const fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Pushes `element` onto the trail and broadcasts its literal.
    fn assign(&mut self, element: ModelElement) -> Result<(), StructuralError> {
        let literal = element.literal;
        if self.model.len() >= self.atom_count {
            return Err(StructuralError::TrailFull {
                atom_count: self.atom_count,
            });
        }
        if self.check.is_assigned(literal.atom()) {
            return Err(StructuralError::AtomRepeated { literal });
        }

        if element.decision {
            self.decision_count += 1;
        }
        let position = self.model.push_back(element);
        self.check.set(literal, position);
        self.formula.assign(literal);
        Ok(())
    }

    /// Learns from the falsified clause `conflict` and jumps back.
    fn resolve_conflict(&mut self, conflict: ClauseKey) -> Result<(), StructuralError> {
        let analysis = analyse_conflict(&self.formula, &self.model, &self.check, conflict)?;
        let asserting = analysis.asserting();
        self.stats.resolutions += analysis.resolutions;

        debug!(
            target: targets::BACKJUMP,
            "learnt {} at level {}, jumping to {}",
            analysis.clause,
            self.model.decision_level(),
            analysis.level
        );

        for element in self.model.pop_till_level(analysis.level) {
            self.check.unset(element.literal);
            self.formula.unassign(element.literal);
            if element.decision {
                self.decision_count -= 1;
            }
        }

        // Learnt after the jump, so its view only has to catch up with what survived.
        let mut clause = analysis.clause;
        for element in self.model.iter() {
            clause.apply(element.literal);
        }
        let learnt = self.formula.learn(clause);
        self.stats.learnt_clauses += 1;

        trace!(target: targets::BACKJUMP, "asserting {asserting}");
        self.assign(ModelElement::implied(asserting, learnt))
    }

    /// Runs one step. Returns the outcome once the search is over.
    fn step(&mut self) -> Result<Option<Solution>, SolverError> {
        let Some(key) = self.formula.next_clause() else {
            return Ok(Some(Solution::Satisfiable));
        };
        let clause = self.formula.clause(key);

        match clause.status() {
            ClauseStatus::Solved => return Ok(Some(Solution::Satisfiable)),
            ClauseStatus::Unit => {
                let literal = live_literal(clause.first_live(), clause)
                    .map_err(SolverError::UnitPropagation)?;
                trace!(target: targets::PROPAGATION, "{literal} from {clause}");
                self.stats.propagations += 1;
                self.assign(ModelElement::implied(literal, key))
                    .map_err(SolverError::UnitPropagation)?;
                return Ok(None);
            }
            ClauseStatus::Decision => {
                let literal = live_literal(self.selection.pick(clause), clause)
                    .map_err(SolverError::Decide)?;
                trace!(
                    target: targets::DECISION,
                    "{literal} at level {}",
                    self.model.decision_level() + 1
                );
                self.stats.decisions += 1;
                self.assign(ModelElement::decision(literal))
                    .map_err(SolverError::Decide)?;
                return Ok(None);
            }
            ClauseStatus::Empty => {}
        }

        if self.decision_count == 0 {
            return Ok(Some(Solution::Unsatisfiable));
        }
        self.stats.conflicts += 1;
        self.resolve_conflict(key)
            .map_err(SolverError::ConflictResolution)?;
        Ok(None)
    }

    fn try_solve(&mut self) -> Result<Solution, SolverError> {
        loop {
            if let Some(solution) = self.step()? {
                return Ok(solution);
            }
        }
    }

    /// Clears the trail and resets every clause. Learnt clauses stay.
    pub fn restart(&mut self) {
        self.model.clear();
        self.check.clear();
        self.formula.restart();
        self.decision_count = 0;
        self.solution = Solution::Unknown;
        self.failure = None;
        self.stats.restarts += 1;
        debug!(
            target: targets::FORMULA,
            "restarted with {} learnt clauses",
            self.formula.learnt_count()
        );
    }
}

/// The literal a unit or decision clause offered, or the structural error for
/// a clause whose status promised one.
fn live_literal<C: Clause>(
    literal: Option<Literal>,
    clause: &C,
) -> Result<Literal, StructuralError> {
    literal.ok_or_else(|| StructuralError::NoLiveLiteral {
        clause: clause.to_string(),
    })
}

impl<F: Formula> Solver for Cdcl<F> {
    /// Builds the formula from `cnf`. Tautologies are satisfied by every
    /// assignment and are left out.
    fn new(cnf: &Cnf, options: &SolverOptions) -> Self {
        let clauses: Vec<F::Clause> = cnf
            .iter()
            .filter_map(|literals| {
                let clause = <F::Clause as Clause>::new(literals.iter().copied(), false);
                if clause.is_tautology() {
                    debug!(target: targets::FORMULA, "dropping tautology {clause}");
                    None
                } else {
                    Some(clause)
                }
            })
            .collect();
        let atom_count = cnf.atom_count.max(cnf.max_atom());
        if atom_count > cnf.atom_count {
            warn!(
                target: targets::FORMULA,
                "clauses name atom {atom_count} beyond the declared {}",
                cnf.atom_count
            );
        }
        debug!(
            target: targets::FORMULA,
            "{} clauses over {atom_count} atoms",
            clauses.len()
        );

        Self {
            model: Trail::with_capacity(atom_count),
            check: Check::new(atom_count),
            formula: F::from_clauses(clauses),
            atom_count,
            decision_count: 0,
            selection: options.selection.to_impl(options.seed),
            stats: SolutionStats::default(),
            solution: Solution::Unknown,
            failure: None,
        }
    }

    fn solve(&mut self) -> Solution {
        if !self.model.is_empty() || self.solution != Solution::Unknown || self.failure.is_some() {
            self.restart();
        }

        self.solution = match self.try_solve() {
            Ok(solution) => solution,
            Err(failure) => {
                error!("{}", report(&failure));
                self.failure = Some(failure);
                Solution::Unknown
            }
        };
        debug!(
            "{} after {} decisions and {} conflicts",
            self.solution, self.stats.decisions, self.stats.conflicts
        );
        self.solution
    }

    fn solutions(&self) -> Option<Solutions> {
        self.solution
            .is_sat()
            .then(|| Solutions::new(self.model.iter().map(|e| e.literal)))
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }

    fn failure(&self) -> Option<&SolverError> {
        self.failure.as_ref()
    }
}
