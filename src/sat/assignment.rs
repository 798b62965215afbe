//! Atom-indexed lookup into the trail.
//!
//! The trail is a plain vector, so finding the element that assigned an atom
//! would otherwise mean a linear scan. [`Check`] keeps the position of each
//! assigned atom's element and must be updated on every push and pop.

use crate::sat::literal::{Atom, Literal};
use core::ops::Index;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Check(Vec<Option<usize>>);

impl Index<Atom> for Check {
    type Output = Option<usize>;

    fn index(&self, atom: Atom) -> &Self::Output {
        &self.0[atom as usize]
    }
}

impl Check {
    /// An index for atoms `1..=atom_count`, all unassigned.
    #[must_use]
    pub fn new(atom_count: usize) -> Self {
        Self(vec![None; atom_count + 1])
    }

    /// Trail position of the element assigning `atom`, if any.
    #[must_use]
    pub fn position(&self, atom: Atom) -> Option<usize> {
        self.0.get(atom as usize).copied().flatten()
    }

    #[must_use]
    pub fn is_assigned(&self, atom: Atom) -> bool {
        self.position(atom).is_some()
    }

    /// Records that `literal`'s atom sits at `position` on the trail.
    pub fn set(&mut self, literal: Literal, position: usize) {
        self.0[literal.index()] = Some(position);
    }

    pub fn unset(&mut self, literal: Literal) {
        self.0[literal.index()] = None;
    }

    pub fn clear(&mut self) {
        self.0.fill(None);
    }

    /// Number of atoms currently assigned.
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_unset() {
        let mut check = Check::new(4);
        check.set(Literal::from(-3), 0);
        check.set(Literal::from(1), 1);
        assert_eq!(check[3], Some(0));
        assert_eq!(check.position(1), Some(1));
        assert!(!check.is_assigned(2));
        assert_eq!(check.assigned(), 2);

        check.unset(Literal::from(3));
        assert_eq!(check.position(3), None);
        check.clear();
        assert_eq!(check.assigned(), 0);
    }

    #[test]
    fn test_position_out_of_range_is_none() {
        let check = Check::new(2);
        assert_eq!(check.position(9), None);
    }
}
