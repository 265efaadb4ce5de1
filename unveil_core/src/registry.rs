// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays storage for registered elements.
//!
//! Each registered element occupies one slot in parallel arrays. Elements are
//! never unregistered during a page's lifetime, so there is no free list; the
//! id → slot map makes lookups by [`ElementId`] logarithmic.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::element::{ElementId, RevealGroup, RevealState};
use crate::host::ElementTree;

/// Registered elements and their reveal state.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    pub(crate) ids: Vec<ElementId>,
    pub(crate) groups: Vec<RevealGroup>,
    pub(crate) stagger: Vec<u32>,
    pub(crate) states: Vec<RevealState>,
    pub(crate) slots: BTreeMap<ElementId, u32>,
}

impl ElementRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` and returns its slot, or `None` if it was already
    /// registered (the existing entry is left untouched).
    pub fn insert(&mut self, id: ElementId, group: RevealGroup, stagger_index: u32) -> Option<u32> {
        if self.slots.contains_key(&id) {
            return None;
        }
        let slot = u32::try_from(self.ids.len()).ok()?;
        self.ids.push(id);
        self.groups.push(group);
        self.stagger.push(stagger_index);
        self.states.push(RevealState::Pending);
        self.slots.insert(id, slot);
        Some(slot)
    }

    /// Returns the number of registered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.slots.contains_key(&id)
    }

    fn slot(&self, id: ElementId) -> Option<usize> {
        self.slots.get(&id).map(|&s| s as usize)
    }

    /// Returns the reveal state of `id`, or `None` if unregistered.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.slot(id).map(|s| self.states[s])
    }

    /// Returns the reveal group of `id`, or `None` if unregistered.
    #[must_use]
    pub fn group(&self, id: ElementId) -> Option<RevealGroup> {
        self.slot(id).map(|s| self.groups[s])
    }

    /// Returns the stagger index of `id`, or `None` if unregistered.
    #[must_use]
    pub fn stagger_index(&self, id: ElementId) -> Option<u32> {
        self.slot(id).map(|s| self.stagger[s])
    }

    /// Moves `id` to `state`.
    ///
    /// Transitions out of [`RevealState::Revealed`] are refused; returns
    /// whether the state changed.
    pub(crate) fn set_state(&mut self, id: ElementId, state: RevealState) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let current = self.states[slot];
        if current.is_revealed() || current == state {
            return false;
        }
        self.states[slot] = state;
        true
    }

    /// Iterates over elements currently in `state`, in registration order.
    pub fn iter_in(&self, state: RevealState) -> impl Iterator<Item = ElementId> + '_ {
        self.ids
            .iter()
            .zip(&self.states)
            .filter(move |&(_, &s)| s == state)
            .map(|(&id, _)| id)
    }

    /// Iterates over elements not yet revealed, with their groups, in
    /// registration order.
    pub fn iter_unrevealed(&self) -> impl Iterator<Item = (ElementId, RevealGroup)> + '_ {
        self.ids
            .iter()
            .zip(&self.groups)
            .zip(&self.states)
            .filter(|&(_, s)| !s.is_revealed())
            .map(|((&id, &group), _)| (id, group))
    }

    /// Counts elements currently in `state`.
    #[must_use]
    pub fn count_in(&self, state: RevealState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    /// Returns `true` if any ancestor of `id` (per `tree`) is registered.
    pub fn has_registered_ancestor<T: ElementTree + ?Sized>(&self, tree: &T, id: ElementId) -> bool {
        let mut cursor = tree.parent(id);
        // Bounded walk: a host reporting a parent cycle must not hang us.
        let mut budget = 1024_u32;
        while let Some(ancestor) = cursor {
            if self.contains(ancestor) {
                return true;
            }
            budget -= 1;
            if budget == 0 {
                return false;
            }
            cursor = tree.parent(ancestor);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Rect;

    use super::*;

    struct Chain;

    impl ElementTree for Chain {
        fn query_all(&self, _selector: &str) -> Vec<ElementId> {
            Vec::new()
        }

        // 3 → 2 → 1 → 0
        fn parent(&self, id: ElementId) -> Option<ElementId> {
            id.0.checked_sub(1).map(ElementId)
        }

        fn bounds(&self, _id: ElementId) -> Option<Rect> {
            None
        }

        fn viewport(&self) -> Option<Rect> {
            None
        }
    }

    struct Cycle;

    impl ElementTree for Cycle {
        fn query_all(&self, _selector: &str) -> Vec<ElementId> {
            vec![]
        }

        fn parent(&self, id: ElementId) -> Option<ElementId> {
            Some(ElementId(id.0 ^ 1))
        }

        fn bounds(&self, _id: ElementId) -> Option<Rect> {
            None
        }

        fn viewport(&self) -> Option<Rect> {
            None
        }
    }

    #[test]
    fn duplicate_insert_is_refused() {
        let mut reg = ElementRegistry::new();
        assert_eq!(reg.insert(ElementId(7), RevealGroup::Container, 0), Some(0));
        assert_eq!(reg.insert(ElementId(7), RevealGroup::Title, 3), None);
        assert_eq!(reg.group(ElementId(7)), Some(RevealGroup::Container));
        assert_eq!(reg.stagger_index(ElementId(7)), Some(0));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn revealed_is_terminal() {
        let mut reg = ElementRegistry::new();
        reg.insert(ElementId(1), RevealGroup::Content, 0);
        assert!(reg.set_state(ElementId(1), RevealState::Queued));
        assert!(reg.set_state(ElementId(1), RevealState::Revealed));
        assert!(!reg.set_state(ElementId(1), RevealState::Pending));
        assert!(!reg.set_state(ElementId(1), RevealState::Queued));
        assert_eq!(reg.state(ElementId(1)), Some(RevealState::Revealed));
        assert!(!reg.set_state(ElementId(99), RevealState::Queued), "unknown id");
    }

    #[test]
    fn iter_in_keeps_registration_order() {
        let mut reg = ElementRegistry::new();
        for i in [5, 3, 9] {
            reg.insert(ElementId(i), RevealGroup::TextReveal, 0);
        }
        reg.set_state(ElementId(3), RevealState::Queued);
        let pending: Vec<_> = reg.iter_in(RevealState::Pending).collect();
        assert_eq!(pending, [ElementId(5), ElementId(9)]);
        assert_eq!(reg.count_in(RevealState::Queued), 1);
    }

    #[test]
    fn ancestor_lookup_walks_the_tree() {
        let mut reg = ElementRegistry::new();
        reg.insert(ElementId(1), RevealGroup::Container, 0);
        assert!(reg.has_registered_ancestor(&Chain, ElementId(3)));
        assert!(!reg.has_registered_ancestor(&Chain, ElementId(1)), "self is not an ancestor");
        assert!(!reg.has_registered_ancestor(&Chain, ElementId(0)));
    }

    #[test]
    fn ancestor_cycle_terminates() {
        let reg = ElementRegistry::new();
        assert!(!reg.has_registered_ancestor(&Cycle, ElementId(4)));
    }
}
