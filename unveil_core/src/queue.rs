// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detection-ordered reveal queue.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::element::ElementId;

/// FIFO of elements that have been seen but not yet revealed.
///
/// Order is detection order, not document order. An element is held at most
/// once; pushing a member again is a no-op.
#[derive(Debug, Clone, Default)]
pub struct RevealQueue {
    items: VecDeque<ElementId>,
    members: BTreeSet<ElementId>,
}

impl RevealQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` and returns `true`, or returns `false` if it is already
    /// queued.
    pub fn push(&mut self, id: ElementId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.items.push_back(id);
        true
    }

    /// Removes and returns up to `max` elements from the front.
    pub fn take_batch(&mut self, max: usize) -> Vec<ElementId> {
        let n = max.min(self.items.len());
        let batch: Vec<ElementId> = self.items.drain(..n).collect();
        for id in &batch {
            self.members.remove(id);
        }
        batch
    }

    /// Returns `true` if `id` is waiting in the queue.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.members.contains(&id)
    }

    /// Returns the number of queued elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every queued element.
    pub fn clear(&mut self) {
        self.items.clear();
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_push_is_ignored() {
        let mut queue = RevealQueue::new();
        assert!(queue.push(ElementId(1)));
        assert!(!queue.push(ElementId(1)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn batches_preserve_detection_order() {
        let mut queue = RevealQueue::new();
        for id in [4, 2, 9, 1, 7] {
            queue.push(ElementId(id));
        }
        assert_eq!(queue.take_batch(3), [ElementId(4), ElementId(2), ElementId(9)]);
        assert_eq!(queue.take_batch(3), [ElementId(1), ElementId(7)]);
        assert!(queue.take_batch(3).is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn dequeued_element_may_be_queued_again() {
        let mut queue = RevealQueue::new();
        queue.push(ElementId(3));
        let _ = queue.take_batch(1);
        assert!(!queue.contains(ElementId(3)));
        assert!(queue.push(ElementId(3)), "membership is released on dequeue");
    }
}
