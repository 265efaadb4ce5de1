// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disclosure accordion ("spollers").

use alloc::vec;
use alloc::vec::Vec;

/// Open/closed state of a group of disclosure items.
///
/// In exclusive mode opening an item closes every other open item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accordion {
    open: Vec<bool>,
    exclusive: bool,
}

/// Result of [`Accordion::toggle`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccordionChange {
    /// Item that was opened, if any.
    pub opened: Option<usize>,
    /// Items that were closed, in index order.
    pub closed: Vec<usize>,
}

impl Accordion {
    /// Creates an accordion with `items` closed items.
    #[must_use]
    pub fn new(items: usize, exclusive: bool) -> Self {
        Self {
            open: vec![false; items],
            exclusive,
        }
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Returns `true` if opening one item closes the others.
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Returns `true` if item `index` is open.
    #[must_use]
    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    /// Overwrites the state of item `index` without closing siblings, for
    /// seeding from markup. Out-of-range indices are ignored.
    pub fn set_open(&mut self, index: usize, open: bool) {
        if let Some(slot) = self.open.get_mut(index) {
            *slot = open;
        }
    }

    /// Toggles item `index`. Out-of-range indices change nothing.
    pub fn toggle(&mut self, index: usize) -> AccordionChange {
        let mut change = AccordionChange::default();
        if index >= self.open.len() {
            return change;
        }
        if self.exclusive {
            for (i, open) in self.open.iter_mut().enumerate() {
                if i != index && *open {
                    *open = false;
                    change.closed.push(i);
                }
            }
        }
        let now_open = !self.open[index];
        self.open[index] = now_open;
        if now_open {
            change.opened = Some(index);
        } else {
            change.closed.push(index);
            change.closed.sort_unstable();
        }
        change
    }
}
