// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The scheduler is a pure state machine. Everything it needs from the
//! outside world goes through three seams:
//!
//! - **[`ElementTree`]**: A read-only capability interface over the UI tree
//!   (selector queries, parent links, geometry). Used by registration and the
//!   initial viewport check.
//!
//! - **[`HostSignals`]**: Platform facts read once at start-up
//!   (reduced-motion preference, viewport-watching support).
//!
//! - **[`RevealHost`]**: Applies the [`Commands`] produced by each
//!   scheduler call: observing elements, applying reveal classes, translating
//!   parallax layers, requesting frames, and arming timers.
//!
//! Hosts feed platform callbacks back as
//! [`Event`](crate::scheduler::Event)s.
//!
//! # Event loop pseudocode
//!
//! ```rust,ignore
//! fn on_platform_callback(event: Event) {
//!     let commands = scheduler.handle(event);
//!     host.apply(&commands);
//! }
//! ```

use alloc::vec::Vec;

use kurbo::{Rect, Vec2};

use crate::element::{ElementId, RevealGroup};
use crate::time::Duration;
use crate::timer::TimerToken;

/// Read-only capability interface over the host's UI tree.
pub trait ElementTree {
    /// Returns every element matching `selector`, in document order.
    ///
    /// An unknown or invalid selector yields an empty list.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Returns the nearest ancestor of `id` the host can name, or `None` at
    /// the root. Hosts may skip ancestors no query has matched.
    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Returns the bounds of `id` in viewport coordinates, or `None` if
    /// geometry is unavailable.
    fn bounds(&self, id: ElementId) -> Option<Rect>;

    /// Returns the viewport rectangle, or `None` if geometry is unavailable.
    fn viewport(&self) -> Option<Rect>;
}

/// Platform facts read once when the scheduler is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostSignals {
    /// The user asked for reduced motion.
    pub reduced_motion: bool,
    /// The host can report element visibility transitions.
    pub viewport_watching: bool,
}

impl HostSignals {
    /// A fully capable host with no motion preference.
    pub const CAPABLE: Self = Self {
        reduced_motion: false,
        viewport_watching: true,
    };
}

impl Default for HostSignals {
    fn default() -> Self {
        Self::CAPABLE
    }
}

/// A single instruction for the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Start reporting visibility transitions for the element.
    Observe(ElementId),
    /// Permanently stop reporting visibility transitions for the element.
    Unobserve(ElementId),
    /// Put a newly registered element into its group's pre-reveal state.
    Prepare {
        /// Target element.
        id: ElementId,
        /// Group treatment.
        group: RevealGroup,
        /// Stagger delay, exposed as [`STAGGER_PROPERTY`](crate::element::STAGGER_PROPERTY).
        stagger_delay: Option<Duration>,
    },
    /// Undo [`Command::Prepare`] for an element that will never reveal,
    /// returning it to its static styling.
    Restore {
        /// Target element.
        id: ElementId,
        /// Group whose pre-reveal state is removed.
        group: RevealGroup,
    },
    /// Apply the reveal transition.
    Reveal {
        /// Target element.
        id: ElementId,
        /// Group treatment.
        group: RevealGroup,
        /// Transition delay for sequential reveals within a batch.
        delay: Duration,
    },
    /// Translate a parallax layer.
    Translate {
        /// Target layer.
        id: ElementId,
        /// Absolute translation in CSS pixels.
        offset: Vec2,
    },
    /// Deliver one [`Event::Frame`](crate::scheduler::Event::Frame) before
    /// the next repaint.
    RequestFrame,
    /// Deliver an [`Event::Timer`](crate::scheduler::Event::Timer) carrying
    /// `token` after `delay`.
    ArmTimer {
        /// Token to hand back.
        token: TimerToken,
        /// Delay from now.
        delay: Duration,
    },
    /// Cancel a previously armed timer. Hosts that cannot cancel may ignore
    /// this; the scheduler discards stale firings anyway.
    CancelTimer(TimerToken),
}

/// Ordered list of [`Command`]s produced by one scheduler call.
///
/// Hosts must apply commands in order: an element's `Reveal` always precedes
/// anything that depends on the reveal having happened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Commands {
    list: Vec<Command>,
}

impl Commands {
    /// Creates an empty command list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    #[inline]
    pub fn push(&mut self, command: Command) {
        self.list.push(command);
    }

    /// Appends every command from `other`.
    pub fn extend(&mut self, other: Self) {
        self.list.extend(other.list);
    }

    /// Returns the commands as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Command] {
        &self.list
    }

    /// Iterates over the commands in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Command> {
        self.list.iter()
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterates over the ids revealed by these commands, in order.
    pub fn reveals(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.list.iter().filter_map(|c| match *c {
            Command::Reveal { id, .. } => Some(id),
            _ => None,
        })
    }

    /// Returns `true` if these commands request a frame.
    #[must_use]
    pub fn requests_frame(&self) -> bool {
        self.list.contains(&Command::RequestFrame)
    }
}

impl<'a> IntoIterator for &'a Commands {
    type Item = &'a Command;
    type IntoIter = core::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

/// Applies scheduler commands to a platform-native tree.
///
/// The DOM presenter and the simulated test host both implement this trait.
pub trait RevealHost {
    /// Applies `commands` in order.
    fn apply(&mut self, commands: &Commands);
}
