// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll and wheel activity tracking.
//!
//! [`ScrollState`] only records *whether* the page is scrolling; the quiet
//! period that ends a scroll is a host timer armed by the scheduler (see
//! [`TimerKind::ScrollQuiet`](crate::timer::TimerKind::ScrollQuiet)).
//! [`Throttle`] enforces a minimum spacing between updates.

use crate::time::{Duration, HostTime};

/// Process-wide scroll flags.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    scrolling: bool,
    wheeling: bool,
    last_offset: f64,
}

impl ScrollState {
    /// Returns `true` between the first scroll event after idle and the end
    /// of the quiet period.
    #[inline]
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Returns `true` while a wheel gesture is in progress.
    #[inline]
    #[must_use]
    pub fn is_wheeling(&self) -> bool {
        self.wheeling
    }

    /// Returns the most recent scroll offset.
    #[inline]
    #[must_use]
    pub fn last_offset(&self) -> f64 {
        self.last_offset
    }

    /// Records a scroll event. Returns `true` if this event started a new
    /// scroll (the state was idle).
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        self.last_offset = offset;
        let started = !self.scrolling;
        self.scrolling = true;
        started
    }

    /// Ends the scroll state. Returns `true` if it was active.
    pub fn settle(&mut self) -> bool {
        core::mem::replace(&mut self.scrolling, false)
    }

    /// Records a wheel event. Returns `true` if this started a new gesture.
    pub fn on_wheel(&mut self) -> bool {
        !core::mem::replace(&mut self.wheeling, true)
    }

    /// Ends the wheel gesture. Returns `true` if it was active.
    pub fn settle_wheel(&mut self) -> bool {
        core::mem::replace(&mut self.wheeling, false)
    }
}

/// Minimum-spacing gate for periodic work.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<HostTime>,
}

impl Throttle {
    /// Creates a throttle allowing one update per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` if an update at `now` respects the spacing.
    #[must_use]
    pub fn ready(&self, now: HostTime) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Returns how long until an update would be allowed.
    #[must_use]
    pub fn remaining(&self, now: HostTime) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }

    /// Records an update at `now`.
    pub fn mark(&mut self, now: HostTime) {
        self.last = Some(now);
    }
}
