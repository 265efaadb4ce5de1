// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic simulated host for the reveal scheduler.
//!
//! [`Harness`] owns a [`RevealScheduler`], a [`SimTree`] page, and a
//! [`SimHost`] that applies commands. Time only moves through
//! [`Harness::advance`], which replays the browser's event loop in virtual
//! time:
//!
//! 1. due timers fire, earliest first;
//! 2. at each vsync (every [`VSYNC`]) a pending frame callback runs, then the
//!    viewport watcher re-checks every observed element and reports changes.

#![no_std]

extern crate alloc;

mod host;
mod tree;

#[cfg(test)]
mod scenarios;

use alloc::vec::Vec;

use unveil_core::config::{GroupOptions, RevealConfig};
use unveil_core::element::{ElementId, RevealGroup};
use unveil_core::host::{ElementTree, HostSignals, RevealHost};
use unveil_core::scheduler::{Event, RevealScheduler};
use unveil_core::time::{Duration, HostTime};

pub use host::{ElementView, PendingTimer, SimHost};
pub use tree::SimTree;

/// Display refresh interval (60 Hz).
pub const VSYNC: Duration = Duration(16_667);

/// Reveals applied in one frame callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRecord {
    /// Frame callback time.
    pub now: HostTime,
    /// Elements revealed, in order.
    pub revealed: Vec<ElementId>,
}

/// Scheduler plus simulated page, clock, and event loop.
#[derive(Debug)]
pub struct Harness {
    scheduler: RevealScheduler,
    tree: SimTree,
    host: SimHost,
    next_vsync: HostTime,
    initial_check_at: Option<HostTime>,
    watcher_enabled: bool,
    frames: Vec<FrameRecord>,
}

impl Harness {
    /// Creates a harness at time zero.
    #[must_use]
    pub fn new(config: RevealConfig, signals: HostSignals, tree: SimTree) -> Self {
        Self {
            scheduler: RevealScheduler::init(config, signals),
            tree,
            host: SimHost::new(),
            next_vsync: HostTime(0) + VSYNC,
            initial_check_at: None,
            watcher_enabled: true,
            frames: Vec::new(),
        }
    }

    /// Returns the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &RevealScheduler {
        &self.scheduler
    }

    /// Returns the page.
    #[must_use]
    pub fn tree(&self) -> &SimTree {
        &self.tree
    }

    /// Returns the page for modification.
    pub fn tree_mut(&mut self) -> &mut SimTree {
        &mut self.tree
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &SimHost {
        &self.host
    }

    /// Returns the virtual time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.host.now()
    }

    /// Returns every frame callback that revealed something.
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Stops the viewport watcher from reporting anything, emulating a
    /// watcher that misses elements already in view at load.
    pub fn disable_watcher(&mut self) {
        self.watcher_enabled = false;
    }

    /// Registers a reveal group.
    pub fn register(&mut self, selectors: &[&str], group: RevealGroup, options: GroupOptions) {
        let commands = self
            .scheduler
            .register_group(&self.tree, selectors, group, options);
        self.host.apply(&commands);
    }

    /// Registers parallax layers. Returns the layer count.
    pub fn register_parallax(&mut self, selectors: &[&str]) -> usize {
        self.scheduler.register_parallax(&self.tree, selectors)
    }

    /// Schedules the one-time initial viewport check.
    pub fn start(&mut self) {
        self.initial_check_at = Some(self.now() + self.scheduler.config().initial_check_delay);
    }

    /// Delivers an event and applies the resulting commands.
    pub fn dispatch(&mut self, event: Event) {
        let commands = self.scheduler.handle(event);
        self.host.apply(&commands);
    }

    /// Scrolls the page to `offset` and delivers the scroll event.
    pub fn scroll_to(&mut self, offset: f64) {
        self.tree.set_scroll(offset);
        let now = self.now();
        self.dispatch(Event::Scroll { now, offset });
    }

    /// Delivers a wheel event.
    pub fn wheel(&mut self) {
        let now = self.now();
        self.dispatch(Event::Wheel { now });
    }

    /// Tears the scheduler down.
    pub fn teardown(&mut self) {
        let commands = self.scheduler.teardown();
        self.host.apply(&commands);
    }

    /// Runs the event loop for `duration`.
    pub fn advance(&mut self, duration: Duration) {
        let end = self.now() + duration;
        loop {
            let timer = self.host.next_timer_due();
            let check = self.initial_check_at;
            let vsync = self.next_vsync;
            let next = [timer, check, Some(vsync)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(vsync);
            if next > end {
                break;
            }
            self.host.set_now(next);
            if timer == Some(next) {
                if let Some(token) = self.host.pop_due_timer(next) {
                    self.dispatch(Event::Timer { token, now: next });
                }
            } else if check == Some(next) {
                self.initial_check_at = None;
                let commands = self.scheduler.initial_viewport_check(&self.tree);
                self.host.apply(&commands);
            } else {
                self.vsync(next);
                self.next_vsync = next + VSYNC;
            }
        }
        self.host.set_now(end);
    }

    /// Runs the event loop for `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    fn vsync(&mut self, now: HostTime) {
        if self.host.take_frame_request() {
            let commands = self.scheduler.handle(Event::Frame { now });
            let revealed: Vec<ElementId> = commands.reveals().collect();
            self.host.apply(&commands);
            if !revealed.is_empty() {
                self.frames.push(FrameRecord { now, revealed });
            }
        }
        self.watch();
    }

    /// One viewport watcher pass over the observed elements.
    fn watch(&mut self) {
        if !self.watcher_enabled {
            return;
        }
        let Some(viewport) = self.tree.viewport() else {
            return;
        };
        let options = self.scheduler.config().observer;
        let observed: Vec<ElementId> = self.host.observed().collect();
        for id in observed {
            let visible = self
                .tree
                .bounds(id)
                .is_some_and(|b| options.is_visible(b, viewport));
            if self.host.note_visibility(id, visible) {
                self.dispatch(Event::Visibility { id, visible });
            }
        }
    }
}
