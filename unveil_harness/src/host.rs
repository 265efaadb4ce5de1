// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-applying host with a virtual clock.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Vec2;
use unveil_core::element::ElementId;
use unveil_core::host::{Command, Commands, RevealHost};
use unveil_core::time::{Duration, HostTime};
use unveil_core::timer::TimerToken;

/// What the host has done to one element so far.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementView {
    /// The viewport watcher reports on this element.
    pub observed: bool,
    /// Pre-reveal class applied at registration.
    pub pending_class: Option<&'static str>,
    /// Stagger delay exposed to styling.
    pub stagger_delay: Option<Duration>,
    /// Time the reveal was applied.
    pub revealed_at: Option<HostTime>,
    /// In-batch transition delay of the reveal.
    pub reveal_delay: Duration,
    /// Current parallax translation.
    pub translation: Vec2,
}

impl ElementView {
    /// Returns `true` once the reveal has been applied.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }
}

/// A timer waiting to fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTimer {
    /// Firing time.
    pub due: HostTime,
    /// Token to deliver.
    pub token: TimerToken,
}

/// Applies [`Commands`] to an in-memory model of the page.
///
/// Frame requests coalesce into a single flag, like `requestAnimationFrame`
/// callbacks that all run in the next frame. Timers keep arming order for
/// equal due times.
#[derive(Clone, Debug, Default)]
pub struct SimHost {
    now: HostTime,
    elements: BTreeMap<ElementId, ElementView>,
    /// Last visibility reported per observed element; `None` until the
    /// first watcher pass after observing.
    watched: BTreeMap<ElementId, Option<bool>>,
    frame_requested: bool,
    frame_requests: u64,
    timers: Vec<PendingTimer>,
    cancelled_timers: u64,
    reveal_log: Vec<(HostTime, ElementId)>,
}

impl SimHost {
    /// Creates a host with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the virtual time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: HostTime) {
        self.now = now;
    }

    /// Returns what has been applied to `id`, if anything.
    #[must_use]
    pub fn view(&self, id: ElementId) -> Option<&ElementView> {
        self.elements.get(&id)
    }

    /// Returns `true` if `id` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, id: ElementId) -> bool {
        self.view(id).is_some_and(ElementView::is_revealed)
    }

    /// Returns the number of revealed elements.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.reveal_log.len()
    }

    /// Returns every reveal in application order.
    #[must_use]
    pub fn reveal_log(&self) -> &[(HostTime, ElementId)] {
        &self.reveal_log
    }

    /// Returns the ids currently observed.
    pub fn observed(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.watched.keys().copied()
    }

    /// Returns the number of frame requests received.
    #[must_use]
    pub fn frame_requests(&self) -> u64 {
        self.frame_requests
    }

    /// Returns `true` if a frame callback is pending.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }

    /// Returns the timers still waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> &[PendingTimer] {
        &self.timers
    }

    /// Returns the number of cancellations received.
    #[must_use]
    pub fn cancelled_timers(&self) -> u64 {
        self.cancelled_timers
    }

    pub(crate) fn take_frame_request(&mut self) -> bool {
        core::mem::replace(&mut self.frame_requested, false)
    }

    pub(crate) fn next_timer_due(&self) -> Option<HostTime> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub(crate) fn pop_due_timer(&mut self, now: HostTime) -> Option<TimerToken> {
        let due = self.next_timer_due().filter(|&d| d <= now)?;
        let index = self.timers.iter().position(|t| t.due == due)?;
        Some(self.timers.remove(index).token)
    }

    /// Records a watcher result. Returns `true` if it differs from the last
    /// one reported for `id`.
    pub(crate) fn note_visibility(&mut self, id: ElementId, visible: bool) -> bool {
        match self.watched.get_mut(&id) {
            Some(last) if *last != Some(visible) => {
                *last = Some(visible);
                true
            }
            _ => false,
        }
    }

    fn entry(&mut self, id: ElementId) -> &mut ElementView {
        self.elements.entry(id).or_default()
    }
}

impl RevealHost for SimHost {
    fn apply(&mut self, commands: &Commands) {
        for command in commands {
            match *command {
                Command::Observe(id) => {
                    self.entry(id).observed = true;
                    self.watched.insert(id, None);
                }
                Command::Unobserve(id) => {
                    self.entry(id).observed = false;
                    self.watched.remove(&id);
                }
                Command::Prepare {
                    id,
                    group,
                    stagger_delay,
                } => {
                    let view = self.entry(id);
                    view.pending_class = Some(group.pending_class());
                    view.stagger_delay = stagger_delay;
                }
                Command::Restore { id, .. } => {
                    let view = self.entry(id);
                    view.pending_class = None;
                    view.stagger_delay = None;
                }
                Command::Reveal { id, delay, .. } => {
                    let now = self.now;
                    let view = self.entry(id);
                    view.revealed_at = Some(now);
                    view.reveal_delay = delay;
                    self.reveal_log.push((now, id));
                }
                Command::Translate { id, offset } => self.entry(id).translation = offset,
                Command::RequestFrame => {
                    self.frame_requested = true;
                    self.frame_requests += 1;
                }
                Command::ArmTimer { token, delay } => self.timers.push(PendingTimer {
                    due: self.now + delay,
                    token,
                }),
                Command::CancelTimer(token) => {
                    self.timers.retain(|t| t.token != token);
                    self.cancelled_timers += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::element::RevealGroup;
    use unveil_core::timer::TimerKind;

    fn token(generation: u32) -> TimerToken {
        TimerToken {
            kind: TimerKind::BatchGap,
            generation,
        }
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut host = SimHost::new();
        let mut cmds = Commands::new();
        cmds.push(Command::ArmTimer {
            token: token(1),
            delay: Duration::from_millis(30),
        });
        cmds.push(Command::ArmTimer {
            token: token(2),
            delay: Duration::from_millis(10),
        });
        host.apply(&cmds);
        assert_eq!(host.pop_due_timer(HostTime(5_000)), None, "nothing due yet");
        assert_eq!(host.pop_due_timer(HostTime(40_000)), Some(token(2)));
        assert_eq!(host.pop_due_timer(HostTime(40_000)), Some(token(1)));
    }

    #[test]
    fn cancel_removes_the_timer() {
        let mut host = SimHost::new();
        let mut cmds = Commands::new();
        cmds.push(Command::ArmTimer {
            token: token(1),
            delay: Duration::from_millis(10),
        });
        cmds.push(Command::CancelTimer(token(1)));
        host.apply(&cmds);
        assert!(host.pending_timers().is_empty(), "cancelled before firing");
        assert_eq!(host.cancelled_timers(), 1);
    }

    #[test]
    fn reveal_is_logged_with_the_current_time() {
        let mut host = SimHost::new();
        host.set_now(HostTime(33_000));
        let mut cmds = Commands::new();
        cmds.push(Command::Prepare {
            id: ElementId(7),
            group: RevealGroup::ScaleItem,
            stagger_delay: None,
        });
        cmds.push(Command::Reveal {
            id: ElementId(7),
            group: RevealGroup::ScaleItem,
            delay: Duration::from_millis(20),
        });
        host.apply(&cmds);
        let view = host.view(ElementId(7)).copied().unwrap_or_default();
        assert_eq!(view.pending_class, Some("scroll-animate-scale"));
        assert_eq!(view.revealed_at, Some(HostTime(33_000)));
        assert_eq!(host.reveal_log(), [(HostTime(33_000), ElementId(7))]);
    }

    #[test]
    fn visibility_changes_are_reported_once() {
        let mut host = SimHost::new();
        let mut cmds = Commands::new();
        cmds.push(Command::Observe(ElementId(1)));
        host.apply(&cmds);
        assert!(host.note_visibility(ElementId(1), false), "first report");
        assert!(!host.note_visibility(ElementId(1), false), "unchanged");
        assert!(host.note_visibility(ElementId(1), true));
        assert!(!host.note_visibility(ElementId(2), true), "not observed");
    }
}
