// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal scheduling with frame-batched draining and scroll pausing.
//!
//! The [`RevealScheduler`] turns visibility, frame, scroll, wheel, and timer
//! [`Event`]s into [`Commands`] for the host. See the struct docs for the
//! element lifecycle and the drain cycle.

use alloc::vec::Vec;

use crate::config::{GroupOptions, RevealConfig};
use crate::element::{ElementId, RevealGroup, RevealState};
use crate::host::{Command, Commands, ElementTree, HostSignals};
use crate::parallax::ParallaxLayers;
use crate::queue::RevealQueue;
use crate::registry::ElementRegistry;
use crate::scroll::{ScrollState, Throttle};
use crate::time::{Duration, HostTime};
use crate::timer::{TimerKind, TimerSlots, TimerToken};
use crate::trace::{
    BatchEvent, DeferredEvent, EnqueuedEvent, ParallaxEvent, RegisteredEvent, RevealedEvent,
    ScrollStateEvent, TimerEvent, Tracer,
};

/// A platform callback delivered to [`RevealScheduler::handle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The viewport watcher reports a visibility transition.
    Visibility {
        /// The element.
        id: ElementId,
        /// Whether the element is now sufficiently visible.
        visible: bool,
    },
    /// A requested pre-repaint callback fired.
    Frame {
        /// Callback timestamp.
        now: HostTime,
    },
    /// The page scrolled.
    Scroll {
        /// Event time.
        now: HostTime,
        /// Current vertical scroll offset in CSS pixels.
        offset: f64,
    },
    /// A wheel event arrived.
    Wheel {
        /// Event time.
        now: HostTime,
    },
    /// An armed timer fired.
    Timer {
        /// Token from the corresponding [`Command::ArmTimer`].
        token: TimerToken,
        /// Firing time.
        now: HostTime,
    },
}

/// Whether the scheduler does anything at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Observing, queueing, and revealing.
    Active,
    /// The user prefers reduced motion; the scheduler never activates.
    ReducedMotion,
    /// The host cannot watch the viewport; elements never reveal.
    Unsupported,
    /// [`RevealScheduler::teardown`] was called.
    TornDown,
}

/// Where the drain cycle currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DrainPhase {
    /// Not running; the next enqueue starts a cycle.
    Idle,
    /// A frame was requested; the next batch runs in it.
    AwaitingFrame,
    /// Between batches; the gap timer requests the next frame.
    AwaitingGap,
    /// Paused by scrolling; the scroll quiet timer resumes it.
    Deferred,
}

/// Running counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealStats {
    /// Elements registered.
    pub registered: usize,
    /// Elements revealed.
    pub revealed: usize,
    /// Batches drained.
    pub batches: u64,
    /// Times a drain was deferred by scrolling.
    pub deferrals: u64,
    /// Timer firings discarded as stale.
    pub stale_timers: u64,
}

/// One-shot reveal scheduler.
///
/// # Element lifecycle
///
/// Each registered element moves `Pending → Queued → Revealed`:
///
/// - `Pending → Queued` only on a [`Event::Visibility`] with `visible = true`
///   (or the one-time [initial viewport check](Self::initial_viewport_check)).
///   The element is unobserved at that point; no further events are needed.
/// - `Queued → Revealed` only when a drain batch reaches it.
/// - `Revealed` is terminal. Re-delivered visibility events are ignored.
///
/// # Drain cycle
///
/// Enqueueing starts a cycle if none is running. Each cycle step requests a
/// frame; the [`Event::Frame`] callback reveals at most
/// [`RevealConfig::batch_size`] elements in detection order, each with an
/// in-batch delay of `position × reveal_stagger`. If elements remain, a
/// [`TimerKind::BatchGap`] timer requests the next frame.
///
/// While the page is scrolling the cycle is deferred: frames that arrive do
/// nothing, and the [`TimerKind::ScrollQuiet`] firing restarts the cycle.
/// Deferral never discards queued elements.
///
/// # Usage
///
/// ```rust
/// use unveil_core::config::RevealConfig;
/// use unveil_core::host::HostSignals;
/// use unveil_core::scheduler::{Event, RevealScheduler};
/// use unveil_core::time::HostTime;
///
/// let mut scheduler = RevealScheduler::init(RevealConfig::web(), HostSignals::CAPABLE);
/// let commands = scheduler.handle(Event::Frame { now: HostTime(16_000) });
/// assert!(commands.is_empty(), "nothing registered yet");
/// ```
#[derive(Debug)]
pub struct RevealScheduler {
    config: RevealConfig,
    activation: Activation,
    registry: ElementRegistry,
    queue: RevealQueue,
    scroll: ScrollState,
    parallax: ParallaxLayers,
    parallax_throttle: Throttle,
    timers: TimerSlots,
    drain: DrainPhase,
    initial_check_done: bool,
    stats: RevealStats,
}

impl RevealScheduler {
    /// Creates a scheduler. Reduced motion or a host without viewport
    /// watching leaves it permanently inactive.
    #[must_use]
    pub fn init(config: RevealConfig, signals: HostSignals) -> Self {
        let activation = if signals.reduced_motion {
            Activation::ReducedMotion
        } else if !signals.viewport_watching {
            Activation::Unsupported
        } else {
            Activation::Active
        };
        Self {
            parallax_throttle: Throttle::new(config.parallax_interval),
            config,
            activation,
            registry: ElementRegistry::new(),
            queue: RevealQueue::new(),
            scroll: ScrollState::default(),
            parallax: ParallaxLayers::new(),
            timers: TimerSlots::default(),
            drain: DrainPhase::Idle,
            initial_check_done: false,
            stats: RevealStats::default(),
        }
    }

    // -- Queries --

    /// Returns the activation state.
    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Returns `true` if the scheduler reacts to events.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activation == Activation::Active
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Returns the element registry.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Returns the reveal state of `id`, or `None` if unregistered.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.registry.state(id)
    }

    /// Returns the number of queued elements.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` while the scroll state is active.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    /// Returns `true` while a wheel gesture is in progress.
    #[must_use]
    pub fn is_wheeling(&self) -> bool {
        self.scroll.is_wheeling()
    }

    /// Returns `true` while a drain cycle is running or deferred.
    #[must_use]
    pub fn is_draining(&self) -> bool {
        self.drain != DrainPhase::Idle
    }

    /// Returns `true` while a drain cycle is paused by scrolling.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.drain == DrainPhase::Deferred
    }

    /// Returns the number of parallax layers.
    #[must_use]
    pub fn parallax_layers(&self) -> usize {
        self.parallax.len()
    }

    /// Returns diagnostic counters.
    #[must_use]
    pub fn stats(&self) -> RevealStats {
        self.stats
    }

    // -- Registration --

    /// Registers every element matched by `selectors` under `group`.
    ///
    /// See [`register_group_traced`](Self::register_group_traced).
    pub fn register_group<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        selectors: &[&str],
        group: RevealGroup,
        options: GroupOptions,
    ) -> Commands {
        self.register_group_traced(tree, selectors, group, options, &mut Tracer::none())
    }

    /// Registers every element matched by `selectors` under `group`,
    /// reporting to `tracer`.
    ///
    /// Already registered elements are skipped, and so are elements with a
    /// registered ancestor when [`GroupOptions::skip_nested`] is set. An
    /// element's stagger index is its ordinal among the matches of its
    /// selector. Selectors that match nothing are a no-op.
    pub fn register_group_traced<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        selectors: &[&str],
        group: RevealGroup,
        options: GroupOptions,
        tracer: &mut Tracer<'_>,
    ) -> Commands {
        let mut cmds = Commands::new();
        if !self.is_active() {
            return cmds;
        }
        for selector in selectors {
            for (ordinal, id) in tree.query_all(selector).into_iter().enumerate() {
                if self.registry.contains(id)
                    || (options.skip_nested && self.registry.has_registered_ancestor(tree, id))
                {
                    continue;
                }
                let stagger_index = u32::try_from(ordinal).unwrap_or(u32::MAX);
                if self.registry.insert(id, group, stagger_index).is_none() {
                    continue;
                }
                self.stats.registered += 1;
                cmds.push(Command::Prepare {
                    id,
                    group,
                    stagger_delay: options.stagger_step.map(|step| step * stagger_index),
                });
                cmds.push(Command::Observe(id));
                tracer.registered(&RegisteredEvent {
                    id,
                    group,
                    stagger_index,
                });
            }
        }
        cmds
    }

    /// Adds every element matched by `selectors` as a parallax layer, in
    /// order. Returns the number of layers afterwards.
    pub fn register_parallax<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        selectors: &[&str],
    ) -> usize {
        if !self.is_active() {
            return 0;
        }
        for selector in selectors {
            for id in tree.query_all(selector) {
                self.parallax.push(id);
            }
        }
        self.parallax.len()
    }

    // -- Initial viewport check --

    /// Queues every pending element already inside the viewport.
    ///
    /// See [`initial_viewport_check_traced`](Self::initial_viewport_check_traced).
    pub fn initial_viewport_check<T: ElementTree + ?Sized>(&mut self, tree: &T) -> Commands {
        self.initial_viewport_check_traced(tree, &mut Tracer::none())
    }

    /// Queues every pending element already inside the viewport, reporting to
    /// `tracer`.
    ///
    /// Covers elements that are visible at load before any visibility event
    /// fires. Runs once; later calls and hosts without geometry are no-ops.
    pub fn initial_viewport_check_traced<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        tracer: &mut Tracer<'_>,
    ) -> Commands {
        let mut cmds = Commands::new();
        if !self.is_active() || self.initial_check_done {
            return cmds;
        }
        let Some(viewport) = tree.viewport() else {
            return cmds;
        };
        self.initial_check_done = true;
        let pending: Vec<ElementId> = self.registry.iter_in(RevealState::Pending).collect();
        for id in pending {
            if let Some(bounds) = tree.bounds(id)
                && bounds.y0 < viewport.y1
                && bounds.y1 > viewport.y0
            {
                self.enqueue(id, &mut cmds, tracer);
            }
        }
        self.start_drain(&mut cmds, tracer);
        cmds
    }

    // -- Event handling --

    /// Feeds one event through the state machine.
    #[must_use]
    pub fn handle(&mut self, event: Event) -> Commands {
        self.handle_traced(event, &mut Tracer::none())
    }

    /// Feeds one event through the state machine, reporting to `tracer`.
    #[must_use]
    pub fn handle_traced(&mut self, event: Event, tracer: &mut Tracer<'_>) -> Commands {
        let mut cmds = Commands::new();
        if !self.is_active() {
            return cmds;
        }
        match event {
            Event::Visibility { id, visible } => {
                if visible && self.enqueue(id, &mut cmds, tracer) {
                    self.start_drain(&mut cmds, tracer);
                }
            }
            Event::Frame { now } => self.on_frame(now, &mut cmds, tracer),
            Event::Scroll { now, offset } => self.on_scroll(now, offset, &mut cmds, tracer),
            Event::Wheel { .. } => {
                let _ = self.scroll.on_wheel();
                self.arm(TimerKind::WheelQuiet, self.config.wheel_quiet, &mut cmds);
            }
            Event::Timer { token, now } => self.on_timer(token, now, &mut cmds, tracer),
        }
        cmds
    }

    // -- Teardown --

    /// Stops the scheduler: unobserves still-watched elements, restores every
    /// unrevealed element to its static styling, cancels every armed timer,
    /// and drops the queue. Afterwards every call is a no-op.
    ///
    /// Hosts that fail partway through setup call this to undo the
    /// `Prepare` commands they already applied.
    pub fn teardown(&mut self) -> Commands {
        let mut cmds = Commands::new();
        if self.activation == Activation::TornDown {
            return cmds;
        }
        if self.is_active() {
            for id in self.registry.iter_in(RevealState::Pending) {
                cmds.push(Command::Unobserve(id));
            }
            for (id, group) in self.registry.iter_unrevealed() {
                cmds.push(Command::Restore { id, group });
            }
            for kind in TimerKind::ALL {
                if let Some(token) = self.timers.disarm(kind) {
                    cmds.push(Command::CancelTimer(token));
                }
            }
        }
        self.queue.clear();
        self.drain = DrainPhase::Idle;
        self.activation = Activation::TornDown;
        cmds
    }

    // -- Internals --

    /// Moves a pending element into the queue. Returns `false` for anything
    /// that is not pending.
    fn enqueue(&mut self, id: ElementId, cmds: &mut Commands, tracer: &mut Tracer<'_>) -> bool {
        if self.registry.state(id) != Some(RevealState::Pending) {
            return false;
        }
        self.registry.set_state(id, RevealState::Queued);
        self.queue.push(id);
        cmds.push(Command::Unobserve(id));
        tracer.enqueued(&EnqueuedEvent {
            id,
            queue_len: self.queue.len(),
        });
        true
    }

    fn start_drain(&mut self, cmds: &mut Commands, tracer: &mut Tracer<'_>) {
        if self.drain != DrainPhase::Idle || self.queue.is_empty() {
            return;
        }
        if self.scroll.is_scrolling() {
            self.defer(tracer);
            return;
        }
        self.drain = DrainPhase::AwaitingFrame;
        cmds.push(Command::RequestFrame);
    }

    fn defer(&mut self, tracer: &mut Tracer<'_>) {
        self.drain = DrainPhase::Deferred;
        self.stats.deferrals += 1;
        tracer.deferred(&DeferredEvent {
            queued: self.queue.len(),
        });
    }

    fn on_frame(&mut self, now: HostTime, cmds: &mut Commands, tracer: &mut Tracer<'_>) {
        if self.drain != DrainPhase::AwaitingFrame {
            return;
        }
        if self.scroll.is_scrolling() {
            self.defer(tracer);
            return;
        }
        let batch = self.queue.take_batch(self.config.effective_batch_size());
        self.drain = DrainPhase::Idle;
        if batch.is_empty() {
            return;
        }

        let batch_index = self.stats.batches;
        self.stats.batches += 1;
        let mut position = 0_u32;
        for id in &batch {
            let Some(group) = self.registry.group(*id) else {
                continue;
            };
            if !self.registry.set_state(*id, RevealState::Revealed) {
                continue;
            }
            let delay = self.config.reveal_stagger * position;
            position += 1;
            self.stats.revealed += 1;
            cmds.push(Command::Reveal {
                id: *id,
                group,
                delay,
            });
            tracer.revealed(&RevealedEvent {
                id: *id,
                group,
                delay,
                batch_index,
            });
        }
        tracer.batch(&BatchEvent {
            now,
            batch_index,
            size: batch.len(),
            remaining: self.queue.len(),
        });

        if self.queue.is_empty() {
            return;
        }
        if self.config.batch_gap.is_zero() {
            self.drain = DrainPhase::AwaitingFrame;
            cmds.push(Command::RequestFrame);
        } else {
            self.drain = DrainPhase::AwaitingGap;
            self.arm(TimerKind::BatchGap, self.config.batch_gap, cmds);
        }
    }

    fn on_scroll(&mut self, now: HostTime, offset: f64, cmds: &mut Commands, tracer: &mut Tracer<'_>) {
        if self.scroll.on_scroll(offset) {
            tracer.scroll_state(&ScrollStateEvent {
                now,
                scrolling: true,
                offset,
            });
        }
        self.arm(TimerKind::ScrollQuiet, self.config.scroll_quiet, cmds);

        if self.parallax.is_empty() {
            return;
        }
        if self.parallax_throttle.ready(now) {
            self.apply_parallax(now, offset, cmds, tracer);
        } else if !self.timers.is_armed(TimerKind::ParallaxTrailing) {
            let wait = self.parallax_throttle.remaining(now);
            self.arm(TimerKind::ParallaxTrailing, wait, cmds);
        }
    }

    fn on_timer(&mut self, token: TimerToken, now: HostTime, cmds: &mut Commands, tracer: &mut Tracer<'_>) {
        let live = self.timers.settle(token);
        tracer.timer(&TimerEvent {
            now,
            token,
            stale: !live,
        });
        if !live {
            self.stats.stale_timers += 1;
            return;
        }
        match token.kind {
            TimerKind::ScrollQuiet => {
                if self.scroll.settle() {
                    tracer.scroll_state(&ScrollStateEvent {
                        now,
                        scrolling: false,
                        offset: self.scroll.last_offset(),
                    });
                }
                if self.drain == DrainPhase::Deferred {
                    self.drain = DrainPhase::Idle;
                }
                self.start_drain(cmds, tracer);
            }
            TimerKind::WheelQuiet => {
                let _ = self.scroll.settle_wheel();
            }
            TimerKind::BatchGap => {
                if self.drain == DrainPhase::AwaitingGap {
                    self.drain = DrainPhase::Idle;
                    self.start_drain(cmds, tracer);
                }
            }
            TimerKind::ParallaxTrailing => {
                let offset = self.scroll.last_offset();
                self.apply_parallax(now, offset, cmds, tracer);
            }
        }
    }

    fn apply_parallax(&mut self, now: HostTime, offset: f64, cmds: &mut Commands, tracer: &mut Tracer<'_>) {
        if !self.parallax.needs_update(offset, self.config.min_scroll_delta) {
            return;
        }
        self.parallax_throttle.mark(now);
        let k = self.config.parallax_factor;
        for (id, translation) in self.parallax.update(k, offset) {
            cmds.push(Command::Translate {
                id,
                offset: translation,
            });
        }
        tracer.parallax(&ParallaxEvent {
            now,
            offset,
            layers: self.parallax.len(),
        });
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration, cmds: &mut Commands) {
        let (token, previous) = self.timers.arm(kind);
        if let Some(previous) = previous {
            cmds.push(Command::CancelTimer(previous));
        }
        cmds.push(Command::ArmTimer { token, delay });
    }
}
