// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the reveal scheduler.
//!
//! This module provides a [`TraceSink`] trait with one method per scheduler
//! event. All method bodies default to no-ops, so implementing only the events
//! you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: Enables the `Tracer` method bodies (one branch per call).

use crate::element::{ElementId, RevealGroup};
use crate::time::{Duration, HostTime};
use crate::timer::TimerToken;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an element is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisteredEvent {
    /// The element.
    pub id: ElementId,
    /// Its reveal group.
    pub group: RevealGroup,
    /// Ordinal among matches of the same selector.
    pub stagger_index: u32,
}

/// Emitted when a visible element joins the reveal queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnqueuedEvent {
    /// The element.
    pub id: ElementId,
    /// Queue length after the push.
    pub queue_len: usize,
}

/// Emitted when draining is paused because the page is scrolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredEvent {
    /// Elements waiting when the drain was deferred.
    pub queued: usize,
}

/// Emitted for each drained batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchEvent {
    /// Frame callback time.
    pub now: HostTime,
    /// Monotonic batch counter.
    pub batch_index: u64,
    /// Elements revealed in this batch.
    pub size: usize,
    /// Elements still queued afterwards.
    pub remaining: usize,
}

/// Emitted for each revealed element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealedEvent {
    /// The element.
    pub id: ElementId,
    /// Its reveal group.
    pub group: RevealGroup,
    /// In-batch transition delay.
    pub delay: Duration,
    /// Batch the reveal belongs to.
    pub batch_index: u64,
}

/// Emitted when the scroll state flips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollStateEvent {
    /// Event time.
    pub now: HostTime,
    /// New state.
    pub scrolling: bool,
    /// Most recent scroll offset.
    pub offset: f64,
}

/// Emitted for each applied parallax update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxEvent {
    /// Update time.
    pub now: HostTime,
    /// Scroll offset used.
    pub offset: f64,
    /// Number of layers translated.
    pub layers: usize,
}

/// Emitted when a timer firing is processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    /// Firing time.
    pub now: HostTime,
    /// The token delivered by the host.
    pub token: TimerToken,
    /// The firing belonged to a superseded arming and was ignored.
    pub stale: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scheduler.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when an element is registered.
    fn on_registered(&mut self, e: &RegisteredEvent) {
        _ = e;
    }

    /// Called when an element is queued for reveal.
    fn on_enqueued(&mut self, e: &EnqueuedEvent) {
        _ = e;
    }

    /// Called when draining is deferred by scrolling.
    fn on_deferred(&mut self, e: &DeferredEvent) {
        _ = e;
    }

    /// Called after each drained batch.
    fn on_batch(&mut self, e: &BatchEvent) {
        _ = e;
    }

    /// Called for each revealed element.
    fn on_revealed(&mut self, e: &RevealedEvent) {
        _ = e;
    }

    /// Called when scrolling starts or settles.
    fn on_scroll_state(&mut self, e: &ScrollStateEvent) {
        _ = e;
    }

    /// Called after each parallax update.
    fn on_parallax(&mut self, e: &ParallaxEvent) {
        _ = e;
    }

    /// Called for each timer firing.
    fn on_timer(&mut self, e: &TimerEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a forwarding method on [`Tracer`].
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $method:ident($ty:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`RegisteredEvent`].
        registered => on_registered(RegisteredEvent)
    );
    forward!(
        /// Emits an [`EnqueuedEvent`].
        enqueued => on_enqueued(EnqueuedEvent)
    );
    forward!(
        /// Emits a [`DeferredEvent`].
        deferred => on_deferred(DeferredEvent)
    );
    forward!(
        /// Emits a [`BatchEvent`].
        batch => on_batch(BatchEvent)
    );
    forward!(
        /// Emits a [`RevealedEvent`].
        revealed => on_revealed(RevealedEvent)
    );
    forward!(
        /// Emits a [`ScrollStateEvent`].
        scroll_state => on_scroll_state(ScrollStateEvent)
    );
    forward!(
        /// Emits a [`ParallaxEvent`].
        parallax => on_parallax(ParallaxEvent)
    );
    forward!(
        /// Emits a [`TimerEvent`].
        timer => on_timer(TimerEvent)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> BatchEvent {
        BatchEvent {
            now: HostTime(16_000),
            batch_index: 0,
            size: 3,
            remaining: 2,
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_batch(&sample_batch());
        sink.on_deferred(&DeferredEvent { queued: 4 });
        sink.on_scroll_state(&ScrollStateEvent {
            now: HostTime(0),
            scrolling: true,
            offset: 12.0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.batch(&sample_batch());
        tracer.deferred(&DeferredEvent { queued: 1 });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct BatchSizes {
            sizes: Vec<usize>,
        }
        impl TraceSink for BatchSizes {
            fn on_batch(&mut self, e: &BatchEvent) {
                self.sizes.push(e.size);
            }
        }

        let mut sink = BatchSizes { sizes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.batch(&sample_batch());
        drop(tracer);
        assert_eq!(sink.sizes, [3]);
    }
}
