// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in milliseconds.

use std::io::Write;

use unveil_core::time::HostTime;
use unveil_core::trace::{
    BatchEvent, DeferredEvent, EnqueuedEvent, ParallaxEvent, RegisteredEvent, RevealedEvent,
    ScrollStateEvent, TimerEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.as_millis_f64()
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_registered(&mut self, e: &RegisteredEvent) {
        let _ = writeln!(
            self.writer,
            "[register] {:?} group={} index={}",
            e.id,
            e.group.as_str(),
            e.stagger_index,
        );
    }

    fn on_enqueued(&mut self, e: &EnqueuedEvent) {
        let _ = writeln!(self.writer, "[enqueue] {:?} queue={}", e.id, e.queue_len);
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        let _ = writeln!(self.writer, "[defer] scrolling, queued={}", e.queued);
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        let _ = writeln!(
            self.writer,
            "[batch] #{} at {:.1}ms size={} remaining={}",
            e.batch_index,
            ms(e.now),
            e.size,
            e.remaining,
        );
    }

    fn on_revealed(&mut self, e: &RevealedEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal] {:?} group={} delay={:.1}ms batch={}",
            e.id,
            e.group.as_str(),
            e.delay.as_millis_f64(),
            e.batch_index,
        );
    }

    fn on_scroll_state(&mut self, e: &ScrollStateEvent) {
        let state = if e.scrolling { "start" } else { "settle" };
        let _ = writeln!(
            self.writer,
            "[scroll:{state}] at {:.1}ms offset={:.1}px",
            ms(e.now),
            e.offset,
        );
    }

    fn on_parallax(&mut self, e: &ParallaxEvent) {
        let _ = writeln!(
            self.writer,
            "[parallax] at {:.1}ms offset={:.1}px layers={}",
            ms(e.now),
            e.offset,
            e.layers,
        );
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        let stale = if e.stale { " STALE" } else { "" };
        let _ = writeln!(
            self.writer,
            "[timer] {:?}#{} at {:.1}ms{stale}",
            e.token.kind,
            e.token.generation,
            ms(e.now),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::element::{ElementId, RevealGroup};
    use unveil_core::time::Duration;
    use unveil_core::timer::{TimerKind, TimerToken};

    #[test]
    fn pretty_print_reveal() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_revealed(&RevealedEvent {
            id: ElementId(4),
            group: RevealGroup::ImageReveal,
            delay: Duration::from_millis(40),
            batch_index: 2,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[reveal]"), "got: {output}");
        assert!(output.contains("delay=40.0ms"), "got: {output}");
        assert!(output.contains("batch=2"), "got: {output}");
    }

    #[test]
    fn stale_timers_are_flagged() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_timer(&TimerEvent {
            now: HostTime(150_000),
            token: TimerToken {
                kind: TimerKind::ScrollQuiet,
                generation: 3,
            },
            stale: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("ScrollQuiet#3"), "got: {output}");
        assert!(output.trim_end().ends_with("STALE"), "got: {output}");
    }
}
