// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary recording of scheduler events.
//!
//! [`RecorderSink`] appends one tagged little-endian record per event to an
//! in-memory buffer, cheap enough to leave on while scrolling. [`decode`]
//! turns a buffer back into [`RecordedEvent`]s for inspection or export.

use unveil_core::element::{ElementId, RevealGroup};
use unveil_core::time::{Duration, HostTime};
use unveil_core::timer::TimerToken;
use unveil_core::trace::{
    BatchEvent, DeferredEvent, EnqueuedEvent, ParallaxEvent, RegisteredEvent, RevealedEvent,
    ScrollStateEvent, TimerEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_REGISTERED: u8 = 1;
const TAG_ENQUEUED: u8 = 2;
const TAG_DEFERRED: u8 = 3;
const TAG_BATCH: u8 = 4;
const TAG_REVEALED: u8 = 5;
const TAG_SCROLL_STATE: u8 = 6;
const TAG_PARALLAX: u8 = 7;
const TAG_TIMER: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// Records scheduler events into a byte buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    /// Counts are capped at `u32::MAX`.
    fn write_count(&mut self, v: usize) {
        self.write_u32(u32::try_from(v).unwrap_or(u32::MAX));
    }

    fn write_group(&mut self, g: RevealGroup) {
        let index = RevealGroup::ALL.iter().position(|&a| a == g).unwrap_or(0);
        self.write_u8(u8::try_from(index).unwrap_or(0));
    }
}

impl TraceSink for RecorderSink {
    fn on_registered(&mut self, e: &RegisteredEvent) {
        self.write_u8(TAG_REGISTERED);
        self.write_u32(e.id.0);
        self.write_group(e.group);
        self.write_u32(e.stagger_index);
    }

    fn on_enqueued(&mut self, e: &EnqueuedEvent) {
        self.write_u8(TAG_ENQUEUED);
        self.write_u32(e.id.0);
        self.write_count(e.queue_len);
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        self.write_u8(TAG_DEFERRED);
        self.write_count(e.queued);
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        self.write_u8(TAG_BATCH);
        self.write_u64(e.now.ticks());
        self.write_u64(e.batch_index);
        self.write_count(e.size);
        self.write_count(e.remaining);
    }

    fn on_revealed(&mut self, e: &RevealedEvent) {
        self.write_u8(TAG_REVEALED);
        self.write_u32(e.id.0);
        self.write_group(e.group);
        self.write_u64(e.delay.ticks());
        self.write_u64(e.batch_index);
    }

    fn on_scroll_state(&mut self, e: &ScrollStateEvent) {
        self.write_u8(TAG_SCROLL_STATE);
        self.write_u64(e.now.ticks());
        self.write_u8(u8::from(e.scrolling));
        self.write_f64(e.offset);
    }

    fn on_parallax(&mut self, e: &ParallaxEvent) {
        self.write_u8(TAG_PARALLAX);
        self.write_u64(e.now.ticks());
        self.write_f64(e.offset);
        self.write_count(e.layers);
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        self.write_u8(TAG_TIMER);
        self.write_u64(e.now.ticks());
        self.write_u64(e.token.to_bits());
        self.write_u8(u8::from(e.stale));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// One event read back from a recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`RegisteredEvent`].
    Registered(RegisteredEvent),
    /// An [`EnqueuedEvent`].
    Enqueued(EnqueuedEvent),
    /// A [`DeferredEvent`].
    Deferred(DeferredEvent),
    /// A [`BatchEvent`].
    Batch(BatchEvent),
    /// A [`RevealedEvent`].
    Revealed(RevealedEvent),
    /// A [`ScrollStateEvent`].
    ScrollState(ScrollStateEvent),
    /// A [`ParallaxEvent`].
    Parallax(ParallaxEvent),
    /// A [`TimerEvent`].
    Timer(TimerEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Yields events from a recording until the bytes run out.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_group(&mut self) -> Option<RevealGroup> {
        RevealGroup::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_registered(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Registered(RegisteredEvent {
            id: ElementId(self.read_u32()?),
            group: self.read_group()?,
            stagger_index: self.read_u32()?,
        }))
    }

    fn decode_enqueued(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Enqueued(EnqueuedEvent {
            id: ElementId(self.read_u32()?),
            queue_len: self.read_count()?,
        }))
    }

    fn decode_deferred(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Deferred(DeferredEvent {
            queued: self.read_count()?,
        }))
    }

    fn decode_batch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Batch(BatchEvent {
            now: HostTime(self.read_u64()?),
            batch_index: self.read_u64()?,
            size: self.read_count()?,
            remaining: self.read_count()?,
        }))
    }

    fn decode_revealed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Revealed(RevealedEvent {
            id: ElementId(self.read_u32()?),
            group: self.read_group()?,
            delay: Duration(self.read_u64()?),
            batch_index: self.read_u64()?,
        }))
    }

    fn decode_scroll_state(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ScrollState(ScrollStateEvent {
            now: HostTime(self.read_u64()?),
            scrolling: self.read_u8()? != 0,
            offset: self.read_f64()?,
        }))
    }

    fn decode_parallax(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Parallax(ParallaxEvent {
            now: HostTime(self.read_u64()?),
            offset: self.read_f64()?,
            layers: self.read_count()?,
        }))
    }

    fn decode_timer(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Timer(TimerEvent {
            now: HostTime(self.read_u64()?),
            token: TimerToken::from_bits(self.read_u64()?)?,
            stale: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_REGISTERED => self.decode_registered(),
            TAG_ENQUEUED => self.decode_enqueued(),
            TAG_DEFERRED => self.decode_deferred(),
            TAG_BATCH => self.decode_batch(),
            TAG_REVEALED => self.decode_revealed(),
            TAG_SCROLL_STATE => self.decode_scroll_state(),
            TAG_PARALLAX => self.decode_parallax(),
            TAG_TIMER => self.decode_timer(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::timer::TimerKind;

    #[test]
    fn recording_preserves_order_and_fields() {
        let mut rec = RecorderSink::new();
        let revealed = RevealedEvent {
            id: ElementId(9),
            group: RevealGroup::TextReveal,
            delay: Duration::from_millis(20),
            batch_index: 1,
        };
        let timer = TimerEvent {
            now: HostTime(170_000),
            token: TimerToken {
                kind: TimerKind::BatchGap,
                generation: 12,
            },
            stale: false,
        };
        rec.on_deferred(&DeferredEvent { queued: 5 });
        rec.on_revealed(&revealed);
        rec.on_timer(&timer);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Deferred(DeferredEvent { queued: 5 }),
                RecordedEvent::Revealed(revealed),
                RecordedEvent::Timer(timer),
            ]
        );
    }

    #[test]
    fn scroll_offsets_keep_full_precision() {
        let mut rec = RecorderSink::new();
        rec.on_scroll_state(&ScrollStateEvent {
            now: HostTime(1),
            scrolling: true,
            offset: 1234.5678,
        });
        let Some(RecordedEvent::ScrollState(e)) = decode(rec.as_bytes()).next() else {
            panic!("expected ScrollState");
        };
        assert!(e.scrolling, "flag survives");
        assert_eq!(e.offset.to_bits(), 1234.5678_f64.to_bits());
    }

    #[test]
    fn truncated_buffer_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_batch(&BatchEvent {
            now: HostTime(16_000),
            batch_index: 0,
            size: 3,
            remaining: 0,
        });
        rec.on_batch(&BatchEvent {
            now: HostTime(48_000),
            batch_index: 1,
            size: 2,
            remaining: 0,
        });
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1, "the partial record is dropped");
    }

    #[test]
    fn scheduler_run_lands_in_the_recording() {
        use kurbo::Size;
        use unveil_core::config::{GroupOptions, RevealConfig};
        use unveil_core::host::HostSignals;
        use unveil_core::scheduler::{Event, RevealScheduler};
        use unveil_core::trace::Tracer;
        use unveil_harness::SimTree;

        let mut tree = SimTree::new(Size::new(1280.0, 800.0));
        let ids = tree.add_column(&[".card"], 0.0, 100.0, 10.0, 5);
        let mut scheduler = RevealScheduler::init(RevealConfig::web(), HostSignals::CAPABLE);
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            let _ = scheduler.register_group_traced(
                &tree,
                &[".card"],
                RevealGroup::Container,
                GroupOptions::top_level(),
                &mut tracer,
            );
            for &id in &ids {
                let _ = scheduler.handle_traced(Event::Visibility { id, visible: true }, &mut tracer);
            }
            let _ = scheduler.handle_traced(
                Event::Frame {
                    now: HostTime(16_000),
                },
                &mut tracer,
            );
        }

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let count = |f: fn(&RecordedEvent) -> bool| events.iter().filter(|e| f(e)).count();
        assert_eq!(count(|e| matches!(e, RecordedEvent::Registered(_))), 5, "one per card");
        assert_eq!(count(|e| matches!(e, RecordedEvent::Enqueued(_))), 5, "all visible");
        assert_eq!(count(|e| matches!(e, RecordedEvent::Revealed(_))), 3, "one batch of three");
        let batches: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Batch(b) => Some(*b),
                _ => None,
            })
            .collect();
        assert_eq!(
            batches,
            [BatchEvent {
                now: HostTime(16_000),
                batch_index: 0,
                size: 3,
                remaining: 2,
            }],
            "first frame drains one batch"
        );
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xFF, 0, 0, 0]).count(), 0);
    }
}
