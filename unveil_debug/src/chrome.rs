// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Events recorded without a timestamp (registration, enqueue, deferral,
/// reveal) inherit the most recent timestamp seen before them.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut ts: u64 = 0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Registered(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Registered",
                    "cat": "Registry",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "id": e.id.0,
                        "group": e.group.as_str(),
                        "stagger_index": e.stagger_index,
                    }
                }));
            }
            RecordedEvent::Enqueued(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Enqueued",
                    "cat": "Queue",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "id": e.id.0,
                        "queue_len": e.queue_len,
                    }
                }));
            }
            RecordedEvent::Deferred(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Deferred",
                    "cat": "Queue",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "queued": e.queued,
                    }
                }));
            }
            RecordedEvent::Batch(e) => {
                ts = e.now.ticks();
                events.push(json!({
                    "ph": "i",
                    "name": "Batch",
                    "cat": "Drain",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "batch_index": e.batch_index,
                        "size": e.size,
                        "remaining": e.remaining,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "queue",
                    "ts": ts,
                    "pid": 0,
                    "args": { "remaining": e.remaining }
                }));
            }
            RecordedEvent::Revealed(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": format!("Reveal {}", e.id.0),
                    "cat": "Drain",
                    "ts": ts,
                    "dur": e.delay.ticks(),
                    "pid": 0,
                    "tid": 1,
                    "args": {
                        "group": e.group.as_str(),
                        "batch_index": e.batch_index,
                    }
                }));
            }
            RecordedEvent::ScrollState(e) => {
                ts = e.now.ticks();
                let ph = if e.scrolling { "B" } else { "E" };
                events.push(json!({
                    "ph": ph,
                    "name": "Scrolling",
                    "cat": "Scroll",
                    "ts": ts,
                    "pid": 0,
                    "tid": 2,
                    "args": {
                        "offset": e.offset,
                    }
                }));
            }
            RecordedEvent::Parallax(e) => {
                ts = e.now.ticks();
                events.push(json!({
                    "ph": "C",
                    "name": "scroll_offset",
                    "ts": ts,
                    "pid": 0,
                    "args": { "offset": e.offset }
                }));
            }
            RecordedEvent::Timer(e) => {
                ts = e.now.ticks();
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.token.kind),
                    "cat": "Timer",
                    "ts": ts,
                    "pid": 0,
                    "tid": 3,
                    "s": "t",
                    "args": {
                        "generation": e.token.generation,
                        "stale": e.stale,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use unveil_core::time::HostTime;
    use unveil_core::trace::{BatchEvent, ScrollStateEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_scroll_state(&ScrollStateEvent {
            now: HostTime(1_000),
            scrolling: true,
            offset: 10.0,
        });
        rec.on_scroll_state(&ScrollStateEvent {
            now: HostTime(151_000),
            scrolling: false,
            offset: 80.0,
        });
        rec.on_batch(&BatchEvent {
            now: HostTime(160_000),
            batch_index: 0,
            size: 1,
            remaining: 0,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4, "batch adds an instant and a counter");
        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[1]["ph"], "E");
        assert_eq!(parsed[1]["ts"], 151_000);
        assert_eq!(parsed[2]["name"], "Batch");
        assert_eq!(parsed[3]["ph"], "C");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "no events, empty array");
    }
}
