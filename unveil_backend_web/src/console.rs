// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;
use alloc::string::String;

use unveil_core::trace::{
    BatchEvent, DeferredEvent, EnqueuedEvent, RevealedEvent, ScrollStateEvent, TimerEvent,
    TraceSink,
};
use wasm_bindgen::JsValue;

/// Logs scheduler activity with `console.log`.
///
/// Registration and parallax ticks are left out; they fire too often to be
/// useful in the console.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    /// Also log each revealed element, not only batch summaries.
    pub per_element: bool,
}

impl ConsoleSink {
    /// Creates a sink that logs batch summaries.
    #[must_use]
    pub const fn new() -> Self {
        Self { per_element: false }
    }

    /// Creates a sink that also logs every revealed element.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { per_element: true }
    }
}

fn log(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

fn batch_line(e: &BatchEvent) -> String {
    format!(
        "[unveil] batch #{} at {:.1}ms: {} revealed, {} left",
        e.batch_index,
        e.now.as_millis_f64(),
        e.size,
        e.remaining
    )
}

fn scroll_line(e: &ScrollStateEvent) -> String {
    let state = if e.scrolling { "started" } else { "settled" };
    format!("[unveil] scroll {state} at y={}", e.offset)
}

impl TraceSink for ConsoleSink {
    fn on_enqueued(&mut self, e: &EnqueuedEvent) {
        if self.per_element {
            log(&format!("[unveil] queued {:?} ({} waiting)", e.id, e.queue_len));
        }
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        log(&format!("[unveil] deferred while scrolling, {} queued", e.queued));
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        log(&batch_line(e));
    }

    fn on_revealed(&mut self, e: &RevealedEvent) {
        if self.per_element {
            log(&format!(
                "[unveil] revealed {:?} ({}) +{}ms",
                e.id,
                e.group.as_str(),
                e.delay.as_millis_f64()
            ));
        }
    }

    fn on_scroll_state(&mut self, e: &ScrollStateEvent) {
        log(&scroll_line(e));
    }

    fn on_timer(&mut self, e: &TimerEvent) {
        if e.stale && self.per_element {
            log(&format!("[unveil] stale {:?} timer ignored", e.token.kind));
        }
    }
}
