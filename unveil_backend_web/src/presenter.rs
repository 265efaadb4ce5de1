// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM presenter.
//!
//! Applies scheduler [`Commands`] to live elements: reveal classes and
//! transition delays, parallax transforms, `requestAnimationFrame` requests,
//! and `setTimeout` timers.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;

use kurbo::Vec2;
use unveil_core::element::{ElementId, REVEALED_CLASS, RevealGroup, STAGGER_PROPERTY};
use unveil_core::host::{Command, Commands, RevealHost};
use unveil_core::time::Duration;
use unveil_core::timer::TimerToken;
use wasm_bindgen::JsValue;

use crate::dom::ElementMap;
use crate::observer::ViewportWatcher;
use crate::raf;

/// Applies [`Commands`] to the document.
///
/// The presenter does not own the frame and timer closures; the driver
/// creates them and hands over their JS handles. At most one animation frame
/// is outstanding at a time.
pub struct DomPresenter {
    map: Rc<ElementMap>,
    watcher: ViewportWatcher,
    frame_callback: JsValue,
    timer_callback: JsValue,
    frame_request: Option<i32>,
    timers: BTreeMap<TimerToken, i32>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("elements", &self.map.len())
            .field("frame_request", &self.frame_request)
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl DomPresenter {
    /// Creates a presenter.
    ///
    /// `frame_callback` must accept a `DOMHighResTimeStamp`; `timer_callback`
    /// receives the packed token as its single argument.
    #[must_use]
    pub fn new(
        map: Rc<ElementMap>,
        watcher: ViewportWatcher,
        frame_callback: JsValue,
        timer_callback: JsValue,
    ) -> Self {
        Self {
            map,
            watcher,
            frame_callback,
            timer_callback,
            frame_request: None,
            timers: BTreeMap::new(),
        }
    }

    /// Returns the viewport watcher.
    #[must_use]
    pub fn watcher(&self) -> &ViewportWatcher {
        &self.watcher
    }

    /// Returns `true` if a frame request is outstanding.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame_request.is_some()
    }

    /// Returns the number of armed timeouts.
    #[must_use]
    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }

    /// Records that the requested frame fired.
    pub fn frame_fired(&mut self) {
        self.frame_request = None;
    }

    /// Records that the timeout for `token` fired.
    pub fn timer_fired(&mut self, token: TimerToken) {
        self.timers.remove(&token);
    }

    /// Cancels the outstanding frame and every timeout, and stops watching.
    pub fn shutdown(&mut self) {
        if let Some(id) = self.frame_request.take() {
            raf::cancel_animation_frame(id);
        }
        for (_, handle) in core::mem::take(&mut self.timers) {
            raf::clear_timeout(handle);
        }
        self.watcher.disconnect();
    }

    fn prepare(&self, id: ElementId, group: RevealGroup, stagger: Option<Duration>) {
        let Some(el) = self.map.get_html(id) else {
            return;
        };
        let _ = el.class_list().add_1(group.pending_class());
        if let Some(stagger) = stagger {
            let _ = el
                .style()
                .set_property(STAGGER_PROPERTY, &stagger_value(stagger));
        }
    }

    fn restore(&self, id: ElementId, group: RevealGroup) {
        let Some(el) = self.map.get_html(id) else {
            return;
        };
        let _ = el.class_list().remove_1(group.pending_class());
        let _ = el.style().remove_property(STAGGER_PROPERTY);
    }

    fn reveal(&self, id: ElementId, delay: Duration) {
        let Some(el) = self.map.get_html(id) else {
            return;
        };
        if let Some(value) = transition_delay_value(delay) {
            let _ = el.style().set_property("transition-delay", &value);
        }
        let _ = el.class_list().add_1(REVEALED_CLASS);
    }

    fn translate(&self, id: ElementId, offset: Vec2) {
        if let Some(el) = self.map.get_html(id) {
            let _ = el
                .style()
                .set_property("transform", &translate_value(offset));
        }
    }

    fn request_frame(&mut self) {
        if self.frame_request.is_none() {
            self.frame_request = Some(raf::request_animation_frame(&self.frame_callback));
        }
    }

    fn arm(&mut self, token: TimerToken, delay: Duration) {
        let handle = raf::set_timeout(&self.timer_callback, delay, token);
        if let Some(old) = self.timers.insert(token, handle) {
            raf::clear_timeout(old);
        }
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(handle) = self.timers.remove(&token) {
            raf::clear_timeout(handle);
        }
    }
}

impl RevealHost for DomPresenter {
    fn apply(&mut self, commands: &Commands) {
        for command in commands {
            match *command {
                Command::Observe(id) => self.watcher.observe(id),
                Command::Unobserve(id) => self.watcher.unobserve(id),
                Command::Prepare {
                    id,
                    group,
                    stagger_delay,
                } => self.prepare(id, group, stagger_delay),
                Command::Restore { id, group } => self.restore(id, group),
                Command::Reveal { id, delay, .. } => self.reveal(id, delay),
                Command::Translate { id, offset } => self.translate(id, offset),
                Command::RequestFrame => self.request_frame(),
                Command::ArmTimer { token, delay } => self.arm(token, delay),
                Command::CancelTimer(token) => self.cancel(token),
            }
        }
    }
}

/// Formats a stagger delay for the [`STAGGER_PROPERTY`] custom property.
fn stagger_value(delay: Duration) -> String {
    format!("{}s", delay.as_millis_f64() / 1_000.0)
}

/// Formats the in-batch delay on top of the element's own stagger delay.
/// A zero delay leaves the stylesheet's value alone.
fn transition_delay_value(delay: Duration) -> Option<String> {
    (!delay.is_zero()).then(|| {
        format!(
            "calc(var({STAGGER_PROPERTY}, 0s) + {}ms)",
            delay.as_millis_f64()
        )
    })
}

fn translate_value(offset: Vec2) -> String {
    format!("translate3d({}px, {}px, 0)", offset.x, offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stagger_is_seconds() {
        assert_eq!(stagger_value(Duration::from_millis(200)), "0.2s");
        assert_eq!(stagger_value(Duration::ZERO), "0s");
    }

    #[test]
    fn batch_delay_adds_to_stagger() {
        assert_eq!(transition_delay_value(Duration::ZERO), None);
        assert_eq!(
            transition_delay_value(Duration::from_millis(40)).as_deref(),
            Some("calc(var(--delay, 0s) + 40ms)")
        );
    }

    #[test]
    fn translation_is_vertical_pixels() {
        assert_eq!(
            translate_value(Vec2::new(0.0, 12.5)),
            "translate3d(0px, 12.5px, 0)"
        );
    }
}
