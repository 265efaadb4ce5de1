// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame and timer bindings.
//!
//! Frame requests go through `requestAnimationFrame`; scheduler timers go
//! through `setTimeout` with the packed [`TimerToken`] as the callback
//! argument, so a single long-lived closure serves every timer.

use wasm_bindgen::prelude::*;

use unveil_core::time::{Duration, HostTime};
use unveil_core::timer::TimerToken;

// Global functions bound directly; no `Window` lookup per frame or timer.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    pub(crate) fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    pub(crate) fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout_with_arg(handler: &JsValue, timeout: i32, arg: f64) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    pub(crate) fn clear_timeout(id: i32);
}

/// Arms `handler` to run after `delay` with `token` as its argument.
/// Returns the timeout handle.
pub(crate) fn set_timeout(handler: &JsValue, delay: Duration, token: TimerToken) -> i32 {
    set_timeout_with_arg(handler, timeout_ms(delay), token_to_js(token))
}

/// Rounds up to whole milliseconds so a timer never fires early.
fn timeout_ms(delay: Duration) -> i32 {
    let ms = delay.ticks().div_ceil(1_000);
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// Token bits stay below 2^53, so the round trip through a JS number is
/// exact.
pub(crate) fn token_to_js(token: TimerToken) -> f64 {
    token.to_bits() as f64
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Recovers a token from a timeout argument. Garbage yields `None`.
pub(crate) fn token_from_js(arg: f64) -> Option<TimerToken> {
    if !(arg.is_finite() && (0.0..=MAX_SAFE_INTEGER).contains(&arg)) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "checked finite, non-negative, and within f64 integer range"
    )]
    let bits = arg as u64;
    TimerToken::from_bits(bits)
}

/// Converts a `DOMHighResTimeStamp` to host time.
pub(crate) fn host_time(ms: f64) -> HostTime {
    HostTime::from_millis_f64(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::timer::TimerKind;

    #[test]
    fn tokens_survive_js_numbers() {
        let token = TimerToken {
            kind: TimerKind::ParallaxTrailing,
            generation: u32::MAX,
        };
        assert_eq!(token_from_js(token_to_js(token)), Some(token));
        assert_eq!(token_from_js(f64::NAN), None);
        assert_eq!(token_from_js(-1.0), None);
    }

    #[test]
    fn timeouts_round_up() {
        assert_eq!(timeout_ms(Duration::from_micros(16_001)), 17);
        assert_eq!(timeout_ms(Duration::from_millis(150)), 150);
        assert_eq!(timeout_ms(Duration::ZERO), 0);
    }
}
