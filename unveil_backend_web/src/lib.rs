// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for unveil.
//!
//! This crate connects [`unveil_core`] to browser APIs:
//!
//! - [`RevealDriver`]: owns the scheduler and wires `scroll`, `wheel`,
//!   `requestAnimationFrame`, `setTimeout`, and `IntersectionObserver`
//!   callbacks into it
//! - [`DomPresenter`]: applies scheduler commands to DOM elements
//! - [`ViewportWatcher`]: `IntersectionObserver` wrapper
//! - [`DomTree`]: [`ElementTree`] over the live document
//! - [`ConsoleSink`]: trace output to the browser console
//! - [`effects`]: click sound, menu, accordions, micro-interactions, and
//!   smooth anchor scrolling
//!
//! # Usage
//!
//! ```rust,ignore
//! let window = web_sys::window().ok_or(SetupError::NoWindow)?;
//! let driver = RevealDriver::start(&window, RevealConfig::web(), GROUPS, PARALLAX)?;
//! core::mem::forget(driver);
//! ```

#![no_std]

extern crate alloc;

mod console;
mod dom;
mod driver;
pub mod effects;
mod error;
mod observer;
mod presenter;
mod raf;

pub use console::ConsoleSink;
pub use dom::{DomTree, ElementMap, ID_ATTRIBUTE, matches_any};
pub use driver::{GroupSpec, RevealDriver};
pub use error::SetupError;
pub use observer::ViewportWatcher;
pub use presenter::DomPresenter;
pub use unveil_core::host::{ElementTree, HostSignals, RevealHost};

use unveil_core::time::HostTime;
use wasm_bindgen::JsValue;
use web_sys::Window;

/// Media query matched when the user asks for less motion.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    raf::host_time(raf::performance_now())
}

/// Returns `true` if the user prefers reduced motion. A failing media query
/// counts as no preference.
#[must_use]
pub fn prefers_reduced_motion(window: &Window) -> bool {
    matches!(window.match_media(REDUCED_MOTION_QUERY), Ok(Some(list)) if list.matches())
}

/// Reads the [`HostSignals`] for `window`.
#[must_use]
pub fn host_signals(window: &Window) -> HostSignals {
    HostSignals {
        reduced_motion: prefers_reduced_motion(window),
        viewport_watching: js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false),
    }
}
