// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduler, observer, and registration configuration.
//!
//! All configuration types are plain `Copy` structs with `const` presets.
//! Callers start from a preset and overwrite individual fields:
//!
//! ```rust
//! use unveil_core::config::RevealConfig;
//! use unveil_core::time::Duration;
//!
//! let mut config = RevealConfig::web();
//! config.batch_size = 4;
//! config.scroll_quiet = Duration::from_millis(200);
//! ```

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

use crate::time::Duration;

/// Options handed to the host's viewport watcher.
///
/// These are constants for the lifetime of a scheduler; they are never
/// recomputed per element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of an element's area that must be visible (0.0–1.0).
    pub threshold: f64,
    /// Viewport margin inset as fractions of the viewport size, in CSS
    /// order: top, right, bottom, left. Negative values shrink the viewport,
    /// so `bottom = -0.2` fires once an element is 20 % above the fold.
    pub root_margin: [f64; 4],
}

impl ObserverOptions {
    /// Fires early and softly: 5 % visible, bottom edge pulled in by 20 %.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            threshold: 0.05,
            root_margin: [0.0, 0.0, -0.2, 0.0],
        }
    }
}

impl ObserverOptions {
    /// Returns `viewport` grown (or shrunk, for negative margins) by
    /// [`root_margin`](Self::root_margin).
    #[must_use]
    pub fn root(&self, viewport: Rect) -> Rect {
        let [top, right, bottom, left] = self.root_margin;
        let (w, h) = (viewport.width(), viewport.height());
        Rect::new(
            viewport.x0 - left * w,
            viewport.y0 - top * h,
            viewport.x1 + right * w,
            viewport.y1 + bottom * h,
        )
    }

    /// Returns the fraction of `bounds` inside the margin-adjusted viewport.
    /// Zero-area elements report zero.
    #[must_use]
    pub fn intersection_ratio(&self, bounds: Rect, viewport: Rect) -> f64 {
        let area = bounds.area();
        if area <= 0.0 {
            return 0.0;
        }
        bounds.intersect(self.root(viewport)).area() / area
    }

    /// Returns `true` if `bounds` counts as visible in `viewport`.
    #[must_use]
    pub fn is_visible(&self, bounds: Rect, viewport: Rect) -> bool {
        let ratio = self.intersection_ratio(bounds, viewport);
        ratio > 0.0 && ratio >= self.threshold
    }

    /// Formats [`root_margin`](Self::root_margin) as a CSS margin string,
    /// e.g. `"0% 0% -20% 0%"`.
    #[must_use]
    pub fn root_margin_css(&self) -> String {
        let [top, right, bottom, left] = self.root_margin.map(|m| m * 100.0);
        format!("{top}% {right}% {bottom}% {left}%")
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::web()
    }
}

/// Configuration for the [`RevealScheduler`](crate::scheduler::RevealScheduler).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    /// Maximum number of reveals applied in a single frame callback.
    pub batch_size: usize,
    /// Delay between the end of one batch and the frame request for the
    /// next. Zero requests the next frame immediately.
    pub batch_gap: Duration,
    /// Delay added per position inside a batch, so a batch reveals
    /// sequentially rather than all at once.
    pub reveal_stagger: Duration,
    /// Quiet period after the last scroll event before draining resumes.
    pub scroll_quiet: Duration,
    /// Quiet period after the last wheel event before the wheel gesture ends.
    pub wheel_quiet: Duration,
    /// Minimum spacing between parallax updates.
    pub parallax_interval: Duration,
    /// Per-index parallax speed constant `k` (`offset = index × k × scroll`).
    pub parallax_factor: f64,
    /// Scroll deltas smaller than this (in px) skip the parallax update,
    /// unless the page is back at the top.
    pub min_scroll_delta: f64,
    /// Delay after start before the one-time initial viewport check.
    pub initial_check_delay: Duration,
    /// Options forwarded to the viewport watcher.
    pub observer: ObserverOptions,
}

impl RevealConfig {
    /// Default configuration for pointer-driven browsers.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            batch_size: 3,
            batch_gap: Duration::from_millis(20),
            reveal_stagger: Duration::from_millis(20),
            scroll_quiet: Duration::from_millis(150),
            wheel_quiet: Duration::from_millis(200),
            parallax_interval: Duration::from_millis(16),
            parallax_factor: 0.1,
            min_scroll_delta: 1.5,
            initial_check_delay: Duration::from_millis(200),
            observer: ObserverOptions::web(),
        }
    }

    /// Configuration for touch devices, where momentum scrolling keeps
    /// emitting events well after the finger lifts.
    #[must_use]
    pub const fn touch() -> Self {
        let mut config = Self::web();
        config.scroll_quiet = Duration::from_millis(300);
        config.parallax_interval = Duration::from_millis(32);
        config
    }

    /// Returns the batch size, never less than one.
    #[inline]
    #[must_use]
    pub const fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 {
            1
        } else {
            self.batch_size
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Per-call options for
/// [`RevealScheduler::register_group`](crate::scheduler::RevealScheduler::register_group).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupOptions {
    /// Skip elements that already have a registered ancestor.
    pub skip_nested: bool,
    /// When set, each element gets a stagger delay of
    /// `stagger_index × stagger_step`.
    pub stagger_step: Option<Duration>,
}

impl GroupOptions {
    /// Options for top-level groups: register everything, no stagger.
    #[must_use]
    pub const fn top_level() -> Self {
        Self {
            skip_nested: false,
            stagger_step: None,
        }
    }

    /// Options for groups that may nest inside already registered containers.
    #[must_use]
    pub const fn nested() -> Self {
        Self {
            skip_nested: true,
            stagger_step: None,
        }
    }

    /// Returns these options with a per-index stagger step.
    #[must_use]
    pub const fn with_stagger(mut self, step: Duration) -> Self {
        self.stagger_step = Some(step);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_margin_pulls_the_bottom_edge_up() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let opts = ObserverOptions::web();
        assert_eq!(opts.root(viewport), Rect::new(0.0, 0.0, 1000.0, 640.0));
        let below_fold_line = Rect::new(0.0, 700.0, 100.0, 780.0);
        assert!(
            !opts.is_visible(below_fold_line, viewport),
            "inside the viewport but under the margin"
        );
        let straddling = Rect::new(0.0, 620.0, 100.0, 820.0);
        assert!((opts.intersection_ratio(straddling, viewport) - 0.1).abs() < 1e-9);
        assert!(opts.is_visible(straddling, viewport), "10% beats the 5% threshold");
    }

    #[test]
    fn zero_area_is_never_visible() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let line = Rect::new(0.0, 10.0, 100.0, 10.0);
        assert!(!ObserverOptions::web().is_visible(line, viewport));
    }

    #[test]
    fn root_margin_css() {
        assert_eq!(ObserverOptions::web().root_margin_css(), "0% 0% -20% 0%");
    }

    #[test]
    fn touch_preset_waits_longer() {
        let web = RevealConfig::web();
        let touch = RevealConfig::touch();
        assert!(touch.scroll_quiet > web.scroll_quiet, "momentum scrolling");
        assert_eq!(touch.batch_size, web.batch_size);
    }

    #[test]
    fn zero_batch_size_is_promoted_to_one() {
        let mut config = RevealConfig::web();
        config.batch_size = 0;
        assert_eq!(config.effective_batch_size(), 1);
    }

    #[test]
    fn group_options_builders() {
        let opts = GroupOptions::top_level().with_stagger(Duration::from_millis(200));
        assert!(!opts.skip_nested);
        assert_eq!(opts.stagger_step, Some(Duration::from_millis(200)));
        assert!(GroupOptions::nested().skip_nested);
    }
}
