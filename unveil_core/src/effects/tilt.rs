// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-driven card tilt.
//!
//! The target rotation is proportional to the pointer's distance from the
//! card's center; each update moves the current rotation a fixed fraction of
//! the way toward the target.

use alloc::format;
use alloc::string::String;

use kurbo::{Point, Rect};

/// Pixels of pointer offset per degree of rotation.
pub const TILT_DIVISOR: f64 = 30.0;

/// Fraction of the remaining distance covered per update.
pub const TILT_SMOOTHING: f64 = 0.3;

/// Rotation about the X and Y axes, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    /// Rotation about the horizontal axis.
    pub rotate_x: f64,
    /// Rotation about the vertical axis.
    pub rotate_y: f64,
}

impl Tilt {
    /// Formats the CSS transform for this tilt.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) translate3d(0, -4px, 0)",
            self.rotate_x, self.rotate_y
        )
    }
}

/// Smoothed tilt state for one card.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardTilt {
    current: Tilt,
}

impl CardTilt {
    /// Creates an untilted card.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current rotation.
    #[must_use]
    pub fn current(&self) -> Tilt {
        self.current
    }

    /// Returns the rotation the card is heading for with the pointer at
    /// `pointer` over a card occupying `card` (both in the same space).
    #[must_use]
    pub fn target(card: Rect, pointer: Point) -> Tilt {
        let local = pointer - card.origin();
        let center = card.size() / 2.0;
        Tilt {
            rotate_x: (local.y - center.height) / TILT_DIVISOR,
            rotate_y: (center.width - local.x) / TILT_DIVISOR,
        }
    }

    /// Moves toward the target for `pointer` and returns the new rotation.
    pub fn track(&mut self, card: Rect, pointer: Point) -> Tilt {
        let target = Self::target(card, pointer);
        self.current.rotate_x += (target.rotate_x - self.current.rotate_x) * TILT_SMOOTHING;
        self.current.rotate_y += (target.rotate_y - self.current.rotate_y) * TILT_SMOOTHING;
        self.current
    }

    /// Returns to rest.
    pub fn reset(&mut self) {
        self.current = Tilt::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: Rect = Rect::new(100.0, 100.0, 400.0, 300.0);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn center_has_no_tilt() {
        assert_eq!(CardTilt::target(CARD, Point::new(250.0, 200.0)), Tilt::default());
    }

    #[test]
    fn corners_tilt_toward_the_pointer() {
        let t = CardTilt::target(CARD, Point::new(100.0, 100.0));
        assert!(close(t.rotate_x, -100.0 / 30.0), "top edge tips back");
        assert!(close(t.rotate_y, 150.0 / 30.0), "left edge turns left");
    }

    #[test]
    fn tracking_is_smoothed() {
        let mut tilt = CardTilt::new();
        let pointer = Point::new(400.0, 300.0);
        let first = tilt.track(CARD, pointer);
        assert!(close(first.rotate_x, 0.3 * 100.0 / 30.0), "30% of the way");
        let second = tilt.track(CARD, pointer);
        assert!(close(second.rotate_x, 0.51 * 100.0 / 30.0), "51% after two updates");
        assert!(
            tilt.current().css_transform().ends_with("translate3d(0, -4px, 0)"),
            "lifted while tilted"
        );
        tilt.reset();
        assert_eq!(tilt.current(), Tilt::default());
    }
}
