// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-linked parallax layers.
//!
//! A layer's speed is `index × k`, so the offset applied at scroll position
//! `s` is the pure function
//!
//! ```text
//! offset(layer_i, s) = i × k × s
//! ```
//!
//! There is no easing or integration over time: recomputing with the same
//! inputs always yields the same translation.

use alloc::vec::Vec;

use kurbo::Vec2;

use crate::element::ElementId;

/// Returns the vertical translation of layer `index` at scroll offset
/// `scroll` with speed constant `k`.
#[inline]
#[must_use]
pub fn parallax_offset(index: usize, k: f64, scroll: f64) -> Vec2 {
    Vec2::new(0.0, index as f64 * k * scroll)
}

/// Ordered set of parallax layers.
#[derive(Clone, Debug, Default)]
pub struct ParallaxLayers {
    layers: Vec<ElementId>,
    last_applied: Option<f64>,
}

impl ParallaxLayers {
    /// Creates an empty layer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer unless it is already present. Returns its index.
    pub fn push(&mut self, id: ElementId) -> usize {
        if let Some(i) = self.layers.iter().position(|&l| l == id) {
            return i;
        }
        self.layers.push(id);
        self.layers.len() - 1
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns `true` if moving to `scroll` is worth an update.
    ///
    /// Sub-`min_delta` moves are skipped, except that returning to the top
    /// (offset ≤ 0) always updates so layers come to rest exactly.
    #[must_use]
    pub fn needs_update(&self, scroll: f64, min_delta: f64) -> bool {
        match self.last_applied {
            None => true,
            Some(last) => (scroll - last).abs() >= min_delta || (scroll <= 0.0 && last != scroll),
        }
    }

    /// Computes every layer's translation at `scroll` and records `scroll` as
    /// applied.
    pub fn update(&mut self, k: f64, scroll: f64) -> impl Iterator<Item = (ElementId, Vec2)> + '_ {
        self.last_applied = Some(scroll);
        self.layers
            .iter()
            .enumerate()
            .map(move |(i, &id)| (id, parallax_offset(i, k, scroll)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_index_times_k_times_scroll() {
        assert_eq!(parallax_offset(0, 0.1, 500.0), Vec2::new(0.0, 0.0));
        assert_eq!(parallax_offset(3, 0.5, 200.0), Vec2::new(0.0, 300.0));
        assert_eq!(
            parallax_offset(2, 0.25, 80.0),
            parallax_offset(2, 0.25, 80.0),
            "deterministic"
        );
    }

    #[test]
    fn duplicate_layers_keep_their_index() {
        let mut layers = ParallaxLayers::new();
        assert_eq!(layers.push(ElementId(4)), 0);
        assert_eq!(layers.push(ElementId(8)), 1);
        assert_eq!(layers.push(ElementId(4)), 0);
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn small_deltas_are_skipped() {
        let mut layers = ParallaxLayers::new();
        layers.push(ElementId(0));
        assert!(layers.needs_update(100.0, 1.5), "first update");
        let _ = layers.update(0.1, 100.0).count();
        assert!(!layers.needs_update(101.0, 1.5));
        assert!(layers.needs_update(102.0, 1.5));
        let _ = layers.update(0.1, 1.0).count();
        assert!(layers.needs_update(0.0, 1.5), "returning to the top");
    }

    #[test]
    fn update_reports_every_layer() {
        let mut layers = ParallaxLayers::new();
        layers.push(ElementId(10));
        layers.push(ElementId(11));
        layers.push(ElementId(12));
        let offsets: Vec<_> = layers.update(0.5, 40.0).collect();
        assert_eq!(
            offsets,
            [
                (ElementId(10), Vec2::new(0.0, 0.0)),
                (ElementId(11), Vec2::new(0.0, 20.0)),
                (ElementId(12), Vec2::new(0.0, 40.0)),
            ]
        );
    }
}
