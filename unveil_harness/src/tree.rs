// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element tree with a scrollable viewport.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};
use unveil_core::element::ElementId;
use unveil_core::host::ElementTree;

#[derive(Clone, Debug)]
struct Node {
    selectors: Vec<String>,
    parent: Option<ElementId>,
    /// Document-space bounds.
    bounds: Rect,
}

/// A flat list of elements laid out in document space.
///
/// Selector matching is exact string comparison against the selectors an
/// element was added with. [`bounds`](ElementTree::bounds) reports
/// viewport-space rectangles, shifted by the current scroll offset.
#[derive(Clone, Debug)]
pub struct SimTree {
    nodes: Vec<Node>,
    viewport: Size,
    scroll: f64,
    geometry: bool,
}

impl SimTree {
    /// Creates an empty document shown through a viewport of `viewport`.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            viewport,
            scroll: 0.0,
            geometry: true,
        }
    }

    /// Adds an element matched by each of `selectors` and returns its id.
    pub fn add(&mut self, selectors: &[&str], parent: Option<ElementId>, bounds: Rect) -> ElementId {
        let id = ElementId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            selectors: selectors.iter().map(|s| String::from(*s)).collect(),
            parent,
            bounds,
        });
        id
    }

    /// Adds `count` elements of height `height` stacked from `top` downwards
    /// with `gap` between them. Returns their ids in document order.
    pub fn add_column(&mut self, selectors: &[&str], top: f64, height: f64, gap: f64, count: usize) -> Vec<ElementId> {
        let mut y = top;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(self.add(selectors, None, Rect::new(0.0, y, self.viewport.width, y + height)));
            y += height + gap;
        }
        ids
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the current vertical scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    /// Scrolls the document to `offset`.
    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset;
    }

    /// Makes geometry queries fail (or succeed again).
    pub fn set_geometry_available(&mut self, available: bool) {
        self.geometry = available;
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(usize::try_from(id.0).ok()?)
    }
}

impl ElementTree for SimTree {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.selectors.iter().any(|s| s == selector))
            .filter_map(|(i, _)| u32::try_from(i).ok().map(ElementId))
            .collect()
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id)?.parent
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        if !self.geometry {
            return None;
        }
        Some(self.node(id)?.bounds - Vec2::new(0.0, self.scroll))
    }

    fn viewport(&self) -> Option<Rect> {
        self.geometry
            .then(|| Rect::from_origin_size((0.0, 0.0), self.viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_the_scroll_offset() {
        let mut tree = SimTree::new(Size::new(800.0, 600.0));
        let id = tree.add(&[".card"], None, Rect::new(0.0, 900.0, 800.0, 1000.0));
        tree.set_scroll(500.0);
        assert_eq!(tree.bounds(id), Some(Rect::new(0.0, 400.0, 800.0, 500.0)));
        tree.set_geometry_available(false);
        assert_eq!(tree.bounds(id), None);
        assert_eq!(tree.viewport(), None);
    }

    #[test]
    fn queries_match_exact_selectors_in_order() {
        let mut tree = SimTree::new(Size::new(800.0, 600.0));
        let a = tree.add(&[".a", ".shared"], None, Rect::ZERO);
        let _b = tree.add(&[".b"], Some(a), Rect::ZERO);
        let c = tree.add(&[".shared"], None, Rect::ZERO);
        assert_eq!(tree.query_all(".shared"), [a, c]);
        assert!(tree.query_all(".missing").is_empty(), "unknown selector");
        assert_eq!(tree.parent(ElementId(1)), Some(a));
    }
}
