// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element tree.
//!
//! [`ElementMap`] hands out [`ElementId`]s for live DOM elements and stamps
//! each with a `data-unveil-id` attribute so callbacks that only see an
//! `Element` (viewport watcher entries) can find their way back. [`DomTree`]
//! implements [`ElementTree`] over the document.

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;
use unveil_core::element::ElementId;
use unveil_core::host::ElementTree;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlElement, Window};

/// Attribute carrying an element's id.
pub const ID_ATTRIBUTE: &str = "data-unveil-id";

/// Bidirectional map between DOM elements and [`ElementId`]s.
#[derive(Default)]
pub struct ElementMap {
    elements: RefCell<Vec<Element>>,
}

impl core::fmt::Debug for ElementMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementMap")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ElementMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of known elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Returns `true` if no element has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Returns the id of `element` if this map assigned one.
    #[must_use]
    pub fn id_of(&self, element: &Element) -> Option<ElementId> {
        let raw: u32 = element.get_attribute(ID_ATTRIBUTE)?.parse().ok()?;
        let index = usize::try_from(raw).ok()?;
        let known = self.elements.borrow();
        (known.get(index)? == element).then_some(ElementId(raw))
    }

    /// Returns the id of `element`, assigning one on first sight.
    pub fn intern(&self, element: &Element) -> ElementId {
        if let Some(id) = self.id_of(element) {
            return id;
        }
        let mut known = self.elements.borrow_mut();
        let id = ElementId(u32::try_from(known.len()).unwrap_or(u32::MAX));
        known.push(element.clone());
        let _ = element.set_attribute(ID_ATTRIBUTE, &format!("{}", id.0));
        id
    }

    /// Returns the element for `id`.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<Element> {
        let index = usize::try_from(id.0).ok()?;
        self.elements.borrow().get(index).cloned()
    }

    /// Returns the element for `id` if it supports inline styles.
    #[must_use]
    pub fn get_html(&self, id: ElementId) -> Option<HtmlElement> {
        self.get(id)?.dyn_into::<HtmlElement>().ok()
    }
}

/// [`ElementTree`] over a live document.
#[derive(Debug, Clone)]
pub struct DomTree {
    window: Window,
    document: Document,
    map: Rc<ElementMap>,
}

impl DomTree {
    /// Creates a tree over `window`'s document that assigns ids through `map`.
    #[must_use]
    pub fn new(window: Window, document: Document, map: Rc<ElementMap>) -> Self {
        Self {
            window,
            document,
            map,
        }
    }

    /// Returns the shared element map.
    #[must_use]
    pub fn map(&self) -> &Rc<ElementMap> {
        &self.map
    }

    /// Returns the window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns `true` if any element matches `selector`.
    #[must_use]
    pub fn matches_any(&self, selector: &str) -> bool {
        matches_any(&self.document, selector)
    }
}

/// Returns every element matching `selector`. Invalid selectors match
/// nothing.
pub(crate) fn query_elements(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Returns `true` if any element in `document` matches `selector`.
#[must_use]
pub fn matches_any(document: &Document, selector: &str) -> bool {
    matches!(document.query_selector(selector), Ok(Some(_)))
}

/// Walks up from `start` and returns the id of the first node `known` names.
fn nearest_known<N>(
    start: Option<N>,
    parent_of: impl Fn(&N) -> Option<N>,
    known: impl Fn(&N) -> Option<ElementId>,
) -> Option<ElementId> {
    let mut cursor = start;
    while let Some(node) = cursor {
        if let Some(id) = known(&node) {
            return Some(id);
        }
        cursor = parent_of(&node);
    }
    None
}

impl ElementTree for DomTree {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        query_elements(&self.document, selector)
            .iter()
            .map(|el| self.map.intern(el))
            .collect()
    }

    // Only elements some query already matched can be registered, so
    // unmatched ancestors are skipped rather than assigned ids.
    fn parent(&self, id: ElementId) -> Option<ElementId> {
        nearest_known(
            self.map.get(id)?.parent_element(),
            |el: &Element| el.parent_element(),
            |el| self.map.id_of(el),
        )
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        let r = self.map.get(id)?.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
    }

    fn viewport(&self) -> Option<Rect> {
        let w = self.window.inner_width().ok()?.as_f64()?;
        let h = self.window.inner_height().ok()?.as_f64()?;
        Some(Rect::new(0.0, 0.0, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Index-linked chain: node i has parent i - 1, node 0 is the root.
    fn up(n: &u32) -> Option<u32> {
        n.checked_sub(1)
    }

    #[test]
    fn nearest_known_skips_unnamed_ancestors() {
        let named = |n: &u32| (*n == 1).then_some(ElementId(7));
        assert_eq!(
            nearest_known(Some(4), up, named),
            Some(ElementId(7)),
            "nodes 4, 3, 2 have no id and are passed over"
        );
    }

    #[test]
    fn nearest_known_stops_at_the_first_match() {
        let named = |n: &u32| (*n % 2 == 0).then_some(ElementId(*n));
        assert_eq!(nearest_known(Some(3), up, named), Some(ElementId(2)));
    }

    #[test]
    fn nearest_known_returns_none_past_the_root() {
        assert_eq!(nearest_known(Some(3), up, |_| None), None, "nothing named");
        assert_eq!(nearest_known(None, up, |_| Some(ElementId(0))), None, "no parent");
    }
}
