// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` viewport watcher.

use alloc::boxed::Box;
use alloc::rc::Rc;

use js_sys::Array;
use unveil_core::config::ObserverOptions;
use unveil_core::element::ElementId;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::ElementMap;
use crate::error::SetupError;

type EntriesClosure = Closure<dyn FnMut(Array)>;

/// Reports visibility transitions of observed elements.
///
/// Each entry the browser delivers becomes one `(id, visible)` call on the
/// handler passed to [`new`](Self::new). Entries for elements the
/// [`ElementMap`] never assigned are dropped.
pub struct ViewportWatcher {
    observer: IntersectionObserver,
    map: Rc<ElementMap>,
    // Kept alive for as long as the observer may call it.
    _callback: EntriesClosure,
}

impl core::fmt::Debug for ViewportWatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportWatcher")
            .field("elements", &self.map.len())
            .finish_non_exhaustive()
    }
}

impl ViewportWatcher {
    /// Creates an observer configured from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Observer`] if the browser rejects the options
    /// or lacks `IntersectionObserver`.
    pub fn new(
        options: &ObserverOptions,
        map: Rc<ElementMap>,
        mut on_change: impl FnMut(ElementId, bool) + 'static,
    ) -> Result<Self, SetupError> {
        let entries_map = Rc::clone(&map);
        let callback = Closure::wrap(Box::new(move |entries: Array| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if let Some(id) = entries_map.id_of(&entry.target()) {
                    on_change(id, entry.is_intersecting());
                }
            }
        }) as Box<dyn FnMut(Array)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin_css());

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|_| SetupError::Observer)?;

        Ok(Self {
            observer,
            map,
            _callback: callback,
        })
    }

    /// Starts watching `id`.
    pub fn observe(&self, id: ElementId) {
        if let Some(el) = self.map.get(id) {
            self.observer.observe(&el);
        }
    }

    /// Stops watching `id`.
    pub fn unobserve(&self, id: ElementId) {
        if let Some(el) = self.map.get(id) {
            self.observer.unobserve(&el);
        }
    }

    /// Stops watching everything.
    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ViewportWatcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
