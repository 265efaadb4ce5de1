// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: scroll reveals for a multi-page portfolio site.
//!
//! Registers the site's reveal groups and parallax layers with
//! [`RevealDriver`], then wires the page effects (click sound, mobile menu,
//! FAQ accordions, micro-interactions, smooth anchor scrolling). Each feature
//! is wired on its own; a failure is logged as a console warning and the
//! others keep running.
//!
//! Build with: `wasm-pack build --target web demos/portfolio_site`
//!
//! Then include the generated module from every page and serve the site.
//! With `--features trace` scheduler activity is logged to the console.

// Native builds only exist for `cargo check` and the unit tests.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::vec::Vec;

use unveil_backend_web::effects;
use unveil_backend_web::{GroupSpec, RevealDriver, SetupError, matches_any};
use unveil_core::config::{GroupOptions, RevealConfig};
use unveil_core::element::RevealGroup;
use unveil_core::time::Duration;
use wasm_bindgen::prelude::*;

/// Section containers, revealed as a whole.
const CONTAINERS: &[&str] = &[
    ".about__container",
    ".services__container",
    ".testimonial__container",
    ".outro__container",
    ".services-page__item",
    ".services-page__container",
    ".contact__container",
];

/// Content blocks, animated on their own outside the home page.
const CONTENT: &[&str] = &[
    ".about__content",
    ".about__image",
    ".services__row",
    ".testimonial__item",
    ".item-testimonial",
    ".services-page__content",
    ".services-page__img",
    ".contact__info",
    ".contact__form-wrapper",
];

/// Section titles that may sit outside a container.
const STANDALONE_TITLES: &[&str] = &[
    ".about__title",
    ".services__title",
    ".testimonial__title",
    ".outro__title",
    ".services-page__title",
    ".contact__title",
];

/// Page titles revealed regardless of nesting.
const TITLES: &[&str] = &[
    ".services-page__title",
    ".about__title",
    ".contact__title",
    ".outro__title",
];

const SERVICE_ITEMS: &[&str] = &[".item-services"];

const IMAGES: &[&str] = &[
    ".about__image img",
    ".services-page__img img",
    ".item-services__image img",
    ".item-testimonial__image img",
];

const TEXTS: &[&str] = &[
    ".about__text",
    ".services-page__text",
    ".contact__text",
    ".outro__text",
    ".item-services__text",
];

const BUTTONS: &[&str] = &[
    ".services-page__button",
    ".about__button",
    ".outro__button",
];

/// Parallax layers, slowest first.
const PARALLAX: &[&str] = &[".main__container"];

/// Present only on the home page, where nested content is left to its
/// container.
const HOME_MARKER: &str = ".about-home, .page__services.services";

/// Stagger between consecutive service cards.
const SERVICE_STAGGER: Duration = Duration::from_millis(200);

/// Reveal groups in registration order.
fn reveal_groups(home: bool) -> Vec<GroupSpec> {
    let mut groups = Vec::new();
    groups.push(GroupSpec {
        selectors: CONTAINERS,
        group: RevealGroup::Container,
        options: GroupOptions::top_level(),
    });
    groups.push(GroupSpec {
        selectors: SERVICE_ITEMS,
        group: RevealGroup::ScaleItem,
        options: GroupOptions::top_level().with_stagger(SERVICE_STAGGER),
    });
    groups.push(GroupSpec {
        selectors: IMAGES,
        group: RevealGroup::ImageReveal,
        options: GroupOptions::top_level(),
    });
    groups.push(GroupSpec {
        selectors: TEXTS,
        group: RevealGroup::TextReveal,
        options: GroupOptions::top_level(),
    });
    groups.push(GroupSpec {
        selectors: TITLES,
        group: RevealGroup::Title,
        options: GroupOptions::top_level(),
    });
    groups.push(GroupSpec {
        selectors: BUTTONS,
        group: RevealGroup::ScaleItem,
        options: GroupOptions::top_level(),
    });
    if !home {
        groups.push(GroupSpec {
            selectors: CONTENT,
            group: RevealGroup::Content,
            options: GroupOptions::nested(),
        });
    }
    groups.push(GroupSpec {
        selectors: STANDALONE_TITLES,
        group: RevealGroup::Title,
        options: GroupOptions::nested(),
    });
    groups
}

fn start_driver(
    window: &web_sys::Window,
    groups: &[GroupSpec],
) -> Result<RevealDriver, SetupError> {
    #[cfg(feature = "trace")]
    {
        RevealDriver::start_traced(
            window,
            RevealConfig::web(),
            groups,
            PARALLAX,
            Some(alloc::boxed::Box::new(unveil_backend_web::ConsoleSink::new())),
        )
    }
    #[cfg(not(feature = "trace"))]
    {
        RevealDriver::start(window, RevealConfig::web(), groups, PARALLAX)
    }
}

/// Tally of page features that came up and those that did not.
///
/// Features are independent: one failing leaves the rest running.
#[derive(Debug, Default)]
struct Wiring {
    up: usize,
    failed: Vec<(&'static str, SetupError)>,
}

impl Wiring {
    fn record<T>(&mut self, feature: &'static str, result: Result<T, SetupError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.up += 1;
                Some(value)
            }
            Err(err) => {
                self.failed.push((feature, err));
                None
            }
        }
    }

    /// Fails only when features were attempted and none came up.
    fn finish(self) -> Result<(), SetupError> {
        match self.failed.first() {
            Some(&(_, err)) if self.up == 0 => Err(err),
            _ => Ok(()),
        }
    }
}

fn warn(feature: &str, err: &SetupError) {
    let message = alloc::format!("portfolio_site: {feature} disabled: {err}");
    web_sys::console::warn_1(&JsValue::from_str(&message));
}

fn run() -> Result<(), SetupError> {
    let window = web_sys::window().ok_or(SetupError::NoWindow)?;
    let document = window.document().ok_or(SetupError::NoDocument)?;
    let mut wiring = Wiring::default();

    wiring.record("click sound", effects::wire_click_sound(&window, &document));
    wiring.record("menu", effects::wire_menu(&document));
    wiring.record("accordions", effects::wire_accordions(&document));

    let home = matches_any(&document, HOME_MARKER);
    if let Some(driver) = wiring.record("reveals", start_driver(&window, &reveal_groups(home))) {
        // Reveals and parallax run for the life of the page.
        core::mem::forget(driver);
    }

    if !unveil_backend_web::prefers_reduced_motion(&window) {
        wiring.record("micro-interactions", effects::wire_micro_interactions(&document));
        wiring.record("smooth anchors", effects::wire_smooth_anchors(&document));
    }

    for (feature, err) in &wiring.failed {
        warn(feature, err);
    }
    wiring.finish()
}

/// Entry point, run once the module is instantiated.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    run().map_err(|e| JsValue::from_str(&alloc::string::ToString::to_string(&e)))
}
