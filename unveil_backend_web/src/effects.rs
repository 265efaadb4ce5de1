// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page effects outside the reveal scheduler.
//!
//! Each `wire_*` function attaches page-lifetime listeners to the elements
//! present when it runs and returns how many elements it wired. The state
//! behind each effect lives in [`unveil_core::effects`]; these functions only
//! translate it to DOM calls. Failing DOM calls after setup are ignored.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::Promise;
use kurbo::{Point, Rect};
use unveil_core::effects::accordion::Accordion;
use unveil_core::effects::link::{
    CLICK_SOUND, CLICK_VOLUME, LinkInfo, LinkRoute, NAVIGATION_DELAY, is_fragment,
};
use unveil_core::effects::menu::{MENU_OPEN_CLASS, MenuToggle};
use unveil_core::effects::tilt::CardTilt;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, HtmlAnchorElement, HtmlAudioElement,
    HtmlElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::dom::query_elements;
use crate::error::SetupError;
use crate::raf;

/// Elements that play the click sound.
pub const CLICKABLE_SELECTOR: &str = r#"button, .button, a.button, [class*="__button"]"#;
/// Mobile menu icon.
pub const MENU_ICON_SELECTOR: &str = ".icon-menu";
/// Accordion items.
pub const SPOLLER_SELECTOR: &str = "[data-spoller]";
/// Marks an accordion container whose items are mutually exclusive.
pub const ONE_SPOLLER_ATTRIBUTE: &str = "data-one-spoller";
/// Elements with a press effect.
pub const PRESSABLE_SELECTOR: &str = ".button, button, a.button";
/// Cards that tilt toward the pointer.
pub const TILT_SELECTOR: &str = ".item-services, .testimonial__item";
/// Images that zoom on hover.
pub const ZOOM_SELECTOR: &str =
    ".about__image img, .services-page__img img, .item-services__image img";
/// Elements with a custom focus ring.
pub const FOCUSABLE_SELECTOR: &str = "a, button, input, textarea";
/// In-page links.
pub const FRAGMENT_LINK_SELECTOR: &str = r##"a[href^="#"]"##;

const SPOLLER_BUTTON: &str = ".spollers-faq__button";
const SPOLLER_TEXT: &str = ".spollers-faq__text";
const ACTIVE_CLASS: &str = "active";

const PRESS_TRANSFORM: &str = "translate3d(0, 0, 0) scale(0.97)";
const TILT_TRANSITION: &str = "transform 0.15s cubic-bezier(0.25, 0.46, 0.45, 0.94)";
const TILT_RESET_TRANSITION: &str = "transform 0.6s cubic-bezier(0.22, 1, 0.36, 1)";
const ZOOM_TRANSITION: &str =
    "transform 0.8s cubic-bezier(0.22, 1, 0.36, 1), filter 0.8s cubic-bezier(0.22, 1, 0.36, 1)";
const ZOOM_TRANSFORM: &str = "scale3d(1.05, 1.05, 1)";
const FOCUS_OUTLINE: &str = "2px solid rgba(79, 216, 232, 0.6)";
const FOCUS_OUTLINE_OFFSET: &str = "2px";

/// Adds a page-lifetime listener for `event` on `target`.
fn listen(
    target: &Element,
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), SetupError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|_| SetupError::Listener(event))?;
    closure.forget();
    Ok(())
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

fn clear_style(el: &HtmlElement, property: &str) {
    let _ = el.style().remove_property(property);
}

// ---------------------------------------------------------------------------
// Click sound
// ---------------------------------------------------------------------------

/// Lazily created click sound.
struct ClickSound {
    audio: Option<HtmlAudioElement>,
    // Swallows playback rejections (autoplay policy, missing file).
    on_error: Closure<dyn FnMut(JsValue)>,
}

impl ClickSound {
    fn play(&mut self) {
        if self.audio.is_none()
            && let Ok(audio) = HtmlAudioElement::new_with_src(CLICK_SOUND)
        {
            audio.set_volume(CLICK_VOLUME);
            audio.load();
            self.audio = Some(audio);
        }
        let Some(audio) = &self.audio else {
            return;
        };
        audio.set_current_time(0.0);
        if let Ok(promise) = audio.play() {
            let _: Promise = promise.catch(&self.on_error);
        }
    }
}

/// Plays the click sound on every clickable element. Internal links hold
/// navigation back for [`NAVIGATION_DELAY`] so the sound is heard.
///
/// # Errors
///
/// Returns [`SetupError::Listener`] if a listener cannot be added.
pub fn wire_click_sound(window: &Window, document: &Document) -> Result<usize, SetupError> {
    let sound = Rc::new(RefCell::new(ClickSound {
        audio: None,
        on_error: Closure::wrap(Box::new(|_: JsValue| {}) as Box<dyn FnMut(JsValue)>),
    }));
    let hostname = window.location().hostname().unwrap_or_default();
    let elements = query_elements(document, CLICKABLE_SELECTOR);
    for el in &elements {
        let sound = Rc::clone(&sound);
        let window = window.clone();
        let hostname = hostname.clone();
        let target = el.clone();
        listen(el, "click", false, move |event| {
            let anchor = target.dyn_ref::<HtmlAnchorElement>();
            let href = anchor.map(HtmlAnchorElement::href).unwrap_or_default();
            let route = LinkRoute::classify(&LinkInfo {
                is_anchor: anchor.is_some(),
                href: &href,
                has_target: target.has_attribute("target"),
                hostname: &hostname,
            });
            if route == LinkRoute::DelayedNavigate {
                event.prevent_default();
            }
            sound.borrow_mut().play();
            if route == LinkRoute::DelayedNavigate {
                navigate_later(&window, href);
            }
        })?;
    }
    Ok(elements.len())
}

fn navigate_later(window: &Window, href: String) {
    let location = window.location();
    let navigate = Closure::once_into_js(move || {
        let _ = location.set_href(&href);
    });
    let ms = NAVIGATION_DELAY.ticks() / 1_000;
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        navigate.unchecked_ref(),
        i32::try_from(ms).unwrap_or(i32::MAX),
    );
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// Toggles [`MENU_OPEN_CLASS`] on `body` when the menu icon is clicked.
///
/// # Errors
///
/// Returns [`SetupError::NoBody`] if the document has no body, or
/// [`SetupError::Listener`] if the listener cannot be added.
pub fn wire_menu(document: &Document) -> Result<usize, SetupError> {
    let Ok(Some(icon)) = document.query_selector(MENU_ICON_SELECTOR) else {
        return Ok(0);
    };
    let body = document.body().ok_or(SetupError::NoBody)?;
    let mut menu = MenuToggle::new();
    listen(&icon, "click", false, move |event| {
        event.prevent_default();
        let classes = body.class_list();
        menu.sync(classes.contains(MENU_OPEN_CLASS));
        let open = menu.toggle();
        let _ = classes.toggle_with_force(MENU_OPEN_CLASS, open);
    })?;
    Ok(1)
}

// ---------------------------------------------------------------------------
// Accordion
// ---------------------------------------------------------------------------

struct SpollerGroup {
    state: Accordion,
    items: Vec<Element>,
}

impl SpollerGroup {
    fn toggle(&mut self, index: usize) {
        let change = self.state.toggle(index);
        for &i in &change.closed {
            if let Some(item) = self.items.get(i) {
                let _ = item.class_list().remove_1(ACTIVE_CLASS);
                if let Some(text) = spoller_text(item) {
                    clear_style(&text, "max-height");
                }
            }
        }
        if let Some(item) = change.opened.and_then(|i| self.items.get(i)) {
            let _ = item.class_list().add_1(ACTIVE_CLASS);
            if let Some(text) = spoller_text(item) {
                set_style(&text, "max-height", &format!("{}px", text.scroll_height()));
            }
        }
    }
}

fn spoller_text(item: &Element) -> Option<HtmlElement> {
    item.query_selector(SPOLLER_TEXT)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Wires every accordion item's button. Items sharing a parent form one
/// group; the group is exclusive when the parent carries
/// [`ONE_SPOLLER_ATTRIBUTE`].
///
/// # Errors
///
/// Returns [`SetupError::Listener`] if a listener cannot be added.
pub fn wire_accordions(document: &Document) -> Result<usize, SetupError> {
    let mut groups: Vec<(Element, Vec<Element>)> = Vec::new();
    for item in query_elements(document, SPOLLER_SELECTOR) {
        let Some(parent) = item.parent_element() else {
            continue;
        };
        match groups.iter_mut().find(|(p, _)| *p == parent) {
            Some((_, items)) => items.push(item),
            None => groups.push((parent, vec![item])),
        }
    }

    let mut wired = 0;
    for (parent, items) in groups {
        let mut state = Accordion::new(items.len(), parent.has_attribute(ONE_SPOLLER_ATTRIBUTE));
        for (i, item) in items.iter().enumerate() {
            state.set_open(i, item.class_list().contains(ACTIVE_CLASS));
        }
        let buttons: Vec<_> = items
            .iter()
            .map(|item| item.query_selector(SPOLLER_BUTTON).ok().flatten())
            .collect();
        let group = Rc::new(RefCell::new(SpollerGroup { state, items }));
        for (index, button) in buttons.into_iter().enumerate() {
            let Some(button) = button else {
                continue;
            };
            let group = Rc::clone(&group);
            listen(&button, "click", false, move |_| {
                group.borrow_mut().toggle(index);
            })?;
            wired += 1;
        }
    }
    Ok(wired)
}

// ---------------------------------------------------------------------------
// Micro-interactions
// ---------------------------------------------------------------------------

fn html_elements(document: &Document, selector: &str) -> Vec<HtmlElement> {
    query_elements(document, selector)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Per-card tilt state, updated at most once per frame.
struct TiltCard {
    card: HtmlElement,
    tilt: CardTilt,
    pointer: Point,
    frame: Option<i32>,
}

impl TiltCard {
    fn on_frame(&mut self) {
        self.frame = None;
        let r = self.card.get_bounding_client_rect();
        let bounds = Rect::new(r.left(), r.top(), r.right(), r.bottom());
        let tilt = self.tilt.track(bounds, self.pointer);
        set_style(&self.card, "transform", &tilt.css_transform());
        set_style(&self.card, "transition", TILT_TRANSITION);
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame.take() {
            raf::cancel_animation_frame(id);
        }
    }
}

fn wire_tilt(card: HtmlElement) -> Result<(), SetupError> {
    let target: Element = card.clone().into();
    let state = Rc::new(RefCell::new(TiltCard {
        card,
        tilt: CardTilt::new(),
        pointer: Point::ZERO,
        frame: None,
    }));

    let frame_state = Rc::clone(&state);
    let frame = Closure::wrap(Box::new(move |_: f64| {
        frame_state.borrow_mut().on_frame();
    }) as Box<dyn FnMut(f64)>);
    let frame_fn: JsValue = frame.as_ref().clone();
    frame.forget();

    let move_state = Rc::clone(&state);
    listen(&target, "mousemove", true, move |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let mut s = move_state.borrow_mut();
        s.pointer = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
        s.cancel_frame();
        s.frame = Some(raf::request_animation_frame(&frame_fn));
    })?;

    listen(&target, "mouseleave", true, move |_| {
        let mut s = state.borrow_mut();
        s.cancel_frame();
        s.tilt.reset();
        set_style(&s.card, "transition", TILT_RESET_TRANSITION);
        clear_style(&s.card, "transform");
    })
}

/// Wires button press feedback, card tilt, image zoom, and focus rings.
///
/// # Errors
///
/// Returns [`SetupError::Listener`] if a listener cannot be added.
pub fn wire_micro_interactions(document: &Document) -> Result<usize, SetupError> {
    let mut wired = 0;

    for btn in html_elements(document, PRESSABLE_SELECTOR) {
        let target: Element = btn.clone().into();
        let pressed = btn.clone();
        listen(&target, "mousedown", true, move |_| {
            set_style(&pressed, "transform", PRESS_TRANSFORM);
        })?;
        for release in ["mouseup", "mouseleave"] {
            let released = btn.clone();
            listen(&target, release, true, move |_| {
                clear_style(&released, "transform");
            })?;
        }
        wired += 1;
    }

    for card in html_elements(document, TILT_SELECTOR) {
        wire_tilt(card)?;
        wired += 1;
    }

    for img in html_elements(document, ZOOM_SELECTOR) {
        let target: Element = img.clone().into();
        let entered = img.clone();
        listen(&target, "mouseenter", true, move |_| {
            set_style(&entered, "transition", ZOOM_TRANSITION);
            set_style(&entered, "transform", ZOOM_TRANSFORM);
        })?;
        listen(&target, "mouseleave", true, move |_| {
            set_style(&img, "transition", ZOOM_TRANSITION);
            clear_style(&img, "transform");
        })?;
        wired += 1;
    }

    for el in html_elements(document, FOCUSABLE_SELECTOR) {
        let target: Element = el.clone().into();
        let focused = el.clone();
        listen(&target, "focus", true, move |_| {
            set_style(&focused, "outline", FOCUS_OUTLINE);
            set_style(&focused, "outline-offset", FOCUS_OUTLINE_OFFSET);
        })?;
        listen(&target, "blur", true, move |_| {
            clear_style(&el, "outline");
            clear_style(&el, "outline-offset");
        })?;
        wired += 1;
    }

    Ok(wired)
}

// ---------------------------------------------------------------------------
// Smooth anchors
// ---------------------------------------------------------------------------

/// Scrolls smoothly to the target of in-page links whose target exists.
///
/// # Errors
///
/// Returns [`SetupError::Listener`] if a listener cannot be added.
pub fn wire_smooth_anchors(document: &Document) -> Result<usize, SetupError> {
    let links = query_elements(document, FRAGMENT_LINK_SELECTOR);
    for link in &links {
        let document = document.clone();
        let anchor = link.clone();
        listen(link, "click", false, move |event| {
            let Some(href) = anchor.get_attribute("href") else {
                return;
            };
            if !is_fragment(&href) {
                return;
            }
            let Ok(Some(target)) = document.query_selector(&href) else {
                return;
            };
            event.prevent_default();
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        })?;
    }
    Ok(links.len())
}
