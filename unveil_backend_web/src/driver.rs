// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser event loop around the [`RevealScheduler`].
//!
//! [`RevealDriver::start`] registers the page's reveal groups and parallax
//! layers, then wires every platform callback (viewport watcher entries,
//! animation frames, timeouts, `scroll`, `wheel`) into
//! [`RevealScheduler::handle`] and applies the resulting commands through a
//! [`DomPresenter`].
//!
//! All callbacks hold a weak reference to the shared state, so dropping the
//! driver (or calling [`teardown`](RevealDriver::teardown)) silences them.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use unveil_core::config::{GroupOptions, RevealConfig};
use unveil_core::element::RevealGroup;
use unveil_core::host::RevealHost as _;
use unveil_core::scheduler::{Activation, Event, RevealScheduler, RevealStats};
use unveil_core::trace::{TraceSink, Tracer};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Window};

use crate::dom::{DomTree, ElementMap};
use crate::error::SetupError;
use crate::observer::ViewportWatcher;
use crate::presenter::DomPresenter;
use crate::raf;

/// One reveal group: which selectors, which treatment, which options.
#[derive(Clone, Copy, Debug)]
pub struct GroupSpec {
    /// Selectors, registered in order.
    pub selectors: &'static [&'static str],
    /// Treatment applied to every match.
    pub group: RevealGroup,
    /// Nesting and stagger options.
    pub options: GroupOptions,
}

struct DriverState {
    scheduler: RevealScheduler,
    tree: DomTree,
    presenter: DomPresenter,
    sink: Option<Box<dyn TraceSink>>,
}

impl DriverState {
    fn dispatch(&mut self, event: Event) {
        let commands = match self.sink.as_deref_mut() {
            Some(sink) => self
                .scheduler
                .handle_traced(event, &mut Tracer::new(sink)),
            None => self.scheduler.handle(event),
        };
        self.presenter.apply(&commands);
    }

    fn register(&mut self, spec: &GroupSpec) {
        let commands = match self.sink.as_deref_mut() {
            Some(sink) => self.scheduler.register_group_traced(
                &self.tree,
                spec.selectors,
                spec.group,
                spec.options,
                &mut Tracer::new(sink),
            ),
            None => {
                self.scheduler
                    .register_group(&self.tree, spec.selectors, spec.group, spec.options)
            }
        };
        self.presenter.apply(&commands);
    }

    fn initial_check(&mut self) {
        let commands = match self.sink.as_deref_mut() {
            Some(sink) => self
                .scheduler
                .initial_viewport_check_traced(&self.tree, &mut Tracer::new(sink)),
            None => self.scheduler.initial_viewport_check(&self.tree),
        };
        self.presenter.apply(&commands);
    }
}

type Shared = Rc<RefCell<Option<DriverState>>>;

/// Runs `f` on the live state, if the driver has not been torn down.
fn with_state(weak: &Weak<RefCell<Option<DriverState>>>, f: impl FnOnce(&mut DriverState)) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        return;
    };
    if let Some(state) = guard.as_mut() {
        f(state);
    }
}

/// JS closures owned for the lifetime of the driver.
struct Callbacks {
    window: Window,
    // Referenced by the presenter through their JS handles.
    _frame: Closure<dyn FnMut(f64)>,
    _timer: Closure<dyn FnMut(f64)>,
    scroll: Closure<dyn FnMut()>,
    wheel: Closure<dyn FnMut()>,
    _initial: Closure<dyn FnMut()>,
    initial_handle: Option<i32>,
}

impl Callbacks {
    fn detach(&self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.scroll.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("wheel", self.wheel.as_ref().unchecked_ref());
        if let Some(handle) = self.initial_handle {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Owns a running [`RevealScheduler`] and its browser wiring.
///
/// Dropping the driver tears everything down. Pages that reveal for their
/// whole lifetime should `core::mem::forget` it after start.
pub struct RevealDriver {
    state: Shared,
    callbacks: Option<Callbacks>,
    activation: Activation,
}

impl core::fmt::Debug for RevealDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RevealDriver")
            .field("activation", &self.activation)
            .field("wired", &self.callbacks.is_some())
            .finish_non_exhaustive()
    }
}

impl RevealDriver {
    /// Starts revealing on `window`'s document.
    ///
    /// Groups are registered in order, so an element matched by an earlier
    /// group is never re-registered by a later one. When the user prefers
    /// reduced motion, or the browser lacks `IntersectionObserver`, nothing
    /// is touched and the returned driver is inert.
    ///
    /// # Errors
    ///
    /// Fails if the document is missing or a listener or observer cannot be
    /// created.
    pub fn start(
        window: &Window,
        config: RevealConfig,
        groups: &[GroupSpec],
        parallax: &[&str],
    ) -> Result<Self, SetupError> {
        Self::start_traced(window, config, groups, parallax, None)
    }

    /// Like [`start`](Self::start), reporting scheduler events to `sink`
    /// from registration onward.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn start_traced(
        window: &Window,
        config: RevealConfig,
        groups: &[GroupSpec],
        parallax: &[&str],
        sink: Option<Box<dyn TraceSink>>,
    ) -> Result<Self, SetupError> {
        let document = window.document().ok_or(SetupError::NoDocument)?;
        let scheduler = RevealScheduler::init(config, crate::host_signals(window));
        let activation = scheduler.activation();
        let state: Shared = Rc::new(RefCell::new(None));
        if !scheduler.is_active() {
            return Ok(Self {
                state,
                callbacks: None,
                activation,
            });
        }

        let map = Rc::new(ElementMap::new());
        let weak = Rc::downgrade(&state);

        let frame_state = Weak::clone(&weak);
        let frame = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            with_state(&frame_state, |s| {
                s.presenter.frame_fired();
                s.dispatch(Event::Frame {
                    now: raf::host_time(timestamp_ms),
                });
            });
        }) as Box<dyn FnMut(f64)>);

        let timer_state = Weak::clone(&weak);
        let timer = Closure::wrap(Box::new(move |arg: f64| {
            let Some(token) = raf::token_from_js(arg) else {
                return;
            };
            with_state(&timer_state, |s| {
                s.presenter.timer_fired(token);
                s.dispatch(Event::Timer {
                    token,
                    now: crate::now(),
                });
            });
        }) as Box<dyn FnMut(f64)>);

        let watch_state = Weak::clone(&weak);
        let watcher = ViewportWatcher::new(&config.observer, Rc::clone(&map), move |id, visible| {
            with_state(&watch_state, |s| s.dispatch(Event::Visibility { id, visible }));
        })?;

        let scroll_state = Weak::clone(&weak);
        let scroll_window = window.clone();
        let scroll = Closure::wrap(Box::new(move || {
            let offset = scroll_window.scroll_y().unwrap_or(0.0);
            with_state(&scroll_state, |s| {
                s.dispatch(Event::Scroll {
                    now: crate::now(),
                    offset,
                });
            });
        }) as Box<dyn FnMut()>);

        let wheel_state = Weak::clone(&weak);
        let wheel = Closure::wrap(Box::new(move || {
            with_state(&wheel_state, |s| {
                s.dispatch(Event::Wheel { now: crate::now() });
            });
        }) as Box<dyn FnMut()>);

        // Everything fallible happens before the first element is touched,
        // so an early return never leaves prepared elements behind.
        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);
        window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                scroll.as_ref().unchecked_ref(),
                &passive,
            )
            .map_err(|_| SetupError::Listener("scroll"))?;
        if window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                wheel.as_ref().unchecked_ref(),
                &passive,
            )
            .is_err()
        {
            let _ = window
                .remove_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
            return Err(SetupError::Listener("wheel"));
        }

        let initial_state = weak;
        let initial = Closure::wrap(Box::new(move || {
            with_state(&initial_state, DriverState::initial_check);
        }) as Box<dyn FnMut()>);
        let delay_ms = config.initial_check_delay.ticks().div_ceil(1_000);
        let initial_handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                initial.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )
            .ok();

        let presenter = DomPresenter::new(
            Rc::clone(&map),
            watcher,
            frame.as_ref().clone(),
            timer.as_ref().clone(),
        );
        let tree = DomTree::new(window.clone(), document, map);
        let mut driver_state = DriverState {
            scheduler,
            tree,
            presenter,
            sink,
        };
        for spec in groups {
            driver_state.register(spec);
        }
        driver_state
            .scheduler
            .register_parallax(&driver_state.tree, parallax);
        *state.borrow_mut() = Some(driver_state);

        Ok(Self {
            state,
            callbacks: Some(Callbacks {
                window: window.clone(),
                _frame: frame,
                _timer: timer,
                scroll,
                wheel,
                _initial: initial,
                initial_handle,
            }),
            activation,
        })
    }

    /// Returns why the driver is (or is not) revealing.
    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Returns the scheduler's counters. An inert or torn-down driver
    /// reports zeros.
    #[must_use]
    pub fn stats(&self) -> RevealStats {
        self.state
            .borrow()
            .as_ref()
            .map(|s| s.scheduler.stats())
            .unwrap_or_default()
    }

    /// Replaces the trace sink. `None` stops tracing.
    pub fn set_trace_sink(&self, sink: Option<Box<dyn TraceSink>>) {
        if let Some(state) = self.state.borrow_mut().as_mut() {
            state.sink = sink;
        }
    }

    /// Stops observing, returns unrevealed elements to their static styling,
    /// cancels every pending frame and timer, and removes the listeners.
    /// Calling it again is a no-op.
    pub fn teardown(&mut self) {
        if let Some(mut state) = self.state.borrow_mut().take() {
            let commands = state.scheduler.teardown();
            state.presenter.apply(&commands);
            state.presenter.shutdown();
        }
        if let Some(callbacks) = self.callbacks.take() {
            callbacks.detach();
        }
        if self.activation == Activation::Active {
            self.activation = Activation::TornDown;
        }
    }
}

impl Drop for RevealDriver {
    fn drop(&mut self) {
        self.teardown();
    }
}
