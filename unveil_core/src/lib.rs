// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-triggered reveal scheduling for web pages.
//!
//! `unveil_core` decides *when* registered page elements play their one-shot
//! reveal transition. It is `no_std` compatible (with `alloc`), owns no
//! platform handles, and never blocks: every platform callback is turned into
//! an [`Event`](scheduler::Event), and every decision comes back as an
//! ordered list of [`Commands`](host::Commands) for the host to apply.
//!
//! # Architecture
//!
//! ```text
//!   Host (viewport watcher, frames, timers, scroll)
//!       │
//!       ▼
//!   Event ──► RevealScheduler::handle() ──► Commands ──► RevealHost::apply()
//!                    │                                        │
//!                    ▼                                        ▼
//!   ElementRegistry · RevealQueue · ScrollState     classes, transforms,
//!                                                   frame and timer requests
//! ```
//!
//! **[`scheduler`]**: The reveal state machine: registration, visibility
//! queueing, frame-batched draining, scroll deferral, parallax, teardown.
//!
//! **[`registry`]** / **[`queue`]**: Struct-of-arrays element registry and
//! the FIFO reveal queue.
//!
//! **[`scroll`]** / **[`timer`]** / **[`parallax`]**: Scroll and wheel state,
//! throttling, generation-checked timer tokens, parallax offsets.
//!
//! **[`host`]**: The [`ElementTree`](host::ElementTree) and
//! [`RevealHost`](host::RevealHost) traits that platform backends implement.
//!
//! **[`config`]**: Presets for timing constants and observer options.
//!
//! **[`effects`]**: Pure state for the page's peripheral effects (accordion,
//! menu, link routing, card tilt).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod effects;
pub mod element;
pub mod host;
pub mod parallax;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod scroll;
pub mod time;
pub mod timer;
pub mod trace;
