// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure state for the page's peripheral effects.
//!
//! These are independent of the reveal scheduler. Each type holds only the
//! decision logic; the platform backend owns the event listeners and the
//! DOM mutations.

pub mod accordion;
pub mod link;
pub mod menu;
pub mod tilt;
