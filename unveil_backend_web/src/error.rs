// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Setup failures.

/// Why the browser backend could not be wired up.
///
/// Only setup can fail. Once running, failing DOM calls are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// There is no global `window` (not running in a browser main thread).
    #[error("no global `window`")]
    NoWindow,
    /// The window has no document.
    #[error("window has no `document`")]
    NoDocument,
    /// The document has no body.
    #[error("document has no `body`")]
    NoBody,
    /// `new IntersectionObserver(..)` threw.
    #[error("IntersectionObserver construction failed")]
    Observer,
    /// `addEventListener` threw for the named event.
    #[error("failed to add a `{0}` listener")]
    Listener(&'static str),
}
