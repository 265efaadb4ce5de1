// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click-sound link routing.
//!
//! Clicking an internal link navigates away before a click sound can play.
//! [`LinkRoute::classify`] decides whether navigation should be held back for
//! [`NAVIGATION_DELAY`].

use crate::time::Duration;

/// How long internal navigation is held back after a click.
pub const NAVIGATION_DELAY: Duration = Duration::from_millis(150);

/// Path of the click sound, relative to the page.
pub const CLICK_SOUND: &str = "audio/button-click.mp3";

/// Click sound volume in `[0, 1]`.
pub const CLICK_VOLUME: f64 = 0.6;

/// What to do with a clicked clickable element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkRoute {
    /// Prevent default navigation, play the sound, navigate after
    /// [`NAVIGATION_DELAY`].
    DelayedNavigate,
    /// Play the sound and let the click proceed.
    Immediate,
}

/// The facts about a clicked element that routing depends on.
#[derive(Clone, Copy, Debug)]
pub struct LinkInfo<'a> {
    /// `true` for anchor elements.
    pub is_anchor: bool,
    /// Resolved `href`, empty when absent.
    pub href: &'a str,
    /// The element has a `target` attribute.
    pub has_target: bool,
    /// Hostname of the current page.
    pub hostname: &'a str,
}

impl LinkRoute {
    /// Classifies a click.
    ///
    /// Anchors without a `target` whose `href` stays on this site (same
    /// hostname, fragment, `.html` page, or no scheme) are delayed; everything
    /// else is immediate.
    #[must_use]
    pub fn classify(link: &LinkInfo<'_>) -> Self {
        if !link.is_anchor || link.href.is_empty() || link.has_target {
            return Self::Immediate;
        }
        let href = link.href;
        let internal = (!link.hostname.is_empty() && href.contains(link.hostname))
            || href.starts_with('#')
            || href.ends_with(".html")
            || !href.contains("http");
        if internal {
            Self::DelayedNavigate
        } else {
            Self::Immediate
        }
    }
}

/// Returns `true` if `href` is an in-page fragment link that should scroll
/// smoothly to its target.
#[must_use]
pub fn is_fragment(href: &str) -> bool {
    href.len() > 1 && href.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(href: &str) -> LinkInfo<'_> {
        LinkInfo {
            is_anchor: true,
            href,
            has_target: false,
            hostname: "studio.example",
        }
    }

    #[test]
    fn internal_links_are_delayed() {
        for href in [
            "https://studio.example/about",
            "#contact",
            "https://cdn.other/page.html",
            "services",
        ] {
            assert_eq!(
                LinkRoute::classify(&anchor(href)),
                LinkRoute::DelayedNavigate,
                "{href} is internal"
            );
        }
    }

    #[test]
    fn external_and_targeted_links_are_immediate() {
        assert_eq!(
            LinkRoute::classify(&anchor("https://other.example/")),
            LinkRoute::Immediate
        );
        let targeted = LinkInfo {
            has_target: true,
            ..anchor("#top")
        };
        assert_eq!(LinkRoute::classify(&targeted), LinkRoute::Immediate);
        let button = LinkInfo {
            is_anchor: false,
            ..anchor("#top")
        };
        assert_eq!(LinkRoute::classify(&button), LinkRoute::Immediate);
    }

    #[test]
    fn fragments() {
        assert!(is_fragment("#faq"));
        assert!(!is_fragment("#"), "bare hash has no target");
        assert!(!is_fragment("page.html"));
    }
}
