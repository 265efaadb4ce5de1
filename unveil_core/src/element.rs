// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity, reveal groups, and per-element reveal state.

use core::fmt;

/// An opaque handle to a visual node owned by the host.
///
/// Hosts assign ids however they like (the web backend stamps a
/// `data-unveil-id` attribute; the simulated host uses vector indices). The
/// scheduler only compares and stores them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Which reveal treatment an element receives.
///
/// The group decides the pre-reveal class the host applies at registration
/// time; every group shares [`REVEALED_CLASS`] as its terminal class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealGroup {
    /// Section containers, revealed as a whole.
    Container,
    /// Content blocks animated separately from their section.
    Content,
    /// Standalone section titles.
    Title,
    /// Cards and buttons that scale in, usually with a stagger delay.
    ScaleItem,
    /// Images revealed with a blur effect.
    ImageReveal,
    /// Paragraph text revealed line-by-line.
    TextReveal,
}

/// Class added to every element when its reveal fires.
pub const REVEALED_CLASS: &str = "animate-in";

/// CSS custom property carrying an element's stagger delay.
pub const STAGGER_PROPERTY: &str = "--delay";

impl RevealGroup {
    /// All groups, in registration priority order.
    pub const ALL: [Self; 6] = [
        Self::Container,
        Self::Content,
        Self::Title,
        Self::ScaleItem,
        Self::ImageReveal,
        Self::TextReveal,
    ];

    /// Returns the class the host adds at registration to put the element in
    /// its pre-reveal visual state.
    #[must_use]
    pub const fn pending_class(self) -> &'static str {
        match self {
            Self::Container | Self::Content | Self::Title => "scroll-animate",
            Self::ScaleItem => "scroll-animate-scale",
            Self::ImageReveal => "image-reveal",
            Self::TextReveal => "text-reveal",
        }
    }

    /// Returns a short, stable label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Content => "content",
            Self::Title => "title",
            Self::ScaleItem => "scale-item",
            Self::ImageReveal => "image-reveal",
            Self::TextReveal => "text-reveal",
        }
    }
}

/// Lifecycle of a watched element.
///
/// `Pending → Queued → Revealed`. `Revealed` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealState {
    /// Registered and observed, not yet seen.
    #[default]
    Pending,
    /// Seen and waiting in the reveal queue.
    Queued,
    /// Reveal class applied.
    Revealed,
}

impl RevealState {
    /// Returns `true` for the terminal state.
    #[inline]
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_groups_share_the_base_class() {
        assert_eq!(RevealGroup::Container.pending_class(), "scroll-animate");
        assert_eq!(RevealGroup::Title.pending_class(), "scroll-animate");
        assert_eq!(
            RevealGroup::ScaleItem.pending_class(),
            "scroll-animate-scale"
        );
        assert_ne!(
            RevealGroup::ImageReveal.pending_class(),
            RevealGroup::TextReveal.pending_class()
        );
    }

    #[test]
    fn only_revealed_is_terminal() {
        assert!(RevealState::Revealed.is_revealed());
        assert!(!RevealState::Queued.is_revealed());
        assert_eq!(RevealState::default(), RevealState::Pending);
    }
}
