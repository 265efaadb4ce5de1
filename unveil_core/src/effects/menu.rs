// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mobile menu toggle.

/// Class toggled on `body` while the menu is open.
pub const MENU_OPEN_CLASS: &str = "menu-open";

/// Open/closed state of the mobile menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuToggle {
    open: bool,
}

impl MenuToggle {
    /// Creates a closed menu.
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Returns `true` while the menu is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.open
    }

    /// Flips the menu and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Re-synchronizes with the class actually present on the page.
    pub fn sync(&mut self, open: bool) {
        self.open = open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips() {
        let mut menu = MenuToggle::new();
        assert!(menu.toggle());
        assert!(!menu.toggle());
        menu.sync(true);
        assert!(menu.is_open(), "sync overrides local state");
    }
}
