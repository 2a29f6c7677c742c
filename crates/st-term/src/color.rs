// SPDX-License-Identifier: MIT
//
// Cell colors.
//
// The editor paints with the 16-color ANSI palette plus the terminal's own
// default, so the user's color scheme decides the actual shades.
//
// Palette indices 0-7 are the normal colors, 8-15 their bright variants.
// Anything above 15 goes through the 256-color extended SGR form.

use std::fmt;

// ─── CellColor ──────────────────────────────────────────────────────────────

/// A fully resolved color stored in a [`Cell`](crate::cell::Cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    pub const BLACK: Self = Self::Ansi256(0);
    pub const GREEN: Self = Self::Ansi256(2);
    pub const YELLOW: Self = Self::Ansi256(3);
    pub const BLUE: Self = Self::Ansi256(4);
    pub const MAGENTA: Self = Self::Ansi256(5);
    pub const WHITE: Self = Self::Ansi256(7);

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => f.write_str("default"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_terminal_default() {
        assert_eq!(CellColor::default(), CellColor::Default);
        assert!(CellColor::Default.is_default());
        assert!(!CellColor::BLUE.is_default());
    }

    #[test]
    fn named_colors_map_to_palette() {
        assert_eq!(CellColor::BLACK, CellColor::Ansi256(0));
        assert_eq!(CellColor::YELLOW, CellColor::Ansi256(3));
        assert_eq!(CellColor::WHITE, CellColor::Ansi256(7));
    }

    #[test]
    fn display_format() {
        assert_eq!(CellColor::MAGENTA.to_string(), "ansi(5)");
        assert_eq!(CellColor::Default.to_string(), "default");
    }
}
