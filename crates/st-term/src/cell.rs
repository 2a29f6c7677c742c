// SPDX-License-Identifier: MIT
//
// Screen cells.
//
// The frame buffer is a grid of `Cell`s: a codepoint, two colors and the
// SGR attributes smoltext uses. A double-width glyph takes two cells; the
// right one is a continuation (codepoint 0) with the same colors, so a
// background covers both columns.

use std::fmt;

use crate::color::CellColor;

bitflags::bitflags! {
    /// SGR attributes of a cell.
    ///
    /// ```
    /// use st_term::cell::Attr;
    ///
    /// let keyword = Attr::BOLD;
    /// assert!((keyword | Attr::INVERSE).contains(Attr::BOLD));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD      = 0b0_0001;
        /// SGR 2.
        const DIM       = 0b0_0010;
        /// SGR 3.
        const ITALIC    = 0b0_0100;
        /// SGR 4.
        const UNDERLINE = 0b0_1000;
        /// SGR 7, foreground and background swapped.
        const INVERSE   = 0b1_0000;
    }
}

/// One screen position.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Codepoint shown; `0` marks the right half of a wide glyph.
    pub ch: u32,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

const WIDE_TAIL: u32 = 0;

impl Cell {
    /// A blank in the terminal's default colors.
    pub const EMPTY: Self = Self::new(' ');

    /// `ch` in default colors.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self::styled(ch, CellColor::Default, CellColor::Default, Attr::empty())
    }

    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: ch as u32,
            fg,
            bg,
            attrs,
        }
    }

    /// Right half of a wide glyph styled like its left half.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: WIDE_TAIL,
            fg,
            bg,
            attrs,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == WIDE_TAIL
    }

    /// Same as [`Cell::EMPTY`].
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.ch == Self::EMPTY.ch
            && self.fg.is_default()
            && self.bg.is_default()
            && self.attrs.is_empty()
    }

    /// The glyph, or `None` for a continuation.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.is_continuation() {
            None
        } else {
            char::from_u32(self.ch)
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(ch) = self.character() else {
            return f.write_str("Cell(continuation)");
        };
        write!(f, "Cell({ch:?}")?;
        if !self.fg.is_default() {
            write!(f, ", fg={}", self.fg)?;
        }
        if !self.bg.is_default() {
            write!(f, ", bg={}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_plain_blank() {
        let blank = Cell::default();
        assert!(blank.is_empty());
        assert_eq!(blank.character(), Some(' '));
        assert_eq!(blank, Cell::new(' '));
    }

    #[test]
    fn coloured_blank_is_not_empty() {
        assert!(!Cell::EMPTY.with_bg(CellColor::GREEN).is_empty());
        assert!(!Cell::new('t').is_empty());
    }

    #[test]
    fn styled_cell_carries_all_fields() {
        let op = Cell::styled('=', CellColor::MAGENTA, CellColor::BLUE, Attr::BOLD);
        assert_eq!(op.character(), Some('='));
        assert_eq!((op.fg, op.bg, op.attrs), (CellColor::MAGENTA, CellColor::BLUE, Attr::BOLD));
    }

    #[test]
    fn continuation_is_glyphless_but_coloured() {
        let tail = Cell::continuation(CellColor::Default, CellColor::BLUE, Attr::empty());
        assert!(tail.is_continuation());
        assert_eq!(tail.character(), None);
        assert_eq!(tail.bg, CellColor::BLUE);
        assert!(!Cell::EMPTY.is_continuation());
    }

    #[test]
    fn color_builders_leave_glyph_alone() {
        let c = Cell::new('w').with_fg(CellColor::BLACK).with_bg(CellColor::WHITE);
        assert_eq!(c.character(), Some('w'));
        assert_eq!((c.fg, c.bg), (CellColor::BLACK, CellColor::WHITE));
    }

    #[test]
    fn debug_lists_non_default_fields() {
        assert_eq!(format!("{:?}", Cell::new('a')), "Cell('a')");
        let num = format!("{:?}", Cell::styled('7', CellColor::YELLOW, CellColor::Default, Attr::BOLD));
        assert!(num.contains("fg=ansi(3)"), "{num}");
        assert!(num.contains("BOLD"), "{num}");
        assert!(!num.contains("bg="), "{num}");

        let tail = Cell::continuation(CellColor::Default, CellColor::Default, Attr::empty());
        assert_eq!(format!("{tail:?}"), "Cell(continuation)");
    }
}
