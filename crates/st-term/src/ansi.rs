// SPDX-License-Identifier: MIT
//
// Escape sequence writers.
//
// Each function writes one control sequence to an `impl Write` and keeps no
// state. Deciding what to send is left to the diff renderer's `Pen` and to
// `Terminal`.
//
// Coordinates are 0-based here; CUP wants them 1-based.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

macro_rules! fixed_sequences {
    ($($(#[$doc:meta])* $name:ident => $bytes:literal;)*) => {$(
        $(#[$doc])*
        #[inline]
        pub fn $name(w: &mut impl Write) -> io::Result<()> {
            w.write_all($bytes)
        }
    )*};
}

fixed_sequences! {
    /// DECTCEM off.
    cursor_hide => b"\x1b[?25l";
    /// DECTCEM on.
    cursor_show => b"\x1b[?25h";
    /// ED 2.
    clear_screen => b"\x1b[2J";
    /// SGR 0. Whoever tracks the current style must forget it.
    reset => b"\x1b[0m";
    /// Start a synchronized update (mode 2026). The terminal holds the
    /// screen until [`end_sync`], so nobody sees half a frame.
    begin_sync => b"\x1b[?2026h";
    /// Finish a synchronized update.
    end_sync => b"\x1b[?2026l";
    /// Switch to the alternate screen (mode 1049).
    enter_alt_screen => b"\x1b[?1049h";
    /// Back to the main screen, which shows the shell again.
    exit_alt_screen => b"\x1b[?1049l";
}

/// CUP to column `x`, row `y`.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Foreground: 30-37, 90-97, or `38;5;N`.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    sgr_color(w, color, 30)
}

/// Background: 40-47, 100-107, or `48;5;N`.
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    sgr_color(w, color, 40)
}

/// `base` is 30 for foreground and 40 for background.
fn sgr_color(w: &mut impl Write, color: CellColor, base: u16) -> io::Result<()> {
    match color {
        CellColor::Default => write!(w, "\x1b[{}m", base + 9),
        CellColor::Ansi256(n @ 0..=7) => write!(w, "\x1b[{}m", base + u16::from(n)),
        CellColor::Ansi256(n @ 8..=15) => write!(w, "\x1b[{}m", base + 60 + u16::from(n - 8)),
        CellColor::Ansi256(n) => write!(w, "\x1b[{};5;{n}m", base + 8),
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────────

const ATTR_CODES: [(Attr, u8); 5] = [
    (Attr::BOLD, 1),
    (Attr::DIM, 2),
    (Attr::ITALIC, 3),
    (Attr::UNDERLINE, 4),
    (Attr::INVERSE, 7),
];

/// All set attributes in one SGR, e.g. `\x1b[1;7m`. Nothing for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    if attr.is_empty() {
        return Ok(());
    }
    let mut sep = "\x1b[";
    for (flag, code) in ATTR_CODES {
        if attr.contains(flag) {
            write!(w, "{sep}{code}")?;
            sep = ";";
        }
    }
    w.write_all(b"m")
}

// ─── Cursor Shape ───────────────────────────────────────────────────────────

/// DECSCUSR shapes. View mode uses a block, Edit mode a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the user's terminal is configured with.
    #[default]
    Default,
    SteadyBlock,
    SteadyUnderline,
    /// I-beam.
    SteadyBar,
}

impl CursorShape {
    const fn code(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::SteadyBlock => 2,
            Self::SteadyUnderline => 4,
            Self::SteadyBar => 6,
        }
    }
}

/// DECSCUSR.
#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    write!(w, "\x1b[{} q", shape.code())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
