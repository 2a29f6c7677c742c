// SPDX-License-Identifier: MIT
//
// The frame buffer.
//
// One `Cell` per screen position, stored row after row in a single vector
// so a row is a contiguous slice. The editor paints a whole frame here and
// the diff renderer compares it with the frame on screen.
//
// A double-width glyph is a pair: the glyph cell and a continuation cell to
// its right. Painting over either half turns the other half into a blank,
// so the grid never holds half a pair.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

/// Grid of cells the size of the terminal.
///
/// ```
/// use st_term::buffer::FrameBuffer;
/// use st_term::cell::Cell;
///
/// let mut frame = FrameBuffer::new(80, 24);
/// frame.set(4, 2, Cell::new('*'));
/// assert_eq!(frame.get(4, 2).and_then(|c| c.character()), Some('*'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A blank grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; area(width, height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Vector index of `(x, y)`, if it is on the grid.
    #[inline]
    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.offset(x, y).map(|i| &self.cells[i])
    }

    /// Row `y`, `width` cells long.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        let start = self.offset(0, y)?;
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Glyphs of row `y` as text, continuation cells left out.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| c.character())
            .collect()
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// New extent, all blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(area(width, height), Cell::EMPTY);
    }

    /// Become a copy of `other` without reallocating when sizes match.
    pub fn copy_from(&mut self, other: &Self) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clone_from(&other.cells);
    }

    /// Store `cell` at `(x, y)` as is. `false` when off the grid.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// Paint `ch` at `(x, y)` and return how many columns it took.
    ///
    /// A double-width glyph takes two; on the last column it is painted
    /// as a blank taking one. Zero-width glyphs and positions off the grid
    /// take none.
    pub fn put_char(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
    ) -> u16 {
        let Some(i) = self.offset(x, y) else {
            return 0;
        };
        match ch.width().unwrap_or(0) {
            0 => 0,
            1 => {
                self.unpair(x, y);
                self.cells[i] = Cell::styled(ch, fg, bg, attrs);
                1
            }
            _ if x + 1 == self.width => {
                self.unpair(x, y);
                self.cells[i] = Cell::styled(' ', fg, bg, attrs);
                1
            }
            _ => {
                self.unpair(x, y);
                self.unpair(x + 1, y);
                self.cells[i] = Cell::styled(ch, fg, bg, attrs);
                self.cells[i + 1] = Cell::continuation(fg, bg, attrs);
                2
            }
        }
    }

    /// Paint `text` from `(x, y)` rightwards, stopping at the edge. Returns
    /// the columns used.
    pub fn paint_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
    ) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            col += self.put_char(col, y, ch, fg, bg, attrs);
        }
        col - x
    }

    /// Blank columns `x..width` of row `y` in the given colors.
    pub fn fill_row_from(&mut self, x: u16, y: u16, fg: CellColor, bg: CellColor) {
        for col in x..self.width {
            self.put_char(col, y, ' ', fg, bg, Attr::empty());
        }
    }

    /// Split up the wide pair that `(x, y)` belongs to, if any.
    fn unpair(&mut self, x: u16, y: u16) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        if self.cells[i].is_continuation() && x > 0 {
            self.cells[i - 1].ch = u32::from(' ');
        }
        if x + 1 < self.width && self.cells[i + 1].is_continuation() {
            self.cells[i + 1] = Cell::EMPTY;
        }
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

const fn area(width: u16, height: u16) -> usize {
    width as usize * height as usize
}
