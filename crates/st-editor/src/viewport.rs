//! Viewport: which slice of the buffer is on screen.
//!
//! The viewport is the text area's scroll window: a top-left offset in
//! buffer coordinates plus the area's extent in rows and columns. After
//! [`scroll_to`](Viewport::scroll_to) the cursor is inside the window,
//! moved by the smallest scroll that gets it there.
//!
//! Columns here are char offsets, the same unit as [`Cursor::col`].
//! [`scroll_to_cell`](Viewport::scroll_to_cell) additionally scrolls until
//! the cursor's screen cell fits, for lines holding wide characters.

use unicode_width::UnicodeWidthChar;

use crate::buffer::LineBuffer;
use crate::cursor::Cursor;

/// Screen columns a buffer char takes in the text area. Control chars are
/// painted as one substitute cell.
#[must_use]
pub fn cell_width(ch: char) -> usize {
    if ch.is_control() { 1 } else { ch.width().unwrap_or(0) }
}

/// The visible window onto the buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible line.
    pub offset_row: usize,
    /// First visible column.
    pub offset_col: usize,
    /// Text-area height in rows.
    pub rows: usize,
    /// Text-area width in columns.
    pub cols: usize,
}

impl Viewport {
    /// A viewport at the origin with the given extent.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            offset_row: 0,
            offset_col: 0,
            rows,
            cols,
        }
    }

    /// Change the extent, keeping the offsets.
    pub const fn set_extent(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
    }

    /// Scroll just enough to bring `cursor` into view.
    ///
    /// A zero extent leaves the offsets alone.
    pub const fn scroll_to(&mut self, cursor: &Cursor) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        if cursor.row < self.offset_row {
            self.offset_row = cursor.row;
        }
        if cursor.col < self.offset_col {
            self.offset_col = cursor.col;
        }
        if cursor.row >= self.offset_row + self.rows {
            self.offset_row = cursor.row + 1 - self.rows;
        }
        if cursor.col >= self.offset_col + self.cols {
            self.offset_col = cursor.col + 1 - self.cols;
        }
    }

    /// [`scroll_to`](Self::scroll_to), then scroll right until the cells from
    /// the left edge up to and including the cursor's fit in `cols`.
    pub fn scroll_to_cell(&mut self, buffer: &LineBuffer, cursor: &Cursor) {
        self.scroll_to(cursor);
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let line = buffer.line(cursor.row);
        let cursor_cell = line.get_char(cursor.col).map_or(1, |ch| cell_width(ch).max(1));
        let mut before: usize = line
            .chars()
            .skip(self.offset_col)
            .take(cursor.col - self.offset_col)
            .map(cell_width)
            .sum();
        let mut leading = line.chars().skip(self.offset_col);
        while before + cursor_cell > self.cols && self.offset_col < cursor.col {
            before -= leading.next().map_or(0, cell_width);
            self.offset_col += 1;
        }
    }

    /// Whether `cursor` is inside the window.
    #[must_use]
    pub const fn contains(&self, cursor: &Cursor) -> bool {
        cursor.row >= self.offset_row
            && cursor.row < self.offset_row + self.rows
            && cursor.col >= self.offset_col
            && cursor.col < self.offset_col + self.cols
    }

    /// Line-count step for PageUp/PageDown: a quarter of the height, at
    /// least one.
    #[must_use]
    pub const fn page_step(&self) -> usize {
        let step = self.rows / 4;
        if step == 0 { 1 } else { step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_below_scrolls_down() {
        let mut vp = Viewport::new(10, 80);
        vp.scroll_to(&Cursor::at(25, 0));
        assert_eq!(vp.offset_row, 16);
        assert!(vp.contains(&Cursor::at(25, 0)));
    }

    #[test]
    fn cursor_above_scrolls_up() {
        let mut vp = Viewport::new(10, 80);
        vp.offset_row = 30;
        vp.scroll_to(&Cursor::at(12, 3));
        assert_eq!(vp.offset_row, 12);
    }

    #[test]
    fn horizontal_scroll_both_ways() {
        let mut vp = Viewport::new(5, 20);
        vp.scroll_to(&Cursor::at(0, 20));
        assert_eq!(vp.offset_col, 1);
        vp.scroll_to(&Cursor::at(0, 45));
        assert_eq!(vp.offset_col, 26);
        vp.scroll_to(&Cursor::at(0, 3));
        assert_eq!(vp.offset_col, 3);
    }

    #[test]
    fn visible_cursor_does_not_scroll() {
        let mut vp = Viewport::new(10, 10);
        vp.offset_row = 5;
        vp.offset_col = 5;
        vp.scroll_to(&Cursor::at(14, 14));
        assert_eq!((vp.offset_row, vp.offset_col), (5, 5));
    }

    #[test]
    fn zero_extent_is_a_no_op() {
        let mut vp = Viewport::new(0, 0);
        vp.offset_row = 7;
        vp.scroll_to(&Cursor::at(100, 100));
        assert_eq!((vp.offset_row, vp.offset_col), (7, 0));
    }

    #[test]
    fn wide_chars_scroll_by_display_width() {
        let buf = LineBuffer::from_text(&"中".repeat(30));
        let mut vp = Viewport::new(4, 20);
        vp.scroll_to_cell(&buf, &Cursor::at(0, 15));
        // Chars 6..15 take 18 columns, the cursor's own glyph the last two.
        assert_eq!(vp.offset_col, 6);

        vp.scroll_to_cell(&buf, &Cursor::at(0, 30));
        assert_eq!(vp.offset_col, 21);

        vp.scroll_to_cell(&buf, &Cursor::at(0, 2));
        assert_eq!(vp.offset_col, 2);
    }

    #[test]
    fn narrow_text_scrolls_as_before() {
        let buf = LineBuffer::from_text(&"x".repeat(50));
        let mut vp = Viewport::new(4, 20);
        vp.scroll_to_cell(&buf, &Cursor::at(0, 20));
        assert_eq!(vp.offset_col, 1);
    }

    #[test]
    fn cell_width_counts_controls_as_one() {
        assert_eq!(cell_width('a'), 1);
        assert_eq!(cell_width('中'), 2);
        assert_eq!(cell_width('\t'), 1);
        assert_eq!(cell_width('\u{301}'), 0);
    }

    #[test]
    fn page_step_is_a_quarter_but_at_least_one() {
        assert_eq!(Viewport::new(23, 80).page_step(), 5);
        assert_eq!(Viewport::new(3, 80).page_step(), 1);
        assert_eq!(Viewport::new(0, 0).page_step(), 1);
    }
}
