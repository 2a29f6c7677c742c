//! Cursor: a (row, col) position with buffer-aware movement.
//!
//! The cursor is a plain value. It does not hold a reference to the buffer;
//! every movement takes the buffer as a parameter and leaves the cursor
//! inside it:
//!
//! - `row < line_count()`
//! - `col <= line_len(row)` (the cursor may sit just past the last char)
//!
//! Horizontal movement wraps across line ends. Vertical movement clamps the
//! column to the new line's length; there is no remembered "sticky" column.

use crate::buffer::LineBuffer;

/// A position in a [`LineBuffer`], in lines and chars.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Line index.
    pub row: usize,
    /// Char offset within the line.
    pub col: usize,
}

impl Cursor {
    /// The cursor at `(row, col)`. Not clamped.
    #[must_use]
    pub const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Pull the cursor back inside `buf`.
    pub fn clamp(&mut self, buf: &LineBuffer) {
        self.row = self.row.min(buf.line_count() - 1);
        self.col = self.col.min(buf.line_len(self.row));
    }

    // -- Horizontal ---------------------------------------------------------

    /// One char left; from column 0, the end of the previous line.
    pub fn left(&mut self, buf: &LineBuffer) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = buf.line_len(self.row);
        }
    }

    /// One char right; from the end of a line, the start of the next.
    pub fn right(&mut self, buf: &LineBuffer) {
        if self.col < buf.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < buf.line_count() {
            self.row += 1;
            self.col = 0;
        }
    }

    /// Start of the line.
    pub const fn home(&mut self) {
        self.col = 0;
    }

    /// Just past the last char of the line.
    pub fn end(&mut self, buf: &LineBuffer) {
        self.col = buf.line_len(self.row);
    }

    // -- Vertical -----------------------------------------------------------

    /// One line up, if there is one.
    pub fn up(&mut self, buf: &LineBuffer) {
        self.page_up(buf, 1);
    }

    /// One line down, if there is one.
    pub fn down(&mut self, buf: &LineBuffer) {
        self.page_down(buf, 1);
    }

    /// `step` lines up, stopping at the first line.
    pub fn page_up(&mut self, buf: &LineBuffer, step: usize) {
        self.row = self.row.saturating_sub(step);
        self.col = self.col.min(buf.line_len(self.row));
    }

    /// `step` lines down, stopping at the last line.
    pub fn page_down(&mut self, buf: &LineBuffer, step: usize) {
        self.row = self.row.saturating_add(step).min(buf.line_count() - 1);
        self.col = self.col.min(buf.line_len(self.row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf() -> LineBuffer {
        LineBuffer::from_text("hello\nhi\n\nlonger line")
    }

    #[test]
    fn clamp_pulls_cursor_inside() {
        let b = buf();
        let mut c = Cursor::at(10, 50);
        c.clamp(&b);
        assert_eq!(c, Cursor::at(3, 11));

        let mut c = Cursor::at(1, 9);
        c.clamp(&b);
        assert_eq!(c, Cursor::at(1, 2));
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        let b = buf();
        let mut c = Cursor::at(1, 0);
        c.left(&b);
        assert_eq!(c, Cursor::at(0, 5));
    }

    #[test]
    fn left_at_origin_stays() {
        let b = buf();
        let mut c = Cursor::default();
        c.left(&b);
        assert_eq!(c, Cursor::at(0, 0));
    }

    #[test]
    fn right_wraps_to_next_line_start() {
        let b = buf();
        let mut c = Cursor::at(0, 5);
        c.right(&b);
        assert_eq!(c, Cursor::at(1, 0));
    }

    #[test]
    fn right_at_buffer_end_stays() {
        let b = buf();
        let mut c = Cursor::at(3, 11);
        c.right(&b);
        assert_eq!(c, Cursor::at(3, 11));
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let b = buf();
        let mut c = Cursor::at(0, 4);
        c.down(&b);
        assert_eq!(c, Cursor::at(1, 2));
        c.down(&b);
        assert_eq!(c, Cursor::at(2, 0));
        c.down(&b);
        assert_eq!(c, Cursor::at(3, 0));
        c.down(&b);
        assert_eq!(c, Cursor::at(3, 0));
        c.up(&b);
        c.up(&b);
        c.up(&b);
        c.up(&b);
        assert_eq!(c, Cursor::at(0, 0));
    }

    #[test]
    fn home_and_end() {
        let b = buf();
        let mut c = Cursor::at(3, 4);
        c.end(&b);
        assert_eq!(c.col, 11);
        c.home();
        assert_eq!(c.col, 0);
    }

    #[test]
    fn paging_stops_at_bounds() {
        let b = buf();
        let mut c = Cursor::at(1, 1);
        c.page_down(&b, 100);
        assert_eq!(c, Cursor::at(3, 1));
        c.end(&b);
        c.page_up(&b, 2);
        assert_eq!(c, Cursor::at(1, 2));
        c.page_up(&b, 100);
        assert_eq!(c, Cursor::at(0, 2));
    }

    #[test]
    fn paging_clamps_column_to_landing_line() {
        let b = buf();
        let mut c = Cursor::at(0, 4);
        c.page_down(&b, 2);
        assert_eq!(c, Cursor::at(2, 0));
        c.page_down(&b, 1);
        assert_eq!(c, Cursor::at(3, 0));
    }
}
