//! View: paints a [`Session`] into a [`FrameBuffer`].
//!
//! The screen is split in two:
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │import os                               │  text area: rows 0..h-1
//! │if x: return 1           (cursor row)   │
//! │*                                       │  past end of buffer
//! │ VIEW: main.py - 2 lines saved  Row 2.. │  status line: row h-1
//! └────────────────────────────────────────┘
//! ```
//!
//! Painting is the second stage of highlighting: [`classify`] decides the
//! class of each visible char and this module turns classes into colors.
//!
//! | Class    | Foreground | Attr |
//! |----------|------------|------|
//! | Number   | yellow     | bold |
//! | String   | yellow     |      |
//! | Operator | magenta    | bold |
//! | Comment  | magenta    | bold |
//! | Keyword  | white      | bold |
//!
//! With highlighting on, the cursor row gets a blue background. Tabs show as
//! one green cell and other control chars as an inverse `?`.

use st_term::buffer::FrameBuffer;
use st_term::cell::Attr;
use st_term::color::CellColor;

use crate::highlight::{Class, classify};
use crate::session::Session;
use crate::viewport::cell_width;

/// Chars of the file path shown on the status line.
const PATH_LABEL_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Paint the text area and status line.
///
/// The viewport is taken as is; call [`Session::scroll`] first. Returns the
/// screen position of the cursor, or `None` if the screen has no text area.
pub fn render(session: &Session, frame: &mut FrameBuffer) -> Option<(u16, u16)> {
    let height = frame.height();
    if height == 0 || frame.width() == 0 {
        return None;
    }
    let text_rows = height - 1;

    for y in 0..text_rows {
        let row = session.viewport.offset_row + usize::from(y);
        if row < session.buffer.line_count() {
            paint_line(session, frame, row, y);
        } else {
            frame.put_char(0, y, '*', CellColor::BLUE, CellColor::Default, Attr::empty());
        }
    }

    paint_status(session, frame, text_rows);
    cursor_position(session, frame.width(), text_rows)
}

// ---------------------------------------------------------------------------
// Text area
// ---------------------------------------------------------------------------

/// Foreground and attributes for a class.
const fn class_style(class: Class) -> (CellColor, Attr) {
    match class {
        Class::Plain => (CellColor::Default, Attr::empty()),
        Class::Number => (CellColor::YELLOW, Attr::BOLD),
        Class::String => (CellColor::YELLOW, Attr::empty()),
        Class::Operator | Class::Comment => (CellColor::MAGENTA, Attr::BOLD),
        Class::Keyword => (CellColor::WHITE, Attr::BOLD),
    }
}

fn paint_line(session: &Session, frame: &mut FrameBuffer, row: usize, y: u16) {
    let line = session.buffer.line_string(row);
    let width = usize::from(frame.width());

    // Chars that fit on screen from the left edge of the viewport.
    let visible = line
        .chars()
        .skip(session.viewport.offset_col)
        .scan(0usize, |used, ch| {
            *used += cell_width(ch);
            (*used <= width).then_some(ch)
        })
        .count();

    let classes = if session.highlight {
        classify(&line, session.viewport.offset_col, visible)
    } else {
        vec![Class::Plain; visible]
    };
    let row_bg = if session.highlight && row == session.cursor.row {
        CellColor::BLUE
    } else {
        CellColor::Default
    };

    let mut x: u16 = 0;
    let chars = line.chars().skip(session.viewport.offset_col);
    for (ch, class) in chars.zip(classes) {
        x += match ch {
            '\t' => {
                let bg = if row_bg.is_default() { CellColor::GREEN } else { row_bg };
                frame.put_char(x, y, ' ', CellColor::Default, bg, Attr::empty())
            }
            c if c.is_control() => frame.put_char(x, y, '?', CellColor::Default, row_bg, Attr::INVERSE),
            c => {
                let (fg, attrs) = class_style(class);
                frame.put_char(x, y, c, fg, row_bg, attrs)
            }
        };
    }
    frame.fill_row_from(x, y, CellColor::Default, row_bg);
}

/// Where the cursor lands on screen: its row in the text area and the
/// display width of the chars between the viewport edge and it.
fn cursor_position(session: &Session, width: u16, text_rows: u16) -> Option<(u16, u16)> {
    let cursor = session.cursor;
    let vp = session.viewport;
    if text_rows == 0 || cursor.row < vp.offset_row || cursor.col < vp.offset_col {
        return None;
    }
    let y = u16::try_from(cursor.row - vp.offset_row).ok().filter(|&y| y < text_rows)?;

    let line = session.buffer.line(cursor.row);
    let x: usize = line
        .chars()
        .skip(vp.offset_col)
        .take(cursor.col - vp.offset_col)
        .map(cell_width)
        .sum();
    let x = u16::try_from(x).unwrap_or(u16::MAX).min(width - 1);
    Some((x, y))
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// Left and right halves of the status line.
///
/// The left is `" MODE: "` then either the pending message or the file
/// summary with slot markers. The right is `" Row r, Col c "`, 1-based.
#[must_use]
pub fn status_text(session: &Session) -> (String, String) {
    let mut left = format!(" {}: ", session.mode.display_name());
    if let Some(msg) = session.message() {
        left.push_str(msg);
    } else {
        let label: String = session.path_label().chars().take(PATH_LABEL_LEN).collect();
        let state = if session.is_dirty() { "modified" } else { "saved" };
        left.push_str(&format!("{label} - {} lines {state}", session.buffer.line_count()));
        if !session.clipboard.is_empty() {
            left.push_str(" [Copy]");
        }
        if !session.undo.is_empty() {
            left.push_str(" [Undo]");
        }
    }

    let right = format!(" Row {}, Col {} ", session.cursor.row + 1, session.cursor.col + 1);
    (left, right)
}

fn paint_status(session: &Session, frame: &mut FrameBuffer, y: u16) {
    let (fg, bg) = (CellColor::BLACK, CellColor::WHITE);
    let (left, right) = status_text(session);

    let right_len = u16::try_from(right.chars().count()).unwrap_or(u16::MAX);
    let right_x = frame.width().saturating_sub(right_len);

    let left: String = left.chars().take(usize::from(right_x)).collect();
    let used = frame.paint_text(0, y, &left, fg, bg, Attr::empty());
    frame.fill_row_from(used, y, fg, bg);
    frame.paint_text(right_x, y, &right, fg, bg, Attr::empty());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
