//! Edit engine: the operations that change the buffer.
//!
//! Every operation works at the session cursor, keeps the cursor inside the
//! buffer, and keeps at least one line in the buffer. Operations that turn
//! out to change nothing (Backspace at the very start, cutting the only
//! line, restoring with no snapshot) leave the dirty flag alone.
//!
//! | Operation          | Key (mode)     | Effect                               |
//! |--------------------|----------------|--------------------------------------|
//! | `insert_char`      | text (Edit)    | insert at cursor, cursor right       |
//! | `insert_tab`       | Tab (Edit)     | `tab_width` spaces in one step       |
//! | `delete_backward`  | Backspace      | remove char left, or join lines      |
//! | `split_line`       | Enter (Edit)   | break line at cursor                 |
//! | `copy_line`        | `c` (View)     | cursor line to clipboard             |
//! | `cut_line`         | `d` (View)     | copy, then remove unless only line   |
//! | `paste_line`       | `p` (View)     | clipboard line below cursor          |
//! | `snapshot`         | `s` (View)     | buffer to undo slot                  |
//! | `restore`          | `l` (View)     | undo slot to buffer                  |
//! | `save`             | `w` (View)     | buffer to file                       |

use crate::cursor::Cursor;
use crate::error::Result;
use crate::session::Session;

impl Session {
    // -- Text entry ---------------------------------------------------------

    /// Insert `ch` at the cursor and move past it.
    ///
    /// `'\t'` goes through [`insert_tab`](Self::insert_tab) and `'\n'`
    /// through [`split_line`](Self::split_line).
    pub fn insert_char(&mut self, ch: char) {
        match ch {
            '\t' => self.insert_tab(),
            '\n' => self.split_line(),
            _ => {
                let Cursor { row, col } = self.cursor;
                self.buffer.insert_char(row, col, ch);
                self.cursor.col += 1;
            }
        }
    }

    /// Insert `tab_width` spaces at the cursor as one edit.
    pub fn insert_tab(&mut self) {
        let Cursor { row, col } = self.cursor;
        let width = self.options.tab_width;
        self.buffer.insert_str(row, col, &" ".repeat(width));
        self.cursor.col += width;
    }

    /// Remove the char left of the cursor. At column 0, join the line onto
    /// the previous one. At the start of the buffer, do nothing.
    pub fn delete_backward(&mut self) {
        let Cursor { row, col } = self.cursor;
        if col > 0 {
            self.buffer.remove_char(row, col - 1);
            self.cursor.col -= 1;
        } else if row > 0 {
            let joined_at = self.buffer.join_with_next(row - 1);
            self.cursor = Cursor::at(row - 1, joined_at);
        }
    }

    /// Break the line at the cursor; the cursor goes to the start of the
    /// new line.
    pub fn split_line(&mut self) {
        let Cursor { row, col } = self.cursor;
        self.buffer.split(row, col);
        self.cursor = Cursor::at(row + 1, 0);
    }

    // -- Clipboard ----------------------------------------------------------

    /// Copy the cursor line into the clipboard.
    pub fn copy_line(&mut self) {
        let line = self.buffer.line_string(self.cursor.row);
        tracing::debug!(target: "edit", row = self.cursor.row, len = line.len(), "line_copied");
        self.clipboard.store(line);
    }

    /// Copy the cursor line, then remove it unless it is the only line.
    ///
    /// Below the first row the cursor moves to the start of the line above.
    pub fn cut_line(&mut self) {
        self.copy_line();
        let row = self.cursor.row;
        if !self.buffer.remove_line(row) {
            return;
        }
        if row > 0 {
            self.cursor = Cursor::at(row - 1, 0);
        }
        self.cursor.clamp(&self.buffer);
        tracing::debug!(target: "edit", row, "line_cut");
    }

    /// Insert a copy of the clipboard line below the cursor and move to it.
    ///
    /// With an empty clipboard a blank line is inserted.
    pub fn paste_line(&mut self) {
        let text = self.clipboard.get().unwrap_or_default().to_owned();
        let row = self.cursor.row + 1;
        self.buffer.insert_line(row, &text);
        self.cursor = Cursor::at(row, 0);
        tracing::debug!(target: "edit", row, len = text.len(), "line_pasted");
    }

    // -- Undo ---------------------------------------------------------------

    /// Keep a copy of the whole buffer in the undo slot.
    pub fn snapshot(&mut self) {
        self.undo.store(self.buffer.snapshot());
        tracing::debug!(target: "edit", line_count = self.buffer.line_count(), "snapshot_taken");
    }

    /// Replace the buffer with the undo slot's copy. The slot keeps it.
    pub fn restore(&mut self) {
        let Some(snapshot) = self.undo.get() else {
            return;
        };
        self.buffer.restore(snapshot);
        self.cursor.clamp(&self.buffer);
        tracing::debug!(target: "edit", line_count = self.buffer.line_count(), "snapshot_restored");
    }

    // -- Persistence --------------------------------------------------------

    /// Write the buffer to the bound path.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`](crate::error::EditorError::Save) if the write
    /// fails. The buffer stays dirty.
    pub fn save(&mut self) -> Result<()> {
        self.buffer.save_to(&self.path)
    }
}
