//! Line buffer: the text being edited.
//!
//! A `LineBuffer` wraps a [`ropey::Rope`] and exposes it as an ordered list of
//! lines. Lines are separated by `\n` in the rope and never contain a line
//! terminator themselves; the rope is built with LF as its only break.
//!
//! # Design choices
//!
//! - **At least one line, always.** An empty rope is one empty line, and a
//!   rope ending in `\n` has a trailing empty line. This is exactly the shape
//!   the editor shows, so `line_count()` never returns 0.
//!
//! - **Columns are char offsets.** Column 3 of `"café"` is `'é'`. Byte
//!   offsets never leak out of this module.
//!
//! - **Load splits verbatim, save joins verbatim.** The file text, with
//!   `\r\n` folded to `\n`, *is* the rope. Saving writes the rope back, so
//!   lines are joined by `\n` with nothing after the last one, and a file
//!   loaded and saved without edits is unchanged.
//!
//! - **Snapshots are rope clones.** Ropey shares structure between clones and
//!   copies on write, so a [`Snapshot`] is cheap to take and never changes
//!   when the buffer is edited afterwards.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ropey::{Rope, RopeSlice};

use crate::error::{EditorError, Result};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A frozen copy of a buffer's text.
#[derive(Clone)]
pub struct Snapshot {
    rope: Rope,
}

impl Snapshot {
    /// Number of lines in the snapshot.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The snapshot's lines as owned strings.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.rope.to_string().split('\n').map(str::to_owned).collect()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("lines", &self.line_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// LineBuffer
// ---------------------------------------------------------------------------

/// An ordered sequence of lines, indexed `0..line_count()`.
///
/// Row and column arguments are expected to be in range; callers keep the
/// cursor clamped. Out-of-range rows panic, the same way slice indexing does.
pub struct LineBuffer {
    rope: Rope,
    modified: bool,
}

impl LineBuffer {
    // -- Construction -------------------------------------------------------

    /// A buffer with one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
        }
    }

    /// A buffer holding `text`, split on `\n`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize(text)),
            modified: false,
        }
    }

    /// Read a file into a new buffer.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD and `\r\n` becomes `\n`.
    ///
    /// # Errors
    ///
    /// [`EditorError::Load`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| EditorError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let buf = Self::from_text(&text);

        tracing::debug!(
            target: "io",
            file = %path.display(),
            size_bytes = bytes.len(),
            line_count = buf.line_count(),
            "file_read_ok"
        );
        Ok(buf)
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines. Never 0.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line `row` without its terminator.
    ///
    /// # Panics
    ///
    /// Panics if `row >= line_count()`.
    #[must_use]
    pub fn line(&self, row: usize) -> RopeSlice<'_> {
        let line = self.rope.line(row);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            line.slice(..len - 1)
        } else {
            line
        }
    }

    /// Number of chars in line `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= line_count()`.
    #[inline]
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.line(row).len_chars()
    }

    /// Line `row` as an owned string.
    ///
    /// # Panics
    ///
    /// Panics if `row >= line_count()`.
    #[must_use]
    pub fn line_string(&self, row: usize) -> String {
        self.line(row).to_string()
    }

    /// All lines as owned strings.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|row| self.line_string(row)).collect()
    }

    /// The whole text, lines joined by `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    fn char_idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(col <= self.line_len(row), "column {col} past end of row {row}");
        self.rope.line_to_char(row) + col
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` before column `col` of line `row`.
    ///
    /// `ch` must not be `\n`; use [`split`](Self::split) to break a line.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) {
        debug_assert_ne!(ch, '\n');
        let idx = self.char_idx(row, col);
        self.rope.insert_char(idx, ch);
        self.modified = true;
    }

    /// Insert `text` (no `\n`) before column `col` of line `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn insert_str(&mut self, row: usize, col: usize, text: &str) {
        debug_assert!(!text.contains('\n'));
        let idx = self.char_idx(row, col);
        self.rope.insert(idx, text);
        self.modified = true;
    }

    /// Remove the char at column `col` of line `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn remove_char(&mut self, row: usize, col: usize) {
        debug_assert!(col < self.line_len(row));
        let idx = self.char_idx(row, col);
        self.rope.remove(idx..=idx);
        self.modified = true;
    }

    /// Break line `row` at `col`: the tail becomes a new line at `row + 1`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn split(&mut self, row: usize, col: usize) {
        let idx = self.char_idx(row, col);
        self.rope.insert_char(idx, '\n');
        self.modified = true;
    }

    /// Append line `row + 1` to line `row` and remove it.
    ///
    /// Returns the length line `row` had before the join, which is where the
    /// joined text starts.
    ///
    /// # Panics
    ///
    /// Panics if `row + 1 >= line_count()`.
    pub fn join_with_next(&mut self, row: usize) -> usize {
        assert!(row + 1 < self.line_count(), "no line after row {row}");
        let len = self.line_len(row);
        let idx = self.char_idx(row, len);
        self.rope.remove(idx..=idx);
        self.modified = true;
        len
    }

    /// Insert `text` as a new line at index `at`, shifting later lines down.
    /// `at == line_count()` appends.
    ///
    /// # Panics
    ///
    /// Panics if `at > line_count()`.
    pub fn insert_line(&mut self, at: usize, text: &str) {
        debug_assert!(!text.contains('\n'));
        let count = self.line_count();
        assert!(at <= count, "line index {at} past end ({count} lines)");

        if at == count {
            let end = self.rope.len_chars();
            self.rope.insert(end, &format!("\n{text}"));
        } else {
            let idx = self.rope.line_to_char(at);
            self.rope.insert(idx, &format!("{text}\n"));
        }
        self.modified = true;
    }

    /// Remove line `row`. The last remaining line is never removed; this
    /// returns `false` and leaves the buffer alone in that case.
    ///
    /// # Panics
    ///
    /// Panics if `row >= line_count()`.
    pub fn remove_line(&mut self, row: usize) -> bool {
        let count = self.line_count();
        assert!(row < count, "line index {row} past end ({count} lines)");
        if count == 1 {
            return false;
        }

        let start = self.rope.line_to_char(row);
        if row + 1 < count {
            let end = self.rope.line_to_char(row + 1);
            self.rope.remove(start..end);
        } else {
            // Last line: take the terminator of the line above with it.
            let end = self.rope.len_chars();
            self.rope.remove(start - 1..end);
        }
        self.modified = true;
        true
    }

    // -- Snapshots ----------------------------------------------------------

    /// Freeze the current text.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rope: self.rope.clone(),
        }
    }

    /// Replace the text with a copy of `snapshot`.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.rope = snapshot.rope.clone();
        self.modified = true;
    }

    // -- Persistence --------------------------------------------------------

    /// True if the text changed since load or the last successful save.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write the text to `path`, replacing any existing file. Clears the
    /// modified flag on success only.
    ///
    /// # Errors
    ///
    /// [`EditorError::Save`] if the file cannot be created or written.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let write = || -> std::io::Result<()> {
            let mut out = BufWriter::new(File::create(path)?);
            self.rope.write_to(&mut out)?;
            out.flush()
        };
        write().map_err(|source| EditorError::Save {
            path: path.to_path_buf(),
            source,
        })?;

        self.modified = false;
        tracing::debug!(
            target: "io",
            file = %path.display(),
            size_bytes = self.rope.len_bytes(),
            line_count = self.line_count(),
            "file_write_ok"
        );
        Ok(())
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("lines", &self.line_count())
            .field("chars", &self.rope.len_chars())
            .field("modified", &self.modified)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fold `\r\n` into `\n`. Lone `\r` is kept as an ordinary character.
fn normalize(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains("\r\n") {
        text.replace("\r\n", "\n").into()
    } else {
        text.into()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(buf: &LineBuffer) -> Vec<String> {
        buf.lines()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_has_one_empty_line() {
        let buf = LineBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_len(0), 0);
        assert!(!buf.is_modified());
    }

    #[test]
    fn from_text_splits_on_newline() {
        let buf = LineBuffer::from_text("fn main() {\n    ok\n}");
        assert_eq!(lines(&buf), vec!["fn main() {", "    ok", "}"]);
    }

    #[test]
    fn trailing_newline_gives_empty_last_line() {
        let buf = LineBuffer::from_text("a\nb\n");
        assert_eq!(lines(&buf), vec!["a", "b", ""]);
        assert_eq!(buf.text(), "a\nb\n");
    }

    #[test]
    fn crlf_is_folded() {
        let buf = LineBuffer::from_text("a\r\nb\r\n");
        assert_eq!(lines(&buf), vec!["a", "b", ""]);
    }

    #[test]
    fn only_lf_breaks_lines() {
        let buf = LineBuffer::from_text("a\rb\u{2028}c\u{c}d");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_len(0), 7);
    }

    #[test]
    fn columns_are_chars() {
        let buf = LineBuffer::from_text("café中");
        assert_eq!(buf.line_len(0), 5);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_char_shifts_suffix() {
        let mut buf = LineBuffer::from_text("hllo");
        buf.insert_char(0, 1, 'e');
        assert_eq!(buf.line_string(0), "hello");
        assert!(buf.is_modified());
    }

    #[test]
    fn insert_at_end_of_line() {
        let mut buf = LineBuffer::from_text("ab\ncd");
        buf.insert_char(0, 2, '!');
        buf.insert_str(1, 2, "ef");
        assert_eq!(lines(&buf), vec!["ab!", "cdef"]);
    }

    #[test]
    fn remove_char_in_middle() {
        let mut buf = LineBuffer::from_text("abc");
        buf.remove_char(0, 1);
        assert_eq!(buf.line_string(0), "ac");
    }

    #[test]
    fn split_in_middle_and_at_ends() {
        let mut buf = LineBuffer::from_text("abcd");
        buf.split(0, 2);
        assert_eq!(lines(&buf), vec!["ab", "cd"]);
        buf.split(1, 2);
        assert_eq!(lines(&buf), vec!["ab", "cd", ""]);
        buf.split(0, 0);
        assert_eq!(lines(&buf), vec!["", "ab", "cd", ""]);
    }

    #[test]
    fn join_with_next_returns_old_length() {
        let mut buf = LineBuffer::from_text("ab\ncd\nef");
        assert_eq!(buf.join_with_next(0), 2);
        assert_eq!(lines(&buf), vec!["abcd", "ef"]);
        assert_eq!(buf.join_with_next(0), 4);
        assert_eq!(lines(&buf), vec!["abcdef"]);
    }

    #[test]
    #[should_panic(expected = "no line after row")]
    fn join_last_line_panics() {
        let mut buf = LineBuffer::from_text("only");
        buf.join_with_next(0);
    }

    #[test]
    fn insert_line_anywhere() {
        let mut buf = LineBuffer::from_text("a\nc");
        buf.insert_line(1, "b");
        buf.insert_line(0, "top");
        buf.insert_line(4, "end");
        assert_eq!(lines(&buf), vec!["top", "a", "b", "c", "end"]);
    }

    #[test]
    fn insert_empty_line_at_end() {
        let mut buf = LineBuffer::new();
        buf.insert_line(1, "");
        assert_eq!(lines(&buf), vec!["", ""]);
    }

    #[test]
    fn remove_line_middle_and_last() {
        let mut buf = LineBuffer::from_text("a\nb\nc");
        assert!(buf.remove_line(1));
        assert_eq!(lines(&buf), vec!["a", "c"]);
        assert!(buf.remove_line(1));
        assert_eq!(lines(&buf), vec!["a"]);
    }

    #[test]
    fn remove_only_line_is_refused() {
        let mut buf = LineBuffer::from_text("keep me");
        assert!(!buf.remove_line(0));
        assert_eq!(lines(&buf), vec!["keep me"]);
        assert!(!buf.is_modified());
    }

    // -- Snapshots ----------------------------------------------------------

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut buf = LineBuffer::from_text("one\ntwo");
        let snap = buf.snapshot();
        buf.insert_char(0, 0, 'X');
        buf.remove_line(1);
        assert_eq!(snap.lines(), vec!["one", "two"]);

        buf.restore(&snap);
        assert_eq!(lines(&buf), vec!["one", "two"]);
        assert!(buf.is_modified());

        buf.insert_char(1, 3, 's');
        assert_eq!(snap.lines(), vec!["one", "two"]);
    }

    // -- Persistence --------------------------------------------------------

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");

        let mut buf = LineBuffer::from_text("alpha\n\tbeta\n");
        buf.insert_char(0, 0, '>');
        buf.save_to(&path).unwrap();
        assert!(!buf.is_modified());
        assert_eq!(fs::read_to_string(&path).unwrap(), ">alpha\n\tbeta\n");

        let loaded = LineBuffer::load(&path).unwrap();
        assert_eq!(lines(&loaded), vec![">alpha", "\tbeta", ""]);
        assert!(!loaded.is_modified());
    }

    #[test]
    fn save_has_no_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut buf = LineBuffer::from_text("a");
        buf.insert_line(1, "b");
        buf.save_to(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a\nb");
    }

    #[test]
    fn load_decodes_invalid_utf8_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        fs::write(&path, b"ok\xff\r\nnext").unwrap();

        let buf = LineBuffer::load(&path).unwrap();
        assert_eq!(lines(&buf), vec!["ok\u{FFFD}", "next"]);
    }

    #[test]
    fn load_missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineBuffer::load(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, EditorError::Load { .. }));
    }

    #[test]
    fn failed_save_keeps_modified_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.txt");
        let mut buf = LineBuffer::from_text("x");
        buf.insert_char(0, 1, 'y');

        let err = buf.save_to(&path).unwrap_err();
        assert!(matches!(err, EditorError::Save { .. }));
        assert!(buf.is_modified());
    }

    #[test]
    fn debug_shows_summary() {
        let buf = LineBuffer::from_text("a\nb");
        let s = format!("{buf:?}");
        assert!(s.contains("lines: 2"), "{s}");
    }
}
