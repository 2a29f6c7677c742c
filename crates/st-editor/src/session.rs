//! Session: all editor state in one value.
//!
//! The buffer, the file it is bound to, the cursor and viewport, both
//! slots, the mode and the highlighting switch all live here. The binary
//! owns exactly one `Session`; nothing is global.
//!
//! Editing operations are in [`edit`](crate::edit), key handling in
//! [`dispatch`](crate::dispatch) and painting in [`view`](crate::view). They
//! all work on a `&mut Session`.

use std::path::{Path, PathBuf};

use crate::buffer::LineBuffer;
use crate::clipboard::Clipboard;
use crate::cursor::Cursor;
use crate::mode::Mode;
use crate::options::Options;
use crate::undo::UndoSlot;
use crate::viewport::Viewport;

/// Everything the editor knows.
#[derive(Debug)]
pub struct Session {
    /// The text.
    pub buffer: LineBuffer,
    /// Where `w` writes to.
    pub path: PathBuf,
    /// Cursor, always inside `buffer`.
    pub cursor: Cursor,
    /// Scroll window over the text area.
    pub viewport: Viewport,
    /// Single-line copy slot.
    pub clipboard: Clipboard,
    /// Single snapshot slot.
    pub undo: UndoSlot,
    /// View or Edit.
    pub mode: Mode,
    /// Whether syntax classes are shown.
    pub highlight: bool,
    /// Startup tunables.
    pub options: Options,
    message: Option<String>,
}

impl Session {
    /// A session over `buffer`, bound to `path`.
    #[must_use]
    pub fn with_buffer(buffer: LineBuffer, path: PathBuf, options: Options) -> Self {
        Self {
            buffer,
            path,
            cursor: Cursor::default(),
            viewport: Viewport::default(),
            clipboard: Clipboard::new(),
            undo: UndoSlot::new(),
            mode: Mode::default(),
            highlight: options.highlight,
            options,
            message: None,
        }
    }

    /// Open `path`, or the default file name when `None`.
    ///
    /// A file that cannot be read starts as a new, empty buffer bound to the
    /// same name. Nothing is written until the first save.
    #[must_use]
    pub fn open(path: Option<PathBuf>, options: Options) -> Self {
        let path = path.unwrap_or_else(|| options.default_path.clone());
        let buffer = match LineBuffer::load(&path) {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::debug!(target: "io", error = %err, "starting new file");
                LineBuffer::new()
            }
        };
        tracing::info!(
            target: "edit",
            file = %path.display(),
            line_count = buffer.line_count(),
            "session_opened"
        );
        Self::with_buffer(buffer, path, options)
    }

    // -- State queries ------------------------------------------------------

    /// True if the buffer changed since it was loaded or last saved.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_modified()
    }

    /// The bound file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bound path as it was given, for the status line.
    #[must_use]
    pub fn path_label(&self) -> String {
        self.path.display().to_string()
    }

    // -- Status message -----------------------------------------------------

    /// Show `msg` on the status line until the next key.
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// The pending status message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Drop the pending status message.
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    // -- Layout -------------------------------------------------------------

    /// Set the text-area extent and bring the cursor back into view.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.viewport.set_extent(rows, cols);
        self.scroll();
    }

    /// Clamp the cursor and scroll the viewport to it.
    pub fn scroll(&mut self) {
        self.cursor.clamp(&self.buffer);
        self.viewport.scroll_to_cell(&self.buffer, &self.cursor);
    }

    /// Flip syntax highlighting.
    pub fn toggle_highlight(&mut self) {
        self.highlight = !self.highlight;
    }
}
