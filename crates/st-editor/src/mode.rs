//! Modal editing.
//!
//! The editor is always in exactly one [`Mode`]:
//!
//! | Mode | Cursor shape | Keys                                         |
//! |------|--------------|----------------------------------------------|
//! | View | Block        | single-letter commands, navigation           |
//! | Edit | Bar          | text entry, navigation, `Esc` back to View   |
//!
//! View is where the editor starts. There is no terminal state; `q` quits
//! from View through the dispatcher, not through a mode.

use std::fmt;

use st_term::ansi::CursorShape;

/// The current editing mode.
///
/// Pure data: key handling and transitions live in
/// [`dispatch`](crate::dispatch).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands, not text.
    #[default]
    View,
    /// Keys produce characters in the buffer.
    Edit,
}

impl Mode {
    /// Name shown at the left of the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Edit => "EDIT",
        }
    }

    /// Terminal cursor shape for this mode.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::View => CursorShape::SteadyBlock,
            Self::Edit => CursorShape::SteadyBar,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
