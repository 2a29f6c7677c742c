//! Editor options.
//!
//! The handful of tunables the editor reads at startup. The binary fills
//! them in from the command line; everything has a default.
//!
//! | Option         | Flag             | Default      |
//! |----------------|------------------|--------------|
//! | `tab_width`    | `--tab-width N`  | 4 (1..=16)   |
//! | `highlight`    | `--no-highlight` | on           |
//! | `default_path` | (none)           | `output.txt` |

use std::path::PathBuf;

/// Smallest accepted Tab width.
pub const MIN_TAB_WIDTH: usize = 1;
/// Largest accepted Tab width.
pub const MAX_TAB_WIDTH: usize = 16;
/// File name used when no path is given.
pub const DEFAULT_PATH: &str = "output.txt";

/// Startup options for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Spaces inserted for one Tab.
    pub tab_width: usize,
    /// Whether syntax highlighting starts on.
    pub highlight: bool,
    /// File bound when none is named.
    pub default_path: PathBuf,
}

impl Options {
    /// Replace the Tab width, clamped to `1..=16`.
    #[must_use]
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH);
        self
    }

    /// Turn start-up highlighting on or off.
    #[must_use]
    pub const fn with_highlight(mut self, on: bool) -> Self {
        self.highlight = on;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tab_width: 4,
            highlight: true,
            default_path: PathBuf::from(DEFAULT_PATH),
        }
    }
}
