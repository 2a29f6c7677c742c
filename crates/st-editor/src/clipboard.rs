//! Clipboard: the single-line copy slot.
//!
//! `c` copies the cursor line here and `d` cuts it here. `p` pastes a fresh
//! copy below the cursor. The slot holds at most one line. Every copy or cut
//! overwrites it, and pasting leaves it in place.

/// Holds zero or one copied line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Clipboard {
    line: Option<String>,
}

impl Clipboard {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { line: None }
    }

    /// Store `line`, replacing whatever was there.
    pub fn store(&mut self, line: String) {
        self.line = Some(line);
    }

    /// The stored line, if any.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.line.as_deref()
    }

    /// Whether anything has been copied yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.line.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let clip = Clipboard::new();
        assert!(clip.is_empty());
        assert_eq!(clip.get(), None);
    }

    #[test]
    fn store_overwrites() {
        let mut clip = Clipboard::new();
        clip.store("first".into());
        clip.store("second".into());
        assert_eq!(clip.get(), Some("second"));
    }

    #[test]
    fn an_empty_line_is_still_content() {
        let mut clip = Clipboard::new();
        clip.store(String::new());
        assert!(!clip.is_empty());
        assert_eq!(clip.get(), Some(""));
    }
}
