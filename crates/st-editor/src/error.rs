//! Editor errors.
//!
//! Only file I/O can fail inside the editor core. Everything else operates
//! on in-memory state and is total.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A failed file operation, with the path it was about.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("cannot read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Editor result.
pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = EditorError::Save {
            path: PathBuf::from("/ro/notes.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(err.to_string(), "cannot write /ro/notes.txt: permission denied");
    }

    #[test]
    fn source_is_preserved() {
        let err = EditorError::Load {
            path: PathBuf::from("missing.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<io::Error>().is_some());
    }
}
