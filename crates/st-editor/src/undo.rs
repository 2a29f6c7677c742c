//! Undo: one saved copy of the whole buffer.
//!
//! `s` takes a snapshot, `l` puts it back. There is no history beyond that
//! one slot: a new snapshot replaces the old one, and restoring keeps the
//! snapshot so it can be restored again.

use crate::buffer::Snapshot;

/// Holds zero or one buffer snapshot.
#[derive(Debug, Default, Clone)]
pub struct UndoSlot {
    snapshot: Option<Snapshot>,
}

impl UndoSlot {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { snapshot: None }
    }

    /// Keep `snapshot`, dropping any earlier one.
    pub fn store(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    /// The kept snapshot, if any.
    #[must_use]
    pub const fn get(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Whether a snapshot has been taken.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.snapshot.is_none()
    }
}
