//! # st-editor: editing core for smoltext
//!
//! Everything between a key arriving and a frame being painted:
//!
//! - **[`buffer`]**: `LineBuffer`, the text as lines over a rope, with load and save
//! - **[`cursor`]** / **[`viewport`]**: position in the text and the scroll window
//! - **[`clipboard`]** / **[`undo`]**: the single-line copy slot and the single snapshot slot
//! - **[`mode`]**: View and Edit
//! - **[`session`]**: one value holding all of the above
//! - **[`edit`]**: the mutating operations on a session
//! - **[`dispatch`]**: keys to operations, per mode
//! - **[`highlight`]**: lexical classes for the visible part of a line
//! - **[`view`]**: text area and status line, painted into an st-term frame
//! - **[`options`]** / **[`error`]**: startup tunables and file errors

pub mod buffer;
pub mod clipboard;
pub mod cursor;
pub mod dispatch;
pub mod edit;
pub mod error;
pub mod highlight;
pub mod mode;
pub mod options;
pub mod session;
pub mod undo;
pub mod view;
pub mod viewport;

pub use error::{EditorError, Result};
pub use session::Session;
