//! Input dispatch: one key in, one state change out.
//!
//! ```text
//!            e
//!   ┌──────┐ ───▶ ┌──────┐
//!   │ View │      │ Edit │
//!   └──────┘ ◀─── └──────┘
//!            Esc
//! ```
//!
//! Navigation keys (arrows, Home, End, PageUp, PageDown) and Backspace work
//! the same in both modes. View reads the rest as single-letter commands;
//! Edit inserts text. Keys held with Ctrl or Alt, and keys neither mode
//! knows, are dropped. Every key clears the pending status message first.
//!
//! | View key | Action                   |
//! |----------|--------------------------|
//! | `q`      | quit                     |
//! | `e`      | enter Edit               |
//! | `w`      | save                     |
//! | `c`      | copy line                |
//! | `d`      | cut line                 |
//! | `p`      | paste line below         |
//! | `s`      | snapshot                 |
//! | `l`      | restore snapshot         |
//! | `h`      | toggle highlighting      |

use st_term::event_loop::Action;
use st_term::input::{KeyCode, KeyEvent};

use crate::mode::Mode;
use crate::session::Session;

/// Apply one key to the session.
///
/// Returns [`Action::Quit`] for `q` in View mode, [`Action::Continue`] for
/// everything else. The viewport is re-clamped before returning.
pub fn handle_key(session: &mut Session, key: &KeyEvent) -> Action {
    session.clear_message();

    if key.has_command_modifier() {
        tracing::trace!(target: "input", key = ?key.code, modifiers = ?key.modifiers, "ignored");
        return Action::Continue;
    }

    let action = if navigate(session, key.code) {
        Action::Continue
    } else {
        match session.mode {
            Mode::View => view_key(session, key.code),
            Mode::Edit => {
                edit_key(session, key.code);
                Action::Continue
            }
        }
    };

    session.scroll();
    action
}

/// Cursor movement shared by both modes. Returns `false` for other keys.
fn navigate(session: &mut Session, code: KeyCode) -> bool {
    let Session { buffer, cursor, viewport, .. } = session;
    match code {
        KeyCode::Left => cursor.left(buffer),
        KeyCode::Right => cursor.right(buffer),
        KeyCode::Up => cursor.up(buffer),
        KeyCode::Down => cursor.down(buffer),
        KeyCode::Home => cursor.home(),
        KeyCode::End => cursor.end(buffer),
        KeyCode::PageUp => cursor.page_up(buffer, viewport.page_step()),
        KeyCode::PageDown => cursor.page_down(buffer, viewport.page_step()),
        _ => return false,
    }
    true
}

fn view_key(session: &mut Session, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => {
            tracing::info!(target: "edit", dirty = session.is_dirty(), "quit");
            return Action::Quit;
        }
        KeyCode::Char('e') => set_mode(session, Mode::Edit),
        KeyCode::Char('w') => save(session),
        KeyCode::Char('c') => session.copy_line(),
        KeyCode::Char('d') => session.cut_line(),
        KeyCode::Char('p') => session.paste_line(),
        KeyCode::Char('s') => session.snapshot(),
        KeyCode::Char('l') => session.restore(),
        KeyCode::Char('h') => session.toggle_highlight(),
        KeyCode::Backspace => session.delete_backward(),
        _ => {}
    }
    Action::Continue
}

fn edit_key(session: &mut Session, code: KeyCode) {
    match code {
        KeyCode::Escape => set_mode(session, Mode::View),
        KeyCode::Enter => session.split_line(),
        KeyCode::Tab => session.insert_tab(),
        KeyCode::Backspace => session.delete_backward(),
        KeyCode::Char(ch) if !ch.is_control() => session.insert_char(ch),
        _ => {}
    }
}

fn set_mode(session: &mut Session, mode: Mode) {
    tracing::debug!(target: "edit", from = %session.mode, to = %mode, "mode_changed");
    session.mode = mode;
}

fn save(session: &mut Session) {
    if let Err(err) = session.save() {
        tracing::warn!(target: "io", error = %err, "save failed");
        session.set_message(err.to_string());
    }
}
