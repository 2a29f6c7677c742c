// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: the editor's heartbeat.
//
// One thread, one loop: paint if something changed, block until stdin has
// bytes, parse them into keys, hand each key to the application. Nothing
// runs while the user is idle.
//
// # Blocking model
//
// `poll()` waits without a timeout. The only exception is a lone ESC held
// by the parser: then the wait is capped at `ESC_TIMEOUT`, and if nothing
// follows, the ESC is delivered as the Escape key.
//
// # SIGWINCH
//
// The handler only sets an `AtomicBool`. The signal also interrupts
// `poll()`, so the loop wakes, sees the flag, re-reads the size and forces
// a full redraw.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::ansi::CursorShape;
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{KeyEvent, Parser};
use crate::reader::InputSource;
use crate::terminal::{Size, Terminal};

/// How long a lone ESC waits for the rest of a sequence.
pub const ESC_TIMEOUT: Duration = Duration::from_millis(25);

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler. No `SA_RESTART`: the pending `poll()` must
/// return so the resize is handled right away.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the loop after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop and restore the terminal.
    Quit,
}

/// Application interface for the event loop.
///
/// Per iteration the loop calls [`on_resize`](App::on_resize) if the
/// terminal changed size, then [`paint`](App::paint) and
/// [`cursor`](App::cursor) if anything happened since the last frame, then
/// blocks and calls [`on_key`](App::on_key) for every key that arrives.
pub trait App {
    /// Handle one keypress. Return [`Action::Quit`] to exit.
    fn on_key(&mut self, key: &KeyEvent) -> Action;

    /// The terminal was resized. The frame buffer is already resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole screen. The buffer was cleared before the call.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where the hardware cursor goes after painting, and its shape.
    /// `None` hides it.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

/// Hand keys to the app in order, stopping at the first quit.
fn deliver(app: &mut impl App, keys: &[KeyEvent]) -> Action {
    for key in keys {
        tracing::trace!(target: "input", key = ?key.code, modifiers = ?key.modifiers, "key");
        if app.on_key(key) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// ```no_run
/// use st_term::buffer::FrameBuffer;
/// use st_term::event_loop::{Action, App, EventLoop};
/// use st_term::input::{KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_key(&mut self, key: &KeyEvent) -> Action {
///         if key.code == KeyCode::Char('q') {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// let mut event_loop = EventLoop::new()?;
/// event_loop.run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
}

impl EventLoop {
    /// Acquire the terminal: raw mode and the alternate screen are in effect
    /// once this returns, and stay until [`run`](Self::run) ends or the loop
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin is not a terminal or entering raw mode fails.
    pub fn new() -> io::Result<Self> {
        let mut terminal = Terminal::new()?;
        terminal.enter()?;
        Ok(Self {
            terminal,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application quits.
    ///
    /// The terminal is restored on every exit path; an error from the loop
    /// is returned after the restore.
    ///
    /// # Errors
    ///
    /// Returns an error if entering or leaving the terminal fails, if output
    /// fails, or if the input source fails or closes.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let mut input = InputSource::stdin();
        let result = self.run_inner(app, &mut input);

        if let Err(err) = &result {
            tracing::error!(target: "runtime", error = %err, "event_loop_failed");
        }

        let restored = self.terminal.leave();
        result.and(restored)
    }

    fn run_inner(&mut self, app: &mut impl App, input: &mut InputSource) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = true;

        loop {
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                tracing::debug!(target: "terminal", cols = new_size.cols, rows = new_size.rows, "resized");
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame, app.cursor());
                self.renderer.flush()?;
                dirty = false;
            }

            let timeout = self.parser.has_pending().then_some(ESC_TIMEOUT);
            let keys = match input.read(timeout)? {
                Some(bytes) => self.parser.advance(&bytes),
                // Timed out or interrupted: a held ESC is the Escape key.
                None if self.parser.has_pending() => self.parser.flush(),
                None => continue,
            };

            if keys.is_empty() {
                continue;
            }
            if deliver(app, &keys) == Action::Quit {
                return Ok(());
            }
            dirty = true;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<KeyCode>,
        resized: Option<Size>,
    }

    impl App for Recorder {
        fn on_key(&mut self, key: &KeyEvent) -> Action {
            self.seen.push(key.code);
            if key.code == KeyCode::Char('q') {
                Action::Quit
            } else {
                Action::Continue
            }
        }

        fn on_resize(&mut self, size: Size) {
            self.resized = Some(size);
        }

        fn paint(&mut self, buf: &mut FrameBuffer) {
            buf.paint_text(
                0,
                0,
                "ok",
                crate::color::CellColor::Default,
                crate::color::CellColor::Default,
                crate::cell::Attr::empty(),
            );
        }
    }

    #[test]
    fn deliver_stops_at_quit() {
        let mut app = Recorder::default();
        let keys = Parser::new().advance(b"abqcd");
        assert_eq!(deliver(&mut app, &keys), Action::Quit);
        assert_eq!(
            app.seen,
            vec![KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Char('q')]
        );
    }

    #[test]
    fn deliver_continues_without_quit() {
        let mut app = Recorder::default();
        let keys = Parser::new().advance(b"\x1b[A\r");
        assert_eq!(deliver(&mut app, &keys), Action::Continue);
        assert_eq!(app.seen, vec![KeyCode::Up, KeyCode::Enter]);
    }

    #[test]
    fn app_defaults() {
        let mut app = Recorder::default();
        assert!(app.cursor().is_none());
        app.on_resize(Size { cols: 100, rows: 30 });
        assert_eq!(app.resized, Some(Size { cols: 100, rows: 30 }));
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    #[test]
    fn new_fails_without_terminal() {
        match EventLoop::new() {
            Ok(event_loop) => assert!(event_loop.size().cols > 0),
            Err(err) => assert_eq!(err.kind(), io::ErrorKind::Other),
        }
    }

    #[test]
    fn terminal_is_raw_before_run() {
        let Ok(mut event_loop) = EventLoop::new() else {
            return;
        };
        assert!(event_loop.terminal.is_active());
        event_loop.terminal.leave().unwrap();
        assert!(!event_loop.terminal.is_active());
    }
}
