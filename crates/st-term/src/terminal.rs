// SPDX-License-Identifier: MIT
//
// The unsafe blocks here are the POSIX calls for terminal control:
// tcgetattr/tcsetattr, cfmakeraw, ioctl(TIOCGWINSZ), isatty, and the
// lock-free write(2) used from the panic hook.
#![allow(unsafe_code)]
//
// Terminal ownership.
//
// `Terminal` is the one handle to the controlling terminal. `enter` puts
// stdin in raw mode and switches to the alternate screen; `leave` and `Drop`
// undo both. A panic anywhere while the screen is taken over still gets the
// user's shell back: the hook writes a fixed byte string to fd 1 without
// touching the stdout lock, puts the saved termios back, then hands over to
// whatever hook was installed before.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal extent in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Width.
    pub cols: u16,
    /// Height.
    pub rows: u16,
}

impl Size {
    /// Used when the window size cannot be read.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Read the window size of stdout.
///
/// `None` when stdout is not a terminal or reports a zero extent.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col != 0 && ws.ws_row != 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// True when stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub const fn is_tty() -> bool {
    false
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// The termios in effect before raw mode, shared with the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Raw-mode switch for stdin. Remembers the cooked settings while engaged.
#[derive(Default)]
struct RawMode {
    #[cfg(unix)]
    cooked: Option<libc::termios>,
}

#[cfg(unix)]
impl RawMode {
    fn engage(&mut self) -> io::Result<()> {
        let fd = libc::STDIN_FILENO;
        let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let cooked = attrs;

        unsafe { libc::cfmakeraw(&raw mut attrs) };
        // Block until at least one byte; no inter-byte timer.
        attrs.c_cc[libc::VMIN] = 1;
        attrs.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }

        self.cooked = Some(cooked);
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(cooked);
        }
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        let Some(cooked) = self.cooked.take() else {
            return Ok(());
        };
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const cooked) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn engage(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn release(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic Hook ─────────────────────────────────────────────────────────────

/// Bytes written on panic. Leaving the alternate screen comes last so the
/// shell's screen is shown with default attributes and a visible cursor.
#[rustfmt::skip]
const RESTORE_ON_PANIC: &[u8] = concat!(
    "\x1b[?2026l",  // end synchronized update
    "\x1b[0m",      // attributes off
    "\x1b[0 q",     // default cursor shape
    "\x1b[?25h",    // cursor on
    "\x1b[?1049l",  // main screen
).as_bytes();

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let chained = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_restore_bytes();
            #[cfg(unix)]
            if let Ok(slot) = SAVED_TERMIOS.lock() {
                if let Some(cooked) = slot.as_ref() {
                    unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, cooked) };
                }
            }
            chained(info);
        }));
    });
}

fn write_restore_bytes() {
    #[cfg(unix)]
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            RESTORE_ON_PANIC.as_ptr().cast(),
            RESTORE_ON_PANIC.len(),
        );
    }
    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(RESTORE_ON_PANIC);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The controlling terminal.
///
/// ```no_run
/// use st_term::terminal::Terminal;
///
/// let mut term = Terminal::new()?;
/// term.enter()?;
/// // paint, read keys
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: RawMode,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Take hold of the terminal without changing its mode.
    ///
    /// The size is read once here; an unreadable size becomes
    /// [`Size::FALLBACK`].
    ///
    /// # Errors
    ///
    /// Fails when stdin is not a terminal.
    pub fn new() -> io::Result<Self> {
        if !is_tty() {
            return Err(io::Error::other("stdin is not a terminal"));
        }
        let size = get_size().unwrap_or(Size::FALLBACK);
        tracing::debug!(target: "terminal", cols = size.cols, rows = size.rows, "terminal_acquired");
        Ok(Self {
            raw: RawMode::default(),
            size,
            active: false,
        })
    }

    /// Last known size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Read the size again, e.g. after SIGWINCH. The cached size survives a
    /// failed read.
    pub fn refresh_size(&mut self) -> Size {
        self.size = get_size().unwrap_or(self.size);
        self.size
    }

    /// Whether [`enter`](Self::enter) is in effect.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen.
    /// A second call does nothing.
    ///
    /// # Errors
    ///
    /// Returns the termios or write error.
    pub fn enter(&mut self) -> io::Result<()> {
        self.enter_on(&mut io::stdout().lock())
    }

    /// [`enter`](Self::enter) writing the screen setup to `out`. Raw mode is
    /// released again when a write fails.
    fn enter_on(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw.engage()?;

        let setup = ansi::enter_alt_screen(out)
            .and_then(|()| ansi::cursor_hide(out))
            .and_then(|()| ansi::clear_screen(out))
            .and_then(|()| out.flush());
        if let Err(err) = setup {
            let _ = self.raw.release();
            return Err(err);
        }

        self.active = true;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). A second call does nothing.
    ///
    /// # Errors
    ///
    /// Returns the write or termios error.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::set_cursor_shape(&mut out, ansi::CursorShape::Default)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        self.raw.release()?;
        self.active = false;

        tracing::debug!(target: "terminal", "terminal_restored");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
