// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Input source: raw bytes from the terminal.
//
// The editor is single-threaded: the event loop asks for the next chunk of
// bytes and blocks in `poll()` until stdin is readable. A timeout is only
// passed while the parser holds a lone ESC, so idle time costs no CPU.
//
// `poll()` also returns early with EINTR when SIGWINCH arrives; that is
// reported as "no bytes" so the loop can pick up the resize.
//
// End of input and hang-ups are errors. An editor that can no longer read
// keys has no way to continue, and the caller restores the terminal and
// exits.

use std::io;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};

/// Largest chunk returned by one read. A keypress is 1-6 bytes; a paste
/// arrives as several chunks.
const READ_BUF_SIZE: usize = 4096;

/// Blocking reader over a terminal file descriptor.
///
/// ```no_run
/// use std::time::Duration;
/// use st_term::reader::InputSource;
///
/// let mut input = InputSource::stdin();
/// match input.read(Some(Duration::from_millis(25)))? {
///     Some(bytes) => println!("got {} bytes", bytes.len()),
///     None => println!("timed out"),
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct InputSource {
    #[cfg(unix)]
    fd: RawFd,
    buf: Box<[u8; READ_BUF_SIZE]>,
}

impl InputSource {
    /// Read from the process's stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self {
            #[cfg(unix)]
            fd: io::stdin().as_raw_fd(),
            buf: Box::new([0; READ_BUF_SIZE]),
        }
    }

    /// Read from an arbitrary descriptor. The caller keeps it open for as
    /// long as this source is used.
    #[cfg(unix)]
    #[must_use]
    pub fn from_fd(fd: &impl AsRawFd) -> Self {
        Self {
            fd: fd.as_raw_fd(),
            buf: Box::new([0; READ_BUF_SIZE]),
        }
    }

    /// Wait for input and return the bytes that are available.
    ///
    /// `timeout` of `None` blocks until something happens. Returns
    /// `Ok(None)` on timeout or when a signal interrupted the wait.
    ///
    /// # Errors
    ///
    /// `UnexpectedEof` when the input is closed, `BrokenPipe` on hang-up,
    /// and any error `poll()` or `read()` report.
    #[cfg(unix)]
    pub fn read(&mut self, timeout: Option<Duration>) -> io::Result<Option<Vec<u8>>> {
        let timeout_ms = timeout.map_or(-1, |t| i32::try_from(t.as_millis()).unwrap_or(i32::MAX));

        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(None)
            } else {
                Err(err)
            };
        }
        if ready == 0 {
            return Ok(None);
        }

        if pfd.revents & libc::POLLNVAL != 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "input descriptor is not open"));
        }
        if pfd.revents & libc::POLLIN == 0 {
            let kind = if pfd.revents & libc::POLLHUP != 0 {
                io::ErrorKind::BrokenPipe
            } else {
                io::ErrorKind::Other
            };
            return Err(io::Error::new(kind, "input source hung up"));
        }

        let n = unsafe { libc::read(self.fd, self.buf.as_mut_ptr().cast(), READ_BUF_SIZE) };

        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                _ => Err(err),
            };
        }
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }

        #[allow(clippy::cast_sign_loss)]
        let len = n as usize;
        Ok(Some(self.buf[..len].to_vec()))
    }

    /// Non-unix fallback: a plain blocking read, `timeout` is ignored.
    ///
    /// # Errors
    ///
    /// `UnexpectedEof` when stdin is closed, or the read error.
    #[cfg(not(unix))]
    pub fn read(&mut self, _timeout: Option<Duration>) -> io::Result<Option<Vec<u8>>> {
        use std::io::Read;

        match io::stdin().lock().read(&mut self.buf[..])? {
            0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")),
            n => Ok(Some(self.buf[..n].to_vec())),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
