// SPDX-License-Identifier: MIT
//
// smoltext: a small modal terminal text editor.
//
// This is the binary that wires the crates together:
//
//   st-term   → terminal control, rendering, input parsing, event loop
//   st-editor → line buffer, cursor, modes, dispatch, highlighting, view
//
// The Editor struct implements st-term's App trait around one Session.
// Each keypress flows through:
//
//   stdin → parser → on_key → dispatch::handle_key → session mutation
//   paint → view::render → framebuffer → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 1 rows
//   ├──────────────────────────────┤
//   │ status line (black on white) │  ← 1 row
//   └──────────────────────────────┘

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Once;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use st_editor::dispatch;
use st_editor::options::Options;
use st_editor::session::Session;
use st_editor::view;

use st_term::ansi::CursorShape;
use st_term::buffer::FrameBuffer;
use st_term::event_loop::{Action, App, EventLoop};
use st_term::input::KeyEvent;
use st_term::terminal::Size;

// ─── Command line ───────────────────────────────────────────────────────────

/// A small modal terminal text editor.
#[derive(Parser, Debug)]
#[command(name = "smoltext", version, about)]
struct Args {
    /// File to edit. Created on first save if it does not exist.
    path: Option<PathBuf>,

    /// Spaces inserted by the Tab key (1-16).
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=16))]
    tab_width: u8,

    /// Start with syntax highlighting off (toggle with `h`).
    #[arg(long)]
    no_highlight: bool,

    /// Write a debug log to this file. Filter with RUST_LOG.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Options {
        Options::default()
            .with_tab_width(usize::from(self.tab_width))
            .with_highlight(!self.no_highlight)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send tracing output to `path` through a background writer.
///
/// The returned guard flushes the writer when dropped and must outlive the
/// event loop. `None` if logging is off or a subscriber is already set.
fn init_logging(path: Option<&Path>) -> Option<WorkerGuard> {
    let path = path?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    install_panic_hook();
    Some(guard)
}

/// Log panics before the previously installed hook prints them.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", %info, "panic");
            previous(info);
        }));
    });
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The application: one session plus where its cursor was last painted.
struct Editor {
    session: Session,
    cursor_screen: Option<(u16, u16)>,
}

impl Editor {
    const fn new(session: Session) -> Self {
        Self {
            session,
            cursor_screen: None,
        }
    }
}

impl App for Editor {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        dispatch::handle_key(&mut self.session, key)
    }

    fn on_resize(&mut self, size: Size) {
        tracing::debug!(target: "runtime", cols = size.cols, rows = size.rows, "editor_resized");
        self.session
            .resize(usize::from(size.rows.saturating_sub(1)), usize::from(size.cols));
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        let rows = frame.height().saturating_sub(1);
        self.session.resize(usize::from(rows), usize::from(frame.width()));
        self.cursor_screen = view::render(&self.session, frame);
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let (x, y) = self.cursor_screen?;
        Some((x, y, self.session.mode.cursor_shape()))
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();
    let log_guard = init_logging(args.log_file.as_deref());

    // Acquire the terminal before touching any file.
    let mut event_loop = EventLoop::new().unwrap_or_else(|e| {
        eprintln!("smoltext: cannot start: {e}");
        process::exit(1);
    });

    let size = event_loop.size();
    tracing::info!(target: "runtime", cols = size.cols, rows = size.rows, "startup");

    let mut editor = Editor::new(Session::open(args.path.clone(), args.options()));
    let result = event_loop.run(&mut editor);

    tracing::info!(target: "runtime", dirty = editor.session.is_dirty(), "shutdown");
    if let Err(e) = result {
        eprintln!("smoltext: {e}");
        drop(log_guard);
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
