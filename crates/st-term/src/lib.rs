// SPDX-License-Identifier: MIT
//
// st-term: terminal backend for smoltext.
//
// Raw mode and the alternate screen, a key parser for what xterm-style
// terminals send, a cell grid to paint into, and a differential renderer
// that only rewrites the cells that changed. The event loop ties them
// together around a single blocking read on stdin.
//
// Terminal control is direct: ANSI escape sequences and raw termios, no
// TUI framework in between.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
