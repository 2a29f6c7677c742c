// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// A repaint compares the new FrameBuffer with the frame on screen and sends
// only the cells that changed. Typing a character usually changes one text
// row and the status line, so the rest of the screen costs nothing.
//
// One frame is one byte vector: begin synchronized update, hide the cursor,
// changed cells, reset, place and show the cursor, end synchronized update.
// `flush` hands it to stdout in a single write.
//
// The `Pen` tracks what the terminal was last told: where the cursor sits
// and which colors and attributes are in effect. Cells written left to
// right with the same style cost one byte each.

use std::io::{self, Write};

use crate::ansi::{self, CursorShape};
use crate::buffer::FrameBuffer;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// Terminal-side state as of the last byte written. `None` means unknown.
#[derive(Default)]
struct Pen {
    at: Option<(u16, u16)>,
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
}

impl Pen {
    /// Write `cell` at `(x, y)`, moving and restyling only when needed.
    fn draw(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: &Cell) {
        let follows = self.at.is_some_and(|(px, py)| py == y && px.checked_add(1) == Some(x));

        // The right half of a wide glyph drawn just before.
        if cell.is_continuation() && follows {
            self.at = Some((x, y));
            return;
        }

        if !follows {
            let _ = ansi::cursor_to(out, x, y);
        }
        self.restyle(out, cell);

        if cell.is_continuation() {
            // Its owner was not redrawn; blank the column in the cell's colors.
            out.push(b' ');
        } else {
            push_glyph(out, cell.ch);
        }
        self.at = Some((x, y));
    }

    fn restyle(&mut self, out: &mut Vec<u8>, cell: &Cell) {
        if cell.attrs != self.attrs {
            // Attributes can only be switched off all at once.
            if !self.attrs.is_empty() {
                let _ = ansi::reset(out);
                self.fg = None;
                self.bg = None;
            }
            let _ = ansi::attrs(out, cell.attrs);
            self.attrs = cell.attrs;
        }
        if self.fg != Some(cell.fg) {
            let _ = ansi::fg(out, cell.fg);
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            let _ = ansi::bg(out, cell.bg);
            self.bg = Some(cell.bg);
        }
    }
}

/// UTF-8 for a cell codepoint; `?` for anything that is not a scalar value.
fn push_glyph(out: &mut Vec<u8>, cp: u32) {
    match char::from_u32(cp).filter(|&c| c != '\0') {
        Some(ch) => out.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes()),
        None => out.push(b'?'),
    }
}

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Counters for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells sent to the terminal.
    pub cells_rendered: usize,
    /// Cells equal to the previous frame.
    pub cells_skipped: usize,
    /// Size of the frame's output in bytes.
    pub bytes_written: usize,
}

impl RenderStats {
    /// Cells looked at.
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Sends the difference between successive frames.
///
/// ```no_run
/// use st_term::buffer::FrameBuffer;
/// use st_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let stats = renderer.render(&FrameBuffer::new(80, 24), None);
/// renderer.flush().unwrap();
/// assert_eq!(stats.cells_rendered, 80 * 24);
/// ```
#[derive(Default)]
pub struct DiffRenderer {
    out: Vec<u8>,
    shown: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// A renderer that has shown nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(8 * 1024),
            shown: None,
        }
    }

    /// Build the output that turns the screen into `frame`.
    ///
    /// `cursor` is where the hardware cursor rests afterwards and its
    /// shape; `None` leaves it hidden. A frame with a different extent
    /// than the last one clears the screen and draws every cell.
    pub fn render(
        &mut self,
        frame: &FrameBuffer,
        cursor: Option<(u16, u16, CursorShape)>,
    ) -> RenderStats {
        self.out.clear();
        let (width, height) = (frame.width(), frame.height());
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.remember(frame);
            return stats;
        }

        let shown = self
            .shown
            .as_ref()
            .filter(|old| old.width() == width && old.height() == height);

        let out = &mut self.out;
        let mut pen = Pen::default();
        let _ = ansi::begin_sync(out);
        let _ = ansi::cursor_hide(out);
        if shown.is_none() {
            let _ = ansi::clear_screen(out);
        }

        for y in 0..height {
            let Some(row) = frame.row(y) else { continue };
            let old_row = shown.and_then(|old| old.row(y));
            if old_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, cell) in (0..width).zip(row) {
                if old_row.is_some_and(|old| old[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                } else {
                    pen.draw(out, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        let _ = ansi::reset(out);
        if let Some((x, y, shape)) = cursor {
            let _ = ansi::cursor_to(out, x, y);
            let _ = ansi::set_cursor_shape(out, shape);
            let _ = ansi::cursor_show(out);
        }
        let _ = ansi::end_sync(out);

        stats.bytes_written = out.len();
        self.remember(frame);
        tracing::trace!(
            target: "terminal",
            rendered = stats.cells_rendered,
            skipped = stats.cells_skipped,
            bytes = stats.bytes_written,
            "frame_rendered"
        );
        stats
    }

    /// Output of the last [`render`](Self::render) not yet flushed.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Send the pending output to stdout.
    ///
    /// # Errors
    ///
    /// Returns the write error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }

    /// Send the pending output to `w`.
    ///
    /// # Errors
    ///
    /// Returns the write error.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.out.is_empty() {
            return Ok(());
        }
        w.write_all(&self.out)?;
        w.flush()?;
        self.out.clear();
        Ok(())
    }

    /// Forget the screen contents; the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.shown = None;
    }

    fn remember(&mut self, frame: &FrameBuffer) {
        match &mut self.shown {
            Some(old) => old.copy_from(frame),
            None => self.shown = Some(frame.clone()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_cells(cells: &[(u16, u16, Cell)]) -> String {
        let mut out = Vec::new();
        let mut pen = Pen::default();
        for (x, y, cell) in cells {
            pen.draw(&mut out, *x, *y, cell);
        }
        String::from_utf8(out).unwrap()
    }

    fn render_text(renderer: &mut DiffRenderer, frame: &FrameBuffer) -> (RenderStats, String) {
        let stats = renderer.render(frame, None);
        (stats, String::from_utf8_lossy(renderer.output_bytes()).into_owned())
    }

    // ── Pen ─────────────────────────────────────────────────────────────

    #[test]
    fn pen_positions_and_styles_first_cell() {
        assert_eq!(draw_cells(&[(5, 3, Cell::new('A'))]), "\x1b[4;6H\x1b[39m\x1b[49mA");
    }

    #[test]
    fn pen_runs_along_a_row_without_moving() {
        let text = draw_cells(&[
            (0, 0, Cell::new('r')),
            (1, 0, Cell::new('u')),
            (2, 0, Cell::new('n')),
        ]);
        assert_eq!(text.matches('H').count(), 1);
        assert!(text.ends_with("run"));
    }

    #[test]
    fn pen_moves_across_gaps_and_rows() {
        let text = draw_cells(&[
            (0, 0, Cell::new('a')),
            (5, 0, Cell::new('b')),
            (0, 1, Cell::new('c')),
        ]);
        assert!(text.contains("\x1b[1;6H"));
        assert!(text.contains("\x1b[2;1H"));
    }

    #[test]
    fn pen_keeps_unchanged_colors() {
        let text = draw_cells(&[
            (0, 0, Cell::new('"').with_fg(CellColor::YELLOW)),
            (1, 0, Cell::new('s').with_fg(CellColor::YELLOW)),
            (2, 0, Cell::new(' ').with_bg(CellColor::GREEN)),
        ]);
        assert_eq!(text.matches("\x1b[33m").count(), 1);
        assert_eq!(text.matches("\x1b[42m").count(), 1);
    }

    #[test]
    fn pen_resets_before_dropping_attributes() {
        let magenta = CellColor::MAGENTA;
        let text = draw_cells(&[
            (0, 0, Cell::styled('#', magenta, CellColor::Default, Attr::BOLD)),
            (1, 0, Cell::styled('?', magenta, CellColor::Default, Attr::INVERSE)),
        ]);
        assert!(text.contains("\x1b[0m\x1b[7m"));
        assert_eq!(text.matches("\x1b[35m").count(), 2);
    }

    #[test]
    fn pen_adds_attributes_without_reset() {
        let text = draw_cells(&[
            (0, 0, Cell::new('x')),
            (1, 0, Cell::styled('1', CellColor::YELLOW, CellColor::Default, Attr::BOLD)),
        ]);
        assert!(!text.contains("\x1b[0m"));
        assert!(text.contains("\x1b[1m"));
    }

    #[test]
    fn pen_skips_right_half_of_wide_glyph() {
        let text = draw_cells(&[
            (3, 0, Cell::new('日')),
            (4, 0, Cell::continuation(CellColor::Default, CellColor::Default, Attr::empty())),
            (5, 0, Cell::new('x')),
        ]);
        assert!(text.ends_with("日x"));
        assert_eq!(text.matches('H').count(), 1);
    }

    #[test]
    fn pen_blanks_a_lone_right_half() {
        let lone = Cell::continuation(CellColor::Default, CellColor::BLUE, Attr::empty());
        let text = draw_cells(&[(4, 0, lone)]);
        assert!(text.starts_with("\x1b[1;5H"));
        assert!(text.ends_with(' '));
    }

    #[test]
    fn glyphs_outside_unicode_become_question_marks() {
        let mut out = Vec::new();
        push_glyph(&mut out, u32::from('é'));
        push_glyph(&mut out, 0);
        push_glyph(&mut out, 0xD800);
        assert_eq!(out, "é??".as_bytes());
    }

    // ── DiffRenderer ────────────────────────────────────────────────────

    #[test]
    fn first_frame_clears_and_draws_everything() {
        let mut renderer = DiffRenderer::new();
        let (stats, text) = render_text(&mut renderer, &FrameBuffer::new(10, 5));
        assert_eq!(stats.cells_rendered, 50);
        assert_eq!(stats.cells_skipped, 0);
        assert!(text.starts_with("\x1b[?2026h"));
        assert!(text.contains("\x1b[2J"));
        assert!(text.ends_with("\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn repeated_frame_sends_no_cells() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(10, 5);
        renderer.render(&frame, None);
        let (stats, text) = render_text(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 0);
        assert_eq!(stats.cells_skipped, 50);
        assert!(!text.contains("\x1b[2J"));
    }

    #[test]
    fn one_changed_cell_is_one_write() {
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(10, 5);
        renderer.render(&frame, None);

        frame.set(7, 4, Cell::new('*'));
        let (stats, text) = render_text(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 1);
        assert_eq!(stats.total_cells(), 50);
        assert!(text.contains("\x1b[5;8H"));
        assert!(text.contains('*'));
    }

    #[test]
    fn new_extent_or_forced_redraw_repaints_all() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(10, 5), None);
        let (stats, text) = render_text(&mut renderer, &FrameBuffer::new(20, 10));
        assert_eq!(stats.cells_rendered, 200);
        assert!(text.contains("\x1b[2J"));

        renderer.force_redraw();
        let (stats, _) = render_text(&mut renderer, &FrameBuffer::new(20, 10));
        assert_eq!(stats.cells_rendered, 200);
    }

    #[test]
    fn styles_reach_the_output() {
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(4, 1);
        frame.set(0, 0, Cell::styled('9', CellColor::YELLOW, CellColor::BLUE, Attr::BOLD));
        let (_, text) = render_text(&mut renderer, &frame);
        assert!(text.contains("\x1b[1m\x1b[33m\x1b[44m9"));
    }

    #[test]
    fn cursor_is_placed_last_with_its_shape() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(10, 5), Some((3, 2, CursorShape::SteadyBar)));
        let text = String::from_utf8_lossy(renderer.output_bytes()).into_owned();
        assert!(text.ends_with("\x1b[3;4H\x1b[6 q\x1b[?25h\x1b[?2026l"));
    }

    #[test]
    fn without_cursor_it_stays_hidden() {
        let mut renderer = DiffRenderer::new();
        let (_, text) = render_text(&mut renderer, &FrameBuffer::new(2, 2));
        assert!(text.contains("\x1b[?25l"));
        assert!(!text.contains("\x1b[?25h"));
    }

    #[test]
    fn empty_frame_sends_nothing() {
        let mut renderer = DiffRenderer::new();
        let (stats, text) = render_text(&mut renderer, &FrameBuffer::new(0, 0));
        assert_eq!(stats, RenderStats::default());
        assert!(text.is_empty());
    }

    #[test]
    fn flush_drains_pending_output_once() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(2, 1), None);
        let mut first = Vec::new();
        renderer.flush_to(&mut first).unwrap();
        assert!(!first.is_empty());
        assert!(renderer.output_bytes().is_empty());

        let mut second = Vec::new();
        renderer.flush_to(&mut second).unwrap();
        assert!(second.is_empty());
    }
}
