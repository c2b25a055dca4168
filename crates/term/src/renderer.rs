//! Flushes a [`Canvas`] to the real terminal, redrawing only changed runs.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::canvas::{Canvas, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    previous: Option<Canvas>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            previous: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Next draw repaints everything; call after a resize.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Draw `canvas`, then swap it with the retained previous frame so the
    /// caller can reuse the allocation for the next frame.
    pub fn present(&mut self, canvas: &mut Canvas) -> Result<()> {
        self.buf.clear();
        let mut previous = match self.previous.take() {
            Some(prev) if prev.width() == canvas.width() && prev.height() == canvas.height() => {
                encode_diff_into(&prev, canvas, &mut self.buf)?;
                prev
            }
            _ => {
                encode_full_into(canvas, &mut self.buf)?;
                Canvas::new(canvas.width(), canvas.height())
            }
        };
        self.flush()?;
        std::mem::swap(&mut previous, canvas);
        self.previous = Some(previous);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Full repaint of `canvas` as crossterm commands.
pub fn encode_full_into(canvas: &Canvas, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..canvas.height() {
        out.queue(cursor::MoveTo(0, y))?;
        write_run(canvas, 0, y, canvas.width(), &mut style, out)?;
    }
    reset_into(out)
}

/// Repaint only the cells of `next` that differ from `prev`.
///
/// Both canvases must have the same size.
pub fn encode_diff_into(prev: &Canvas, next: &Canvas, out: &mut Vec<u8>) -> Result<()> {
    let mut style = None;
    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        write_run(next, x, y, len, &mut style, out)?;
    }
    reset_into(out)
}

/// Horizontal runs `(x, y, len)` of differing cells.
pub fn changed_runs(prev: &Canvas, next: &Canvas) -> Vec<(u16, u16, u16)> {
    let mut runs = Vec::new();
    for y in 0..next.height() {
        let mut start = None;
        for x in 0..next.width() {
            let differs = prev.get(x, y) != next.get(x, y);
            match (differs, start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push((s, y, x - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, y, next.width() - s));
        }
    }
    runs
}

fn write_run(
    canvas: &Canvas,
    x: u16,
    y: u16,
    len: u16,
    current: &mut Option<Style>,
    out: &mut Vec<u8>,
) -> Result<()> {
    for dx in 0..len {
        let glyph = canvas.get(x + dx, y).unwrap_or_default();
        if *current != Some(glyph.style) {
            apply_style_into(out, glyph.style)?;
            *current = Some(glyph.style);
        }
        out.queue(Print(glyph.ch))?;
    }
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: Style) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(to_color(style.fg)))?;
    out.queue(SetBackgroundColor(to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn reset_into(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
