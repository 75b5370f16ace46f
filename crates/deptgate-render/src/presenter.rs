#![forbid(unsafe_code)]

//! Presenter: state-tracked terminal output.
//!
//! The presenter compares the next buffer against the previously presented
//! one row by row and only rewrites rows that changed. Within a row it tracks
//! the current style so escape sequences are emitted only on style changes.
//!
//! # Usage
//!
//! ```ignore
//! let mut presenter = Presenter::new(std::io::stdout());
//! let mut prev: Option<Buffer> = None;
//! presenter.present(&frame.buffer, prev.as_ref(), frame.cursor_position)?;
//! prev = Some(frame.buffer);
//! ```

use std::io::{self, BufWriter, Write};

use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, style, terminal};

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::style::{Color, StyleFlags};

const BUFFER_CAPACITY: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: Color,
    bg: Color,
    attrs: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// Row-diffing presenter over any writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Current style state (None = unknown/reset).
    current_style: Option<CellStyle>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
        }
    }

    /// Present `next`, rewriting only rows that differ from `prev`.
    ///
    /// A `prev` of a different size (or none) forces a full clear and redraw.
    /// Returns the number of rows written.
    pub fn present(
        &mut self,
        next: &Buffer,
        prev: Option<&Buffer>,
        cursor_position: Option<(u16, u16)>,
    ) -> io::Result<usize> {
        let _span = tracing::trace_span!(
            "present",
            width = next.width(),
            height = next.height()
        )
        .entered();

        let prev = prev.filter(|p| p.width() == next.width() && p.height() == next.height());
        if prev.is_none() {
            queue!(self.writer, terminal::Clear(terminal::ClearType::All))?;
        }

        let mut rows_written = 0;
        for y in 0..next.height() {
            let row = next.row_cells(y);
            if prev.is_some_and(|p| p.row_cells(y) == row) {
                continue;
            }
            queue!(self.writer, cursor::MoveTo(0, y))?;
            for cell in row {
                self.emit_cell(cell)?;
            }
            rows_written += 1;
        }

        queue!(self.writer, SetAttribute(Attribute::Reset), style::ResetColor)?;
        self.current_style = None;

        match cursor_position {
            Some((x, y)) => queue!(self.writer, cursor::MoveTo(x, y), cursor::Show)?,
            None => queue!(self.writer, cursor::Hide)?,
        }

        tracing::trace!(rows_written, "frame presented");
        self.writer.flush()?;
        Ok(rows_written)
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        // Wide characters advance the cursor over their continuation cells.
        if cell.is_continuation() {
            return Ok(());
        }
        self.emit_style_changes(cell)?;
        queue!(self.writer, Print(cell.ch))
    }

    fn emit_style_changes(&mut self, cell: &Cell) -> io::Result<()> {
        let new_style = CellStyle::from_cell(cell);
        if self.current_style == Some(new_style) {
            return Ok(());
        }

        // Reset then apply; simpler than incremental attribute diffs.
        queue!(self.writer, SetAttribute(Attribute::Reset))?;
        queue!(
            self.writer,
            SetForegroundColor(new_style.fg.into()),
            SetBackgroundColor(new_style.bg.into())
        )?;
        for (flag, attr) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ] {
            if new_style.attrs.contains(flag) {
                queue!(self.writer, SetAttribute(attr))?;
            }
        }

        self.current_style = Some(new_style);
        Ok(())
    }

    /// Flush and return the inner writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
