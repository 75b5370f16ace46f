#![forbid(unsafe_code)]

//! Frame: the render target handed to `Model::view`.

use deptgate_core::geometry::Rect;

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::style::Style;

/// A buffer plus the cursor the view wants shown after presenting.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    /// Where to place a visible cursor, or `None` to keep it hidden.
    pub cursor_position: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            cursor_position: None,
        }
    }

    #[inline]
    pub fn area(&self) -> Rect {
        self.buffer.area()
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Write `text` starting at (x, y), clipped to `max_x`.
    ///
    /// Returns the column after the last written cell.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style, max_x: u16) -> u16 {
        use unicode_width::UnicodeWidthChar;

        let limit = max_x.min(self.buffer.width());
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > limit {
                break;
            }
            self.buffer.set(col, y, Cell::from_char(ch).with_style(style));
            col += w;
        }
        col
    }

    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor_position = position;
    }
}
