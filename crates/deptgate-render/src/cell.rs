#![forbid(unsafe_code)]

//! A single terminal cell.

use crate::style::{Color, Style, StyleFlags};

/// Marker stored in the trailing cell(s) of a wide character.
///
/// The presenter skips continuation cells; the terminal advances the cursor
/// past them when it prints the wide character itself.
pub const CONTINUATION: char = '\0';

/// One character cell with fully resolved colors and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
            attrs: StyleFlags::empty(),
        }
    }
}

impl Cell {
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        Self {
            ch,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.apply(style);
        self
    }

    /// Layer a partial style onto this cell.
    pub fn apply(&mut self, style: Style) {
        if let Some(fg) = style.fg {
            self.fg = fg;
        }
        if let Some(bg) = style.bg {
            self.bg = bg;
        }
        self.attrs |= style.attrs;
    }

    #[inline]
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }
}
