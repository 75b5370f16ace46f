#![forbid(unsafe_code)]

//! Colors and text styles.

use bitflags::bitflags;

/// Terminal color.
///
/// Named colors follow the terminal's own palette; `Rgb` is emitted as
/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
    Rgb(u8, u8, u8),
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        use crossterm::style::Color as Ct;
        match color {
            Color::Reset => Ct::Reset,
            Color::Black => Ct::Black,
            Color::Red => Ct::DarkRed,
            Color::Green => Ct::DarkGreen,
            Color::Yellow => Ct::DarkYellow,
            Color::Blue => Ct::DarkBlue,
            Color::Magenta => Ct::DarkMagenta,
            Color::Cyan => Ct::DarkCyan,
            Color::White => Ct::White,
            Color::Gray => Ct::Grey,
            Color::DarkGray => Ct::DarkGrey,
            Color::Rgb(r, g, b) => Ct::Rgb { r, g, b },
        }
    }
}

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

/// A partial style: unset fields leave the underlying cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub attrs: StyleFlags,
}

impl Style {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: StyleFlags::empty(),
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.attrs = self.attrs.union(StyleFlags::BOLD);
        self
    }

    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.attrs = self.attrs.union(StyleFlags::DIM);
        self
    }

    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.attrs = self.attrs.union(StyleFlags::UNDERLINE);
        self
    }

    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.attrs = self.attrs.union(StyleFlags::REVERSE);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn patch(self, other: Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: self.attrs | other.attrs,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_empty()
    }
}
