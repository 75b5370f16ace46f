#![forbid(unsafe_code)]

//! Bordered container with an optional title.

use bitflags::bitflags;
use deptgate_core::geometry::{Rect, Sides};
use deptgate_render::cell::Cell;
use deptgate_render::frame::Frame;
use deptgate_render::style::Style;

use crate::{Widget, draw_text_span};

bitflags! {
    /// Which sides of a block carry a border.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Borders: u8 {
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
        const ALL    = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';

/// A widget that draws a block with optional borders and title.
#[derive(Debug, Clone, Default)]
pub struct Block<'a> {
    borders: Borders,
    border_style: Style,
    title: Option<&'a str>,
    title_style: Style,
}

impl<'a> Block<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block with all borders enabled.
    pub fn bordered() -> Self {
        Self::default().borders(Borders::ALL)
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    /// Title drawn over the top border (or the first row without one).
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    /// Area left for content once borders are drawn.
    pub fn inner(&self, area: Rect) -> Rect {
        let side = |flag: Borders| u16::from(self.borders.contains(flag));
        area.inner(Sides::new(
            side(Borders::TOP).max(u16::from(self.title.is_some())),
            side(Borders::RIGHT),
            side(Borders::BOTTOM),
            side(Borders::LEFT),
        ))
    }

    fn put(&self, frame: &mut Frame, x: u16, y: u16, ch: char) {
        frame
            .buffer
            .set(x, y, Cell::from_char(ch).with_style(self.border_style));
    }
}

impl Widget for Block<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Block",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;

        if self.borders.contains(Borders::TOP) {
            for x in area.x..area.right() {
                self.put(frame, x, area.y, HORIZONTAL);
            }
        }
        if self.borders.contains(Borders::BOTTOM) {
            for x in area.x..area.right() {
                self.put(frame, x, bottom, HORIZONTAL);
            }
        }
        if self.borders.contains(Borders::LEFT) {
            for y in area.y..area.bottom() {
                self.put(frame, area.x, y, VERTICAL);
            }
        }
        if self.borders.contains(Borders::RIGHT) {
            for y in area.y..area.bottom() {
                self.put(frame, right, y, VERTICAL);
            }
        }
        if self.borders.contains(Borders::TOP | Borders::LEFT) {
            self.put(frame, area.x, area.y, TOP_LEFT);
        }
        if self.borders.contains(Borders::TOP | Borders::RIGHT) {
            self.put(frame, right, area.y, TOP_RIGHT);
        }
        if self.borders.contains(Borders::BOTTOM | Borders::LEFT) {
            self.put(frame, area.x, bottom, BOTTOM_LEFT);
        }
        if self.borders.contains(Borders::BOTTOM | Borders::RIGHT) {
            self.put(frame, right, bottom, BOTTOM_RIGHT);
        }

        if let Some(title) = self.title {
            let inset = u16::from(self.borders.contains(Borders::LEFT));
            let x = area.x + inset;
            let max_x = area.right().saturating_sub(inset);
            if x < max_x {
                draw_text_span(frame, x, area.y, title, self.title_style, max_x);
            }
        }
    }
}
