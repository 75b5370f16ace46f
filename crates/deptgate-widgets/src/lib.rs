#![forbid(unsafe_code)]

//! Widgets for DeptGate screens.

pub mod block;
pub mod check_tree;
pub mod input;
pub mod paginator;
pub mod paragraph;
pub mod table;

use deptgate_core::geometry::Rect;
use deptgate_render::cell::Cell;
use deptgate_render::frame::Frame;
use deptgate_render::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Frame` within a given `Rect` and must
/// never write outside it.
pub trait Widget {
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// Draw a text span into a frame at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive) without splitting a wide grapheme.
pub(crate) fn draw_text_span(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x + w as u16 > max_x {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            frame.buffer.set(x, y, Cell::from_char(c).with_style(style));
        }
        x = x.saturating_add(w as u16);
    }
    x
}

/// Shorten `text` to at most `width` columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in text.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > width - 1 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    out
}
