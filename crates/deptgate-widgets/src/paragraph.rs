#![forbid(unsafe_code)]

//! Multi-line text with optional word wrapping.

use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_render::style::Style;
use unicode_width::UnicodeWidthStr;

use crate::{Widget, draw_text_span};

/// One styled line of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

impl Line {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::styled(text, Style::new())
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Lines rendered top to bottom, clipped to the area.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    lines: Vec<Line>,
    wrap: bool,
}

impl Paragraph {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines, wrap: false }
    }

    /// Break long lines at word boundaries instead of clipping them.
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Visual rows this paragraph needs at `width`.
    pub fn height(&self, width: u16) -> usize {
        self.visual_lines(width).len()
    }

    fn visual_lines(&self, width: u16) -> Vec<(String, Style)> {
        let mut out = Vec::new();
        for line in &self.lines {
            if !self.wrap || UnicodeWidthStr::width(line.text.as_str()) <= width as usize {
                out.push((line.text.clone(), line.style));
                continue;
            }
            for piece in wrap_words(&line.text, width as usize) {
                out.push((piece, line.style));
            }
        }
        out
    }
}

/// Greedy word wrap. Words wider than `width` are split mid-word.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            UnicodeWidthStr::width(word)
        } else {
            UnicodeWidthStr::width(current.as_str()) + 1 + UnicodeWidthStr::width(word)
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        let mut rest = word;
        while UnicodeWidthStr::width(rest) > width {
            let split = rest
                .char_indices()
                .scan(0, |used, (i, c)| {
                    *used += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
                    Some((i + c.len_utf8(), *used))
                })
                .take_while(|&(_, used)| used <= width)
                .last()
                .map_or(rest.len(), |(end, _)| end);
            if split == 0 {
                break;
            }
            rows.push(rest[..split].to_string());
            rest = &rest[split..];
        }
        current.push_str(rest);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

impl Widget for Paragraph {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Paragraph",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        for (dy, (text, style)) in self.visual_lines(area.width).iter().enumerate() {
            let Some(row) = area.row(dy as u16) else {
                break;
            };
            draw_text_span(frame, row.x, row.y, text, *style, row.right());
        }
    }
}
