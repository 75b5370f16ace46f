#![forbid(unsafe_code)]

//! Two-level tree of expandable groups with checkable items.
//!
//! The widget only draws; callers flatten their tree into visible
//! [`TreeRow`]s and own the expansion and check state.

use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_render::style::Style;

use crate::{Widget, draw_text_span, truncate_to_width};

const COLLAPSED: &str = "▸ ";
const EXPANDED: &str = "▾ ";
const CHECKED: &str = "[x] ";
const UNCHECKED: &str = "[ ] ";
const ITEM_INDENT: &str = "    ";

/// What a visible row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRowKind {
    Group { expanded: bool },
    Item { checked: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub kind: TreeRowKind,
    pub label: String,
}

impl TreeRow {
    pub fn group(label: impl Into<String>, expanded: bool) -> Self {
        Self {
            kind: TreeRowKind::Group { expanded },
            label: label.into(),
        }
    }

    pub fn item(label: impl Into<String>, checked: bool) -> Self {
        Self {
            kind: TreeRowKind::Item { checked },
            label: label.into(),
        }
    }

    /// Row text including the marker prefix.
    pub fn text(&self) -> String {
        match self.kind {
            TreeRowKind::Group { expanded } => {
                format!("{}{}", if expanded { EXPANDED } else { COLLAPSED }, self.label)
            }
            TreeRowKind::Item { checked } => format!(
                "{ITEM_INDENT}{}{}",
                if checked { CHECKED } else { UNCHECKED },
                self.label
            ),
        }
    }
}

/// Renders [`TreeRow`]s, highlighting the cursor row.
#[derive(Debug, Clone, Default)]
pub struct CheckTree<'a> {
    rows: &'a [TreeRow],
    cursor: Option<usize>,
    style: Style,
    group_style: Style,
    cursor_style: Style,
}

impl<'a> CheckTree<'a> {
    pub fn new(rows: &'a [TreeRow]) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Row to highlight; `None` draws no highlight.
    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn group_style(mut self, style: Style) -> Self {
        self.group_style = style;
        self
    }

    pub fn cursor_style(mut self, style: Style) -> Self {
        self.cursor_style = style;
        self
    }

    /// First row drawn so the cursor stays in view.
    fn offset(&self, height: usize) -> usize {
        match self.cursor {
            Some(c) if height > 0 && c >= height => c + 1 - height,
            _ => 0,
        }
    }
}

impl Widget for CheckTree<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "CheckTree",
            rows = self.rows.len(),
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let offset = self.offset(area.height as usize);
        for (dy, (idx, row)) in self.rows.iter().enumerate().skip(offset).enumerate() {
            let Some(line) = area.row(dy as u16) else {
                break;
            };
            let mut style = self.style;
            if matches!(row.kind, TreeRowKind::Group { .. }) {
                style = style.patch(self.group_style);
            }
            if self.cursor == Some(idx) {
                style = style.patch(self.cursor_style);
                frame.buffer.set_style(line, style);
            }
            let text = truncate_to_width(&row.text(), line.width as usize);
            draw_text_span(frame, line.x, line.y, &text, style, line.right());
        }
    }
}
