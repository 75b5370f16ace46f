#![forbid(unsafe_code)]

//! Table widget with fixed and fill columns.

use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_render::style::Style;

use crate::{Widget, draw_text_span, truncate_to_width};

/// A row of cell texts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<String>,
    pub style: Style,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// How wide a column is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Exactly this many cells (less if the area runs out).
    Fixed(u16),
    /// A share of whatever the fixed columns leave over.
    Fill(u16),
}

/// A table of rows rendered under an optional header.
///
/// Cells wider than their column end in `…`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Option<Row>,
    rows: Vec<Row>,
    widths: Vec<ColumnWidth>,
    column_spacing: u16,
    header_style: Style,
    style: Style,
}

impl Table {
    pub fn new(rows: Vec<Row>, widths: Vec<ColumnWidth>) -> Self {
        Self {
            rows,
            widths,
            column_spacing: 1,
            ..Self::default()
        }
    }

    pub fn header(mut self, header: Row) -> Self {
        self.header = Some(header);
        self
    }

    pub fn header_style(mut self, style: Style) -> Self {
        self.header_style = style;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn column_spacing(mut self, spacing: u16) -> Self {
        self.column_spacing = spacing;
        self
    }

    /// Column rectangles (one row tall, at `area.y`) for the given area.
    pub fn column_rects(&self, area: Rect) -> Vec<Rect> {
        let gaps = self
            .column_spacing
            .saturating_mul(self.widths.len().saturating_sub(1) as u16);
        let fixed: u16 = self
            .widths
            .iter()
            .map(|w| match w {
                ColumnWidth::Fixed(n) => *n,
                ColumnWidth::Fill(_) => 0,
            })
            .fold(0u16, u16::saturating_add);
        let weights: u32 = self
            .widths
            .iter()
            .map(|w| match w {
                ColumnWidth::Fill(n) => u32::from(*n),
                ColumnWidth::Fixed(_) => 0,
            })
            .sum();
        let spare = u32::from(area.width.saturating_sub(fixed).saturating_sub(gaps));

        let mut rects = Vec::with_capacity(self.widths.len());
        let mut x = area.x;
        let mut fill_given = 0u32;
        let mut weight_seen = 0u32;
        for width in &self.widths {
            let want = match width {
                ColumnWidth::Fixed(n) => *n,
                ColumnWidth::Fill(n) => {
                    // Cumulative rounding so fill columns sum to `spare` exactly.
                    weight_seen += u32::from(*n);
                    let upto = (spare * weight_seen).checked_div(weights).unwrap_or(0);
                    let share = upto - fill_given;
                    fill_given = upto;
                    share as u16
                }
            };
            let w = want.min(area.right().saturating_sub(x));
            rects.push(Rect::new(x, area.y, w, 1));
            x = x.saturating_add(w).saturating_add(self.column_spacing).min(area.right());
        }
        rects
    }

    fn render_row(&self, row: &Row, cols: &[Rect], frame: &mut Frame, y: u16, style: Style) {
        for (text, col) in row.cells.iter().zip(cols) {
            if col.width == 0 {
                continue;
            }
            let shown = truncate_to_width(text, col.width as usize);
            draw_text_span(frame, col.x, y, &shown, style, col.right());
        }
    }
}

impl Widget for Table {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Table",
            rows = self.rows.len(),
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        frame.buffer.set_style(area, self.style);
        let cols = self.column_rects(area);

        let mut body = area;
        if let Some(header) = &self.header {
            let (head, rest) = area.split_top(1);
            let style = self.style.patch(self.header_style).patch(header.style);
            frame.buffer.set_style(head, style);
            self.render_row(header, &cols, frame, head.y, style);
            body = rest;
        }

        for (dy, row) in self.rows.iter().enumerate() {
            let Some(line) = body.row(dy as u16) else {
                break;
            };
            let style = self.style.patch(row.style);
            self.render_row(row, &cols, frame, line.y, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths() -> Vec<ColumnWidth> {
        vec![
            ColumnWidth::Fixed(3),
            ColumnWidth::Fill(1),
            ColumnWidth::Fill(1),
        ]
    }

    #[test]
    fn fill_columns_share_spare_width() {
        let table = Table::new(vec![], widths());
        let cols = table.column_rects(Rect::new(0, 0, 15, 1));
        assert_eq!(cols[0], Rect::new(0, 0, 3, 1));
        assert_eq!(cols[1], Rect::new(4, 0, 5, 1));
        assert_eq!(cols[2], Rect::new(10, 0, 5, 1));
    }

    #[test]
    fn columns_never_pass_area() {
        let table = Table::new(vec![], vec![ColumnWidth::Fixed(10), ColumnWidth::Fixed(10)]);
        let area = Rect::new(2, 0, 12, 1);
        for col in table.column_rects(area) {
            assert!(col.right() <= area.right());
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let table = Table::new(
            vec![Row::new(["1", "a", "b"]), Row::new(["2", "c", "d"])],
            widths(),
        )
        .header(Row::new(["ID", "Title", "Body"]));
        let mut frame = Frame::new(15, 4);
        table.render(frame.area(), &mut frame);
        assert_eq!(
            frame.buffer.to_text(),
            "ID  Title Body\n1   a     b\n2   c     d\n"
        );
    }

    #[test]
    fn long_cells_are_truncated() {
        let table = Table::new(vec![Row::new(["7", "abcdefgh", "x"])], widths());
        let mut frame = Frame::new(15, 1);
        table.render(frame.area(), &mut frame);
        assert_eq!(frame.buffer.row_text(0).trim_end(), "7   abcd… x");
    }

    #[test]
    fn rows_beyond_height_are_skipped() {
        let rows = (0..10).map(|i| Row::new([i.to_string()])).collect();
        let table = Table::new(rows, vec![ColumnWidth::Fill(1)]);
        let mut frame = Frame::new(4, 2);
        table.render(frame.area(), &mut frame);
        assert_eq!(frame.buffer.to_text(), "0\n1");
    }
}
