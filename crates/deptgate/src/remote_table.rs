#![forbid(unsafe_code)]

//! Paginated view over the remote item list.

use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_widgets::Widget;
use deptgate_widgets::paginator::{PageState, Paginator};
use deptgate_widgets::paragraph::{Line, Paragraph};
use deptgate_widgets::table::{ColumnWidth, Row, Table};

use crate::domain::RemoteItem;
use crate::item_source::FetchError;
use crate::theme;

/// Rows per page.
pub const PAGE_SIZE: usize = 5;

const HEADER: [&str; 3] = ["ID", "Title", "Body"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Pending,
    Loaded(Vec<RemoteItem>),
    Failed(FetchError),
}

/// Fetch outcome plus the page cursor.
#[derive(Debug, Clone)]
pub struct RemoteTable {
    state: FetchState,
    pages: PageState,
}

impl Default for RemoteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteTable {
    pub fn new() -> Self {
        Self {
            state: FetchState::Pending,
            pages: PageState::new(PAGE_SIZE),
        }
    }

    /// Store the one fetch result. Failures are logged and shown as no rows.
    pub fn apply_result(&mut self, result: Result<Vec<RemoteItem>, FetchError>) {
        self.state = match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "remote items loaded");
                FetchState::Loaded(items)
            }
            Err(err) => {
                tracing::error!(error = %err, "remote item fetch failed");
                FetchState::Failed(err)
            }
        };
        let len = self.len();
        self.pages.first(len);
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, FetchState::Pending)
    }

    /// Loaded items; empty while pending or after a failure.
    pub fn items(&self) -> &[RemoteItem] {
        match &self.state {
            FetchState::Loaded(items) => items,
            FetchState::Pending | FetchState::Failed(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Items on the current page.
    pub fn page_items(&self) -> &[RemoteItem] {
        &self.items()[self.pages.range(self.len())]
    }

    /// Zero-based current page.
    pub fn page(&self) -> usize {
        self.pages.page(self.len())
    }

    pub fn total_pages(&self) -> usize {
        self.pages.total_pages(self.len())
    }

    pub fn next_page(&mut self) -> bool {
        let len = self.len();
        self.pages.next(len)
    }

    pub fn prev_page(&mut self) -> bool {
        let len = self.len();
        self.pages.prev(len)
    }

    pub fn first_page(&mut self) -> bool {
        let len = self.len();
        self.pages.first(len)
    }

    pub fn last_page(&mut self) -> bool {
        let len = self.len();
        self.pages.last(len)
    }

    pub fn status_line(&self) -> String {
        if self.is_pending() {
            return "Loading…".to_string();
        }
        let len = self.len();
        if len == 0 {
            return "No rows".to_string();
        }
        let range = self.pages.range(len);
        format!(
            "{} · rows {}–{} of {len}",
            Paginator::for_state(&self.pages, len).label(),
            range.start + 1,
            range.end
        )
    }

    fn table(&self) -> Table {
        let rows = self
            .page_items()
            .iter()
            .map(|item| Row::new([item.id.to_string(), item.title.clone(), item.body.clone()]))
            .collect();
        Table::new(
            rows,
            vec![
                ColumnWidth::Fixed(6),
                ColumnWidth::Fill(1),
                ColumnWidth::Fill(2),
            ],
        )
        .header(Row::new(HEADER))
        .header_style(theme::header())
    }

    /// Draw the grid with the status line on the area's last row.
    pub fn render(&self, area: Rect, frame: &mut Frame, focused: bool) {
        if area.is_empty() {
            return;
        }
        let (grid, status) = area.split_bottom(1);
        self.table().render(grid, frame);
        let style = if focused {
            theme::status().patch(theme::focused())
        } else {
            theme::status()
        };
        Paragraph::new(vec![Line::styled(self.status_line(), style)]).render(status, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: i64) -> Vec<RemoteItem> {
        (1..=n)
            .map(|id| RemoteItem {
                id,
                title: format!("title {id}"),
                body: format!("body {id}"),
                owner_id: 1,
            })
            .collect()
    }

    #[test]
    fn pending_shows_loading() {
        let table = RemoteTable::new();
        assert!(table.is_pending());
        assert!(table.items().is_empty());
        assert_eq!(table.status_line(), "Loading…");
    }

    #[test]
    fn single_item_renders_one_row() {
        let mut table = RemoteTable::new();
        table.apply_result(Ok(vec![RemoteItem {
            id: 1,
            title: "a".into(),
            body: "b".into(),
            owner_id: 9,
        }]));
        assert_eq!(table.page_items().len(), 1);
        let mut frame = Frame::new(40, 4);
        table.render(frame.area(), &mut frame, false);
        let text = frame.buffer.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].contains('a'));
        assert!(lines[1].contains('b'));
        assert_eq!(table.status_line(), "Page 1/1 · rows 1–1 of 1");
    }

    #[test]
    fn failure_shows_no_rows() {
        let mut table = RemoteTable::new();
        table.apply_result(Err(FetchError::Transport("refused".into())));
        assert!(matches!(table.state(), FetchState::Failed(_)));
        assert!(table.items().is_empty());
        assert_eq!(table.status_line(), "No rows");
    }

    #[test]
    fn pages_hold_five_rows() {
        let mut table = RemoteTable::new();
        table.apply_result(Ok(items(12)));
        assert_eq!(table.total_pages(), 3);
        assert_eq!(table.page_items().len(), PAGE_SIZE);
        assert!(table.next_page());
        assert_eq!(table.page_items()[0].id, 6);
        assert!(table.last_page());
        assert_eq!(table.page_items().len(), 2);
        assert_eq!(table.status_line(), "Page 3/3 · rows 11–12 of 12");
        assert!(!table.next_page());
        assert!(table.first_page());
        assert!(!table.prev_page());
    }
}
