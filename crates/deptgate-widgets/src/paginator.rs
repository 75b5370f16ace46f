#![forbid(unsafe_code)]

//! Page state and the page indicator widget.

use std::ops::Range;

use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_render::style::Style;

use crate::{Widget, draw_text_span};

/// Zero-based page cursor over a list of `len` items.
///
/// The page index is clamped on every access so it stays valid when the
/// item count changes underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    page_size: usize,
}

impl PageState {
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self { page: 0, page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; an empty list still has one (empty) page.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Current zero-based page, clamped to `len`.
    pub fn page(&self, len: usize) -> usize {
        self.page.min(self.total_pages(len) - 1)
    }

    /// Item index range shown on the current page.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page(len) * self.page_size).min(len);
        start..(start + self.page_size).min(len)
    }

    /// Returns `true` if the page moved.
    pub fn next(&mut self, len: usize) -> bool {
        self.go_to(self.page(len) + 1, len)
    }

    pub fn prev(&mut self, len: usize) -> bool {
        self.go_to(self.page(len).saturating_sub(1), len)
    }

    pub fn first(&mut self, len: usize) -> bool {
        self.go_to(0, len)
    }

    pub fn last(&mut self, len: usize) -> bool {
        self.go_to(self.total_pages(len) - 1, len)
    }

    fn go_to(&mut self, page: usize, len: usize) -> bool {
        let before = self.page(len);
        self.page = page.min(self.total_pages(len) - 1);
        self.page != before
    }
}

/// Renders "Page X/Y".
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    current_page: usize,
    total_pages: usize,
    style: Style,
}

impl Paginator {
    /// `current_page` is one-based.
    pub fn with_pages(current_page: usize, total_pages: usize) -> Self {
        Self {
            current_page,
            total_pages,
            style: Style::default(),
        }
    }

    /// Indicator for a [`PageState`] over `len` items.
    pub fn for_state(state: &PageState, len: usize) -> Self {
        Self::with_pages(state.page(len) + 1, state.total_pages(len))
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn label(&self) -> String {
        if self.total_pages == 0 {
            return "Page 0/0".to_string();
        }
        let current = self.current_page.clamp(1, self.total_pages);
        format!("Page {current}/{}", self.total_pages)
    }
}

impl Widget for Paginator {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        draw_text_span(frame, area.x, area.y, &self.label(), self.style, area.right());
    }
}
