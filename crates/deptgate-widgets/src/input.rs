#![forbid(unsafe_code)]

//! Text input widget.
//!
//! A single-line text field with cursor management, horizontal scrolling,
//! word-level movement, and paste support. Cursor positions count grapheme
//! clusters, not bytes.

use deptgate_core::event::{Event, KeyCode, KeyEvent};
use deptgate_core::geometry::Rect;
use deptgate_render::cell::Cell;
use deptgate_render::frame::Frame;
use deptgate_render::style::{Style, StyleFlags};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::Widget;

/// A single-line text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
    placeholder: String,
    /// Maximum length in graphemes (None = unlimited).
    max_length: Option<usize>,
    style: Style,
    placeholder_style: Style,
    /// Whether the input is focused (controls cursor output).
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text value and move the cursor to its end (builder).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.grapheme_count();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_placeholder_style(mut self, style: Style) -> Self {
        self.placeholder_style = style;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value, clamping the cursor to the new length.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(self.grapheme_count());
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Cursor position (grapheme index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Handle a terminal event.
    ///
    /// Returns `true` if the value or cursor changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Paste(text) = event {
            return self.insert_str(text);
        }
        match event.as_key_press() {
            Some(key) => self.handle_key(key),
            None => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.ctrl();
        match key.code {
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Backspace if ctrl => self.delete_word_back(),
            KeyCode::Backspace => self.delete_char_back(),
            KeyCode::Delete => self.delete_char_forward(),
            KeyCode::Left if ctrl => self.move_to(self.word_start_before(self.cursor)),
            KeyCode::Right if ctrl => self.move_to(self.word_end_after(self.cursor)),
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to((self.cursor + 1).min(self.grapheme_count())),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.grapheme_count()),
            _ => false,
        }
    }

    // --- Editing operations ---

    fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        if let Some(max) = self.max_length
            && self.grapheme_count() >= max
        {
            return false;
        }
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert(byte_offset, c);
        // A combining mark joins the previous cluster instead of adding one.
        self.cursor = self.value[..byte_offset + c.len_utf8()].graphemes(true).count();
        true
    }

    /// Insert pasted text; line breaks become spaces.
    fn insert_str(&mut self, text: &str) -> bool {
        let mut changed = false;
        for c in text.chars() {
            let c = if c == '\n' || c == '\r' { ' ' } else { c };
            changed |= self.insert_char(c);
        }
        changed
    }

    fn delete_char_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.delete_range(self.cursor - 1, self.cursor);
        self.cursor -= 1;
        true
    }

    fn delete_char_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        self.delete_range(self.cursor, self.cursor + 1);
        true
    }

    fn delete_word_back(&mut self) -> bool {
        let start = self.word_start_before(self.cursor);
        if start == self.cursor {
            return false;
        }
        self.delete_range(start, self.cursor);
        self.cursor = start;
        true
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let byte_start = self.grapheme_byte_offset(start);
        let byte_end = self.grapheme_byte_offset(end);
        self.value.drain(byte_start..byte_end);
    }

    // --- Cursor movement ---

    fn move_to(&mut self, pos: usize) -> bool {
        let changed = pos != self.cursor;
        self.cursor = pos;
        changed
    }

    fn word_start_before(&self, from: usize) -> usize {
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = from;
        while pos > 0 && is_space(graphemes[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && !is_space(graphemes[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    fn word_end_after(&self, from: usize) -> usize {
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = from;
        while pos < graphemes.len() && is_space(graphemes[pos]) {
            pos += 1;
        }
        while pos < graphemes.len() && !is_space(graphemes[pos]) {
            pos += 1;
        }
        pos
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn cursor_visual_pos(&self) -> usize {
        self.value
            .graphemes(true)
            .take(self.cursor)
            .map(UnicodeWidthStr::width)
            .sum()
    }

    /// First visible column so the cursor stays inside the viewport.
    fn scroll_for(&self, viewport_width: usize) -> usize {
        let cursor_visual = self.cursor_visual_pos();
        (cursor_visual + 1).saturating_sub(viewport_width)
    }
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

impl Widget for TextInput {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TextInput",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        frame.buffer.set_style(area.row(0).unwrap_or(area), self.style);

        let viewport_width = area.width as usize;
        let scroll = self.scroll_for(viewport_width);
        let (text, style) = if self.value.is_empty() {
            (self.placeholder.as_str(), self.placeholder_style)
        } else {
            (self.value.as_str(), self.style)
        };

        let mut visual_x = 0usize;
        for g in text.graphemes(true) {
            let w = UnicodeWidthStr::width(g);
            if visual_x < scroll {
                visual_x += w;
                continue;
            }
            let rel_x = visual_x - scroll;
            if rel_x + w > viewport_width {
                break;
            }
            if let Some(c) = g.chars().next() {
                frame
                    .buffer
                    .set(area.x + rel_x as u16, area.y, Cell::from_char(c).with_style(style));
            }
            visual_x += w;
        }

        if self.focused {
            let cursor_x = area.x + (self.cursor_visual_pos() - scroll) as u16;
            if let Some(cell) = frame.buffer.get_mut(cursor_x, area.y) {
                cell.attrs ^= StyleFlags::REVERSE;
            }
            frame.set_cursor(Some((cursor_x, area.y)));
        }
    }
}
