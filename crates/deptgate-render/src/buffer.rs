#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s representing the terminal display.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A wide character is written whole or not at all

use deptgate_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

use crate::cell::{CONTINUATION, Cell};
use crate::style::Style;

/// A 2D grid of terminal cells stored in row-major order.
///
/// # Example
///
/// ```
/// use deptgate_render::buffer::Buffer;
/// use deptgate_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// assert_eq!(buffer.row_text(0).trim_end(), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with blank cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer bounds.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// Out-of-bounds writes are ignored. Wide characters also claim the
    /// following cell as a continuation; if that cell is out of bounds the
    /// write is skipped entirely.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.ch.width().unwrap_or(0);
        if width <= 1 {
            if let Some(idx) = self.index(x, y) {
                self.cells[idx] = cell;
            }
            return;
        }

        let Some(tail) = x.checked_add(width as u16 - 1) else {
            return;
        };
        if self.index(tail, y).is_none() {
            return;
        }
        for dx in 0..width as u16 {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx] = if dx == 0 {
                    cell
                } else {
                    Cell {
                        ch: CONTINUATION,
                        ..cell
                    }
                };
            }
        }
    }

    /// Fill a rectangle (clipped to the buffer) with a cell.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.area());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                if let Some(idx) = self.index(x, y) {
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Layer a style over every cell in a rectangle, keeping content.
    pub fn set_style(&mut self, rect: Rect, style: Style) {
        if style.is_empty() {
            return;
        }
        let clipped = rect.intersection(&self.area());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.apply(style);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Cells of row `y` (empty slice when out of bounds).
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        match self.index(0, y) {
            Some(start) => &self.cells[start..start + self.width as usize],
            None => &[],
        }
    }

    /// Text content of row `y`, skipping continuation cells.
    pub fn row_text(&self, y: u16) -> String {
        self.row_cells(y)
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    /// All rows joined with newlines, trailing spaces trimmed.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
