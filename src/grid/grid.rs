//! Grid: A matrix of cells representing the terminal screen.
//!
//! The grid uses contiguous memory allocation for cache efficiency.
//! Cells are stored in row-major order.

use super::cell::{Cell, Style};
use crate::terminal::Surface;
use std::io;

/// A grid of cells representing the terminal screen.
///
/// Access is in row-major order: `index = y * width + x`. A grid is also the
/// headless [`Surface`]: writes land in memory and `flush` is a no-op.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Grid {
    /// Create a new grid with the given dimensions.
    ///
    /// All cells are initialized to empty.
    pub fn new(width: u16, height: u16) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the grid width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the grid height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Fill every cell with a blank of the given style.
    pub fn fill(&mut self, style: Style) {
        self.cells.fill(Cell::new(' ', style));
    }

    /// Resize the grid, preserving content where possible.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }

        let new_size = (new_width as usize) * (new_height as usize);
        let mut new_cells = vec![Cell::EMPTY; new_size];

        let copy_width = self.width.min(new_width) as usize;
        let copy_height = self.height.min(new_height) as usize;

        for y in 0..copy_height {
            let old_start = y * (self.width as usize);
            let new_start = y * (new_width as usize);
            new_cells[new_start..new_start + copy_width]
                .copy_from_slice(&self.cells[old_start..old_start + copy_width]);
        }

        self.cells = new_cells;
        self.width = new_width;
        self.height = new_height;
    }

    /// Copy content from another grid of the same dimensions.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.width, other.width);
        debug_assert_eq!(self.height, other.height);
        self.cells.copy_from_slice(&other.cells);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// The glyphs of one row as a string (handy for assertions and dumps).
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(y as usize)
            .map(|row| row.iter().map(Cell::glyph).collect())
            .unwrap_or_default()
    }
}

impl Surface for Grid {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn clear(&mut self, style: Style) {
        self.fill(style);
    }

    fn set_cell(&mut self, x: u16, y: u16, glyph: char, style: Style) {
        self.set(x, y, Cell::new(glyph, style));
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        Grid::resize(self, width, height);
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
