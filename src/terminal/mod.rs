//! Terminal module: the cell surface the compositor draws on.
//!
//! - [`Surface`]: the write primitive (`set_cell` + `flush`)
//! - [`CrosstermTerminal`]: a real terminal, double-buffered and diffed
//! - [`OutputBuffer`]: escape sequence accumulator flushed in one write
//!
//! [`Grid`](crate::grid::Grid) also implements [`Surface`] for headless use.

mod backend;
mod output;

pub use backend::CrosstermTerminal;
pub use output::OutputBuffer;

use crate::grid::Style;
use std::io;

/// A fixed-size matrix of styled glyphs.
pub trait Surface {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    /// Fill every cell with a blank of `style`.
    fn clear(&mut self, style: Style);

    /// Write one cell. Out-of-range coordinates are ignored.
    fn set_cell(&mut self, x: u16, y: u16, glyph: char, style: Style);

    /// Make everything written since the last flush visible.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn flush(&mut self) -> io::Result<()>;

    /// Adopt a new size.
    fn resize(&mut self, width: u16, height: u16);
}
