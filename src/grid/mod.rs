//! Grid module: the in-memory cell matrix and its diff engine.
//!
//! - [`Cell`]: one glyph plus palette-indexed colors, 8 bytes
//! - [`Grid`]: row-major cell storage, also the headless [`Surface`](crate::terminal::Surface)
//! - [`Modifiers`]: underline / reverse bitflags
//! - [`diff`]: minimal ANSI sequences between two grids

mod cell;
#[allow(clippy::module_inception)]
mod grid;
pub mod diff;

pub use cell::{cell_glyph, Cell, Modifiers, Style};
pub use grid::Grid;
