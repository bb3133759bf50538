//! Style module: from theme colors to per-character terminal colors.
//!
//! - [`Theme`]: ordered `(scope, fg, bg)` entries, loaded from TOML
//! - [`Palette`]: quantizes theme RGB into terminal palette indices
//! - [`ColorTable`]: flat scope table built once at startup
//! - [`StyleResolver`]: cascading lookup with a per-pass cache

mod color;
mod palette;
mod resolver;
mod theme;

pub use color::{ColorDepth, ColorIndex, Rgb};
pub use palette::{Palette, BASE_COLORS, MAX_PALETTE_LEN};
pub use resolver::{ColorPair, ColorTable, StyleResolver};
pub use theme::{Theme, ThemeEntry};
