//! # Termview
//!
//! The presentation core of a terminal text editor.
//!
//! Termview turns an editor's state (buffers, selections, per-character syntax
//! scopes and a color theme) into a grid of styled glyphs, and keeps track of
//! which lines of each buffer are on screen.
//!
//! ## Core Concepts
//!
//! - **Viewports**: each view shows a window of whole lines that scrolls the
//!   minimum distance needed to keep the caret visible
//! - **Scope cascade**: `"source.go entity.name.function"` resolves through
//!   progressively less specific theme keys
//! - **Quantized colors**: theme RGB maps once, at load time, to a 256-entry
//!   palette or to the 8 base colors
//! - **Throttled redraw**: one thread merges input and the caret blink timer
//!   and repaints at most every 15ms unless a key press forces it
//!
//! ## Example
//!
//! ```rust
//! use termview::compositor::RenderContext;
//! use termview::config::FrontendConfig;
//! use termview::model::memory::MemoryModel;
//! use termview::style::{ColorTable, StyleResolver};
//! use termview::{Frontend, Grid};
//!
//! let mut model = MemoryModel::new();
//! model.new_view("fn main() {}\n");
//!
//! let ctx = RenderContext::new(StyleResolver::new(ColorTable::default()));
//! let mut frontend = Frontend::new(FrontendConfig::default(), ctx, (40, 10));
//! let mut grid = Grid::new(40, 10);
//! frontend.render_frame(&mut grid, &model).unwrap();
//! assert!(grid.row_text(0).starts_with("fn main() {}"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod compositor;
pub mod config;
pub mod error;
pub mod frontend;
pub mod grid;
pub mod layout;
pub mod model;
pub mod style;
pub mod terminal;

// Re-exports for convenience
pub use actor::{InputEvent, Key, KeyPress, Scheduler};
pub use error::{Error, Result};
pub use frontend::Frontend;
pub use grid::{Cell, Grid, Modifiers, Style};
pub use layout::{Layout, Rect, Region};
pub use terminal::{CrosstermTerminal, Surface};
