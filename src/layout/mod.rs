//! Layout module: screen rectangles and viewports.
//!
//! - [`Rect`]: a rectangle of terminal cells
//! - [`Region`]: a range of buffer offsets (selections, visible text)
//! - [`Layout`]: per-view viewport kept in a [`LayoutRegistry`]

mod rect;
mod region;
mod viewport;

pub use rect::Rect;
pub use region::Region;
pub use viewport::{Layout, LayoutRegistry};
