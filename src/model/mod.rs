//! Editor model interface.
//!
//! The presentation core never owns text. It reads buffers, selections and
//! scope names through these traits and receives change notifications as
//! [`ModelEvent`] messages drained once per scheduler iteration.
//!
//! [`memory`] is a small in-process implementation used by the binary and the
//! tests.

pub mod memory;
mod settings;

pub use settings::{blink_phase, CaretStyle, ViewSettings, DEFAULT_BLINK_PHASE};

use crate::actor::KeyPress;
use crate::layout::Region;
use std::fmt;

/// Stable identifier of a view.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dynamically typed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// String.
    Str(String),
}

impl SettingValue {
    /// Short type name for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

/// Read-only view of a text buffer.
///
/// Offsets are character offsets. Lines are separated by `'\n'`; a buffer
/// always has at least one line.
pub trait TextBuffer {
    /// Number of characters.
    fn len(&self) -> usize;

    /// Whether the buffer has no characters.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of `(line, col)`.
    ///
    /// A line past the last one maps to `len()`; a column past the end of its
    /// line maps to the line end.
    fn text_point(&self, line: usize, col: usize) -> usize;

    /// Line and column of `offset` (clamped to `len()`).
    fn row_col(&self, offset: usize) -> (usize, usize);

    /// Monotonic counter bumped on every mutation.
    fn change_count(&self) -> u64;

    /// Text within a region.
    fn substr(&self, region: Region) -> String;

    /// Number of lines.
    fn line_count(&self) -> usize;
}

/// A view onto a buffer: selection, scopes and settings.
pub trait View {
    /// Stable identifier.
    fn id(&self) -> ViewId;

    /// The buffer shown.
    fn buffer(&self) -> &dyn TextBuffer;

    /// Disjoint regions in ascending order.
    fn selection(&self) -> &[Region];

    /// Syntax scope of the character at `offset`.
    fn scope_name(&self, offset: usize) -> &str;

    /// Per-view setting lookup.
    fn setting(&self, key: &str) -> Option<SettingValue>;
}

/// Notifications from the model to the presentation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A view's buffer changed.
    BufferChanged(ViewId),
    /// A view went away; its layout should be dropped.
    ViewClosed(ViewId),
    /// The model wants a region of a view on screen.
    Show {
        /// Target view.
        view: ViewId,
        /// Region to reveal.
        region: Region,
    },
}

/// The editor behind the frontend.
pub trait EditorModel {
    /// Live views in display order.
    fn view_ids(&self) -> Vec<ViewId>;

    /// Look up a view.
    fn view(&self, id: ViewId) -> Option<&dyn View>;

    /// Feed one translated key press.
    fn handle_input(&mut self, key: KeyPress);

    /// Global setting lookup.
    fn setting(&self, key: &str) -> Option<SettingValue>;

    /// Drain pending notifications.
    fn take_events(&mut self) -> Vec<ModelEvent>;
}
