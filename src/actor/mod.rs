//! Actor Model: the input thread and the scheduler loop.
//!
//! - **Input Actor**: polls terminal events, forwards them over a channel
//! - **Scheduler**: owns all rendering state, merges input with the blink timer
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐   KeyPress   ┌─────────────┐
//! │ Input Thread │ ─────────────────▶  │  Scheduler   │ ──────────▶  │ EditorModel │
//! └──────────────┘                     │              │ ◀──────────  │             │
//!                                      │              │  ModelEvent  └─────────────┘
//! ┌──────────────┐     blink tick      │              │
//! │ Blink Timer  │ ─────────────────▶  │              │ ──▶ Surface
//! └──────────────┘                     └──────────────┘
//! ```

mod input;
mod messages;
mod scheduler;

pub use input::{to_key_event, translate, InputActor};
pub use messages::{InputEvent, Key, KeyPress};
pub use scheduler::{Flow, Scheduler};
