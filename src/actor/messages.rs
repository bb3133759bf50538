//! Message types for actor communication.
//!
//! [`InputEvent`] is what the input thread sends to the scheduler;
//! [`KeyPress`] is what the scheduler hands to the editor model.

use crossterm::event::KeyEvent;
use std::fmt;

/// Abstract key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character, including `'\t'` and `' '`.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Delete key.
    Delete,
    /// Escape key.
    Escape,
}

/// A key plus the control modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// Which key.
    pub key: Key,
    /// Control held.
    pub ctrl: bool,
}

impl KeyPress {
    /// An unmodified key.
    pub const fn new(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    /// Control plus a character.
    pub const fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
        }
    }

    /// The reserved quit chord, control-Q.
    pub const fn is_quit(&self) -> bool {
        self.ctrl && matches!(self.key, Key::Char('q'))
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        match self.key {
            Key::Char('\t') => f.write_str("tab"),
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => f.write_str("enter"),
            Key::Backspace => f.write_str("backspace"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Delete => f.write_str("delete"),
            Key::Escape => f.write_str("escape"),
        }
    }
}

/// Events from the input thread.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// A raw key press, translated by the scheduler.
    Key(KeyEvent),

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}
