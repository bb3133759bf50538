//! Input Actor: Dedicated thread for polling terminal events.
//!
//! The thread blocks on crossterm's event poll and forwards key presses and
//! resizes to the scheduler over a channel. Translation from raw key events to
//! [`KeyPress`] values happens on the scheduler side with [`translate`].

use super::messages::{InputEvent, Key, KeyPress};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long the thread waits for an event before
    /// checking the shutdown flag again.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("termview-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("input thread panicked");
            }
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        tracing::debug!(?poll_timeout, "input thread started");
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input_event) = convert_event(event) {
                            if sender.send(input_event).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = sender.send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
        tracing::debug!("input thread stopped");
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Keep key presses and resizes; mouse, focus and paste are not used.
fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(InputEvent::Key(key)),
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        _ => None,
    }
}

/// Translate a raw key event into an editor key press.
///
/// Control with a letter gives the lowercase letter with the control flag;
/// control with 2, 4, 5, 6 or 7 keeps the digit (control-space and NUL are
/// control-2). Unmapped keys give `None`.
pub fn translate(event: KeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let press = match event.code {
        KeyCode::Char(c) if ctrl => match c {
            c if c.is_ascii_alphabetic() => KeyPress::ctrl(c.to_ascii_lowercase()),
            '2' | '4' | '5' | '6' | '7' => KeyPress::ctrl(c),
            ' ' | '@' => KeyPress::ctrl('2'),
            _ => return None,
        },
        KeyCode::Null => KeyPress::ctrl('2'),
        KeyCode::Char(c) => KeyPress::new(Key::Char(c)),
        KeyCode::Tab => KeyPress::new(Key::Char('\t')),
        KeyCode::Enter => KeyPress::new(Key::Enter),
        KeyCode::Backspace => KeyPress::new(Key::Backspace),
        KeyCode::Up => KeyPress::new(Key::Up),
        KeyCode::Down => KeyPress::new(Key::Down),
        KeyCode::Left => KeyPress::new(Key::Left),
        KeyCode::Right => KeyPress::new(Key::Right),
        KeyCode::Delete => KeyPress::new(Key::Delete),
        KeyCode::Esc => KeyPress::new(Key::Escape),
        _ => return None,
    };
    Some(press)
}

/// The raw key event that [`translate`]s back to `press`.
pub fn to_key_event(press: KeyPress) -> KeyEvent {
    let code = match press.key {
        Key::Char('2') if press.ctrl => return KeyEvent::new(KeyCode::Null, KeyModifiers::NONE),
        Key::Char('\t') if !press.ctrl => KeyCode::Tab,
        Key::Char(c) => KeyCode::Char(c),
        Key::Enter => KeyCode::Enter,
        Key::Backspace => KeyCode::Backspace,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::Delete => KeyCode::Delete,
        Key::Escape => KeyCode::Esc,
    };
    let modifiers = if press.ctrl {
        KeyModifiers::CONTROL
    } else {
        KeyModifiers::NONE
    };
    KeyEvent::new(code, modifiers)
}
