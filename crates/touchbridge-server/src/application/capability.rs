//! The device capability consumed by the server.
//!
//! Everything that actually touches the device (injecting events, reading
//! the clipboard, asking whether the screen is on) goes through
//! [`CapabilityBackend`].  The application layer never talks to the device
//! directly, which keeps the dispatcher and the injection engine testable
//! with in-memory backends.

use thiserror::Error;
use touchbridge_core::{KeyCode, KeyEvent, PointerEvent};

use crate::domain::config::DisplayId;

/// Error type for capability backend operations.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The device refused or failed to inject an event.
    #[error("event injection failed: {0}")]
    Injection(String),
    /// The device refused the new clipboard contents.
    #[error("clipboard update failed: {0}")]
    Clipboard(String),
}

/// Device operations the server needs.
///
/// Implementations must be usable from the session task, hence `Send + Sync`.
/// Each call is synchronous: an injection returns once the device accepted
/// (or rejected) the event.
pub trait CapabilityBackend: Send + Sync {
    /// Whether `display` accepts injected input events.
    fn is_input_capable(&self, display: DisplayId) -> bool;

    /// Whether the screen showing `display` is on.
    fn is_screen_on(&self, display: DisplayId) -> bool;

    /// Presses and releases `code` as one key stroke.
    fn press_release_key(&self, code: KeyCode, display: DisplayId)
        -> Result<(), CapabilityError>;

    /// Injects a single key event.
    fn inject_key_event(&self, event: &KeyEvent, display: DisplayId)
        -> Result<(), CapabilityError>;

    /// Injects a single pointer event.
    fn inject_pointer_event(
        &self,
        event: &PointerEvent,
        display: DisplayId,
    ) -> Result<(), CapabilityError>;

    /// Resolves the key events that type `chars` on the device keyboard.
    ///
    /// `chars` is one character, or a dead-key accent followed by its base
    /// character.  Returns `None` if the keyboard cannot type the sequence.
    fn key_events_for(&self, chars: &[char]) -> Option<Vec<KeyEvent>>;

    /// Current clipboard text, or `None` if unavailable.
    fn clipboard_text(&self) -> Option<String>;

    /// Replaces the clipboard text.
    fn set_clipboard_text(&self, text: &str) -> Result<(), CapabilityError>;
}
