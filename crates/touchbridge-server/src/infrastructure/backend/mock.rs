//! In-memory capability backend.
//!
//! # Why a mock backend?
//!
//! A real backend needs a device: it injects events into the display and
//! touches the system clipboard, none of which a test can observe.
//!
//! `MockCapabilityBackend` records every injected event in a
//! `Mutex<Vec<...>>` so assertions can check exactly what was injected and in
//! what order.  Its clipboard is a pass-through store: whatever `set` writes,
//! `get` returns.  Characters are resolved with the reference
//! [`VirtualKeyboard`], so anything outside its layout (e.g. CJK) is
//! untypeable, which is how tests exercise skipped characters.
//!
//! # Usage in tests
//!
//! ```ignore
//! let backend = Arc::new(MockCapabilityBackend::new());
//! let mut dispatcher = Dispatcher::new(Arc::clone(&backend) as _, DisplayId::PRIMARY, cancel);
//!
//! dispatcher.dispatch("TAP 10 20").await?;
//!
//! assert_eq!(backend.pointer_events().len(), 2);
//! ```
//!
//! # Failure injection
//!
//! `with_fail_after(n)` lets the first `n` injections succeed and fails every
//! later one; `with_fail_after(0)` fails all of them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use touchbridge_core::keymap::VirtualKeyboard;
use touchbridge_core::{KeyCode, KeyEvent, PointerEvent};

use crate::application::capability::{CapabilityBackend, CapabilityError};
use crate::domain::config::DisplayId;

/// A backend that records all calls without touching a device.
pub struct MockCapabilityBackend {
    /// Every pointer event passed to `inject_pointer_event`, in order.
    pub pointer_events: Mutex<Vec<PointerEvent>>,
    /// Every key event passed to `inject_key_event`, in order.
    pub key_events: Mutex<Vec<KeyEvent>>,
    /// Every key code passed to `press_release_key`, in order.
    pub press_releases: Mutex<Vec<KeyCode>>,
    /// Clipboard contents.  `None` makes the clipboard unavailable.
    pub clipboard: Mutex<Option<String>>,
    /// Answer of `is_input_capable`.
    pub input_capable: bool,
    /// Answer of `is_screen_on`.
    pub screen_on: bool,
    /// When `true`, `set_clipboard_text` fails.
    pub reject_clipboard: bool,
    /// Number of injections that succeed before all later ones fail.
    pub fail_after: Option<usize>,
    /// When `false`, injected events are logged but not kept.
    pub record: bool,
    injections: AtomicUsize,
    keyboard: VirtualKeyboard,
}

impl Default for MockCapabilityBackend {
    fn default() -> Self {
        Self {
            pointer_events: Mutex::new(Vec::new()),
            key_events: Mutex::new(Vec::new()),
            press_releases: Mutex::new(Vec::new()),
            clipboard: Mutex::new(Some(String::new())),
            input_capable: true,
            screen_on: true,
            reject_clipboard: false,
            fail_after: None,
            record: true,
            injections: AtomicUsize::new(0),
            keyboard: VirtualKeyboard::new(),
        }
    }
}

impl MockCapabilityBackend {
    /// A capable, screen-on backend with an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_capable(mut self, capable: bool) -> Self {
        self.input_capable = capable;
        self
    }

    pub fn with_screen_on(mut self, on: bool) -> Self {
        self.screen_on = on;
        self
    }

    pub fn with_fail_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    pub fn with_reject_clipboard(mut self, reject: bool) -> Self {
        self.reject_clipboard = reject;
        self
    }

    /// Stops keeping injected events, so long-running sessions do not
    /// accumulate them.  Counting and failure injection still apply.
    pub fn without_recording(mut self) -> Self {
        self.record = false;
        self
    }

    /// Makes `clipboard_text` return `None`.
    pub fn with_clipboard_unavailable(self) -> Self {
        *lock(&self.clipboard) = None;
        self
    }

    /// Snapshot of the recorded pointer events.
    pub fn pointer_events(&self) -> Vec<PointerEvent> {
        lock(&self.pointer_events).clone()
    }

    /// Snapshot of the recorded key events.
    pub fn key_events(&self) -> Vec<KeyEvent> {
        lock(&self.key_events).clone()
    }

    /// Snapshot of the recorded press-release key codes.
    pub fn press_releases(&self) -> Vec<KeyCode> {
        lock(&self.press_releases).clone()
    }

    /// Number of injection calls made so far, including failed ones.
    pub fn injection_attempts(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    /// Counts an injection attempt and decides whether it fails.
    fn admit(&self) -> Result<(), CapabilityError> {
        let attempt = self.injections.fetch_add(1, Ordering::SeqCst);
        match self.fail_after {
            Some(limit) if attempt >= limit => {
                Err(CapabilityError::Injection("mock failure".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Locks `mutex`, ignoring poisoning from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CapabilityBackend for MockCapabilityBackend {
    fn is_input_capable(&self, _display: DisplayId) -> bool {
        self.input_capable
    }

    fn is_screen_on(&self, _display: DisplayId) -> bool {
        self.screen_on
    }

    fn press_release_key(&self, code: KeyCode, display: DisplayId) -> Result<(), CapabilityError> {
        self.admit()?;
        let display_id = display.0;
        debug!(%code, display_id, "mock press-release");
        if self.record {
            lock(&self.press_releases).push(code);
        }
        Ok(())
    }

    fn inject_key_event(&self, event: &KeyEvent, display: DisplayId) -> Result<(), CapabilityError> {
        self.admit()?;
        let display_id = display.0;
        debug!(code = %event.code, action = ?event.action, display_id, "mock key event");
        if self.record {
            lock(&self.key_events).push(*event);
        }
        Ok(())
    }

    fn inject_pointer_event(
        &self,
        event: &PointerEvent,
        display: DisplayId,
    ) -> Result<(), CapabilityError> {
        self.admit()?;
        let display_id = display.0;
        debug!(
            action = ?event.action,
            x = event.x(),
            y = event.y(),
            event_time = event.event_time,
            display_id,
            "mock pointer event"
        );
        if self.record {
            lock(&self.pointer_events).push(*event);
        }
        Ok(())
    }

    fn key_events_for(&self, chars: &[char]) -> Option<Vec<KeyEvent>> {
        self.keyboard.events_for(chars)
    }

    fn clipboard_text(&self) -> Option<String> {
        lock(&self.clipboard).clone()
    }

    fn set_clipboard_text(&self, text: &str) -> Result<(), CapabilityError> {
        if self.reject_clipboard {
            return Err(CapabilityError::Clipboard("mock clipboard is read-only".into()));
        }
        *lock(&self.clipboard) = Some(text.to_string());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
