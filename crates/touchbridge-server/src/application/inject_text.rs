//! Text Injection Subsystem.
//!
//! Types a decoded string one character at a time.  Each character is first
//! run through [`decompose`]: `é` becomes the dead acute accent followed by
//! `e`, because keyboards type accents that way.  The backend then resolves
//! the (possibly decomposed) characters to key events, which are injected in
//! order.
//!
//! A character the backend cannot resolve or inject is skipped with a
//! warning; it never aborts the rest of the text.

use std::slice;
use std::sync::Arc;

use tracing::warn;
use touchbridge_core::keymap::decompose;

use crate::application::capability::CapabilityBackend;
use crate::domain::config::DisplayId;

/// Outcome of typing one string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextReport {
    /// Characters whose every key event was injected.
    pub injected: usize,
    /// Characters that could not be typed.
    pub skipped: usize,
}

impl TextReport {
    /// Total number of characters processed.
    pub fn total(&self) -> usize {
        self.injected + self.skipped
    }
}

/// Types text through the capability backend.
pub struct TextInjector {
    backend: Arc<dyn CapabilityBackend>,
    display: DisplayId,
}

impl TextInjector {
    pub fn new(backend: Arc<dyn CapabilityBackend>, display: DisplayId) -> Self {
        Self { backend, display }
    }

    /// Types `text`, skipping characters that cannot be injected.
    pub fn inject(&self, text: &str) -> TextReport {
        let mut report = TextReport::default();
        for c in text.chars() {
            if self.inject_char(c) {
                report.injected += 1;
            } else {
                warn!("could not inject char U+{:04X}", u32::from(c));
                report.skipped += 1;
            }
        }
        report
    }

    fn inject_char(&self, c: char) -> bool {
        let decomposed;
        let chars: &[char] = match decompose(c) {
            Some(pair) => {
                decomposed = pair;
                &decomposed
            }
            None => slice::from_ref(&c),
        };

        let Some(events) = self.backend.key_events_for(chars) else {
            return false;
        };
        events
            .iter()
            .all(|event| self.backend.inject_key_event(event, self.display).is_ok())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
