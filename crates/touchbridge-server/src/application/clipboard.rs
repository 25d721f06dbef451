//! Clipboard Bridge.
//!
//! Clipboard text can contain newlines, so it always crosses the line
//! protocol as base64 (standard alphabet, no line wrapping).

use std::sync::Arc;

use tracing::warn;
use touchbridge_core::protocol::{decode_text, encode_text};
use touchbridge_core::ErrorCode;

use crate::application::capability::CapabilityBackend;

/// Reads and writes the device clipboard on behalf of the dispatcher.
pub struct ClipboardBridge {
    backend: Arc<dyn CapabilityBackend>,
}

impl ClipboardBridge {
    pub fn new(backend: Arc<dyn CapabilityBackend>) -> Self {
        Self { backend }
    }

    /// Returns the clipboard text as base64.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::ClipboardUnavailable`] if the backend has no
    /// clipboard text to give.
    pub fn get(&self) -> Result<String, ErrorCode> {
        self.backend
            .clipboard_text()
            .map(|text| encode_text(&text))
            .ok_or(ErrorCode::ClipboardUnavailable)
    }

    /// Decodes `payload` and stores it as the clipboard text.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::InvalidBase64`] if `payload` is not base64.
    /// - [`ErrorCode::ClipboardSetFailed`] if the backend refused the text.
    pub fn set(&self, payload: &str) -> Result<(), ErrorCode> {
        let text = decode_text(payload)?;
        self.backend.set_clipboard_text(&text).map_err(|e| {
            warn!("clipboard update failed: {e}");
            ErrorCode::ClipboardSetFailed
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
