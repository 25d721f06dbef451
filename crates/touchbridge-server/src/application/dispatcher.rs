//! Dispatcher: one request line in, one response out.
//!
//! # Processing a line (for beginners)
//!
//! ```text
//! line ──► parse_line ──► gate check ──► verb handler ──► Response
//!            │                │
//!            │                └─ input verb on a display without input
//!            │                   support: ERR INPUT_NOT_SUPPORTED
//!            └─ empty line: ERR EMPTY_COMMAND
//! ```
//!
//! `PING`, `CLIP_GET` and `CLIP_SET` bypass the gate; every other verb,
//! including unknown ones, is rejected with `INPUT_NOT_SUPPORTED` before its
//! arguments are looked at when the display cannot take input.
//!
//! Whether the display takes input is asked once, when the dispatcher is
//! created, and cached for the whole session.
//!
//! Verb routing is an exhaustive `match` on [`Verb`], so adding a verb to the
//! protocol without handling it here is a compile error.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use touchbridge_core::protocol::args::{KeycodeArgs, SwipeArgs, TapArgs};
use touchbridge_core::protocol::decode_text;
use touchbridge_core::{parse_line, Command, ErrorCode, KeyCode, Response, Verb};

use crate::application::capability::CapabilityBackend;
use crate::application::clipboard::ClipboardBridge;
use crate::application::inject_input::{GestureError, InputInjector};
use crate::application::inject_text::TextInjector;
use crate::domain::config::DisplayId;

/// Time the display gets to wake up after the power key, before the first command.
pub const POWER_ON_SETTLE: Duration = Duration::from_millis(500);

/// Returned when shutdown interrupts a command; no response is sent for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("command interrupted by shutdown")]
pub struct Cancelled;

/// Routes parsed commands to their handlers for one session.
pub struct Dispatcher {
    backend: Arc<dyn CapabilityBackend>,
    display: DisplayId,
    supports_input: bool,
    input: InputInjector,
    text: TextInjector,
    clipboard: ClipboardBridge,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Creates a dispatcher for `display`, sampling its input capability once.
    pub fn new(
        backend: Arc<dyn CapabilityBackend>,
        display: DisplayId,
        cancel: CancellationToken,
    ) -> Self {
        let supports_input = backend.is_input_capable(display);
        if !supports_input {
            let display_id = display.0;
            warn!(display_id, "display does not support input events; input commands will be rejected");
        }

        Self {
            input: InputInjector::new(Arc::clone(&backend), display, cancel.clone()),
            text: TextInjector::new(Arc::clone(&backend), display),
            clipboard: ClipboardBridge::new(Arc::clone(&backend)),
            backend,
            display,
            supports_input,
            cancel,
        }
    }

    /// Whether input verbs are accepted in this session.
    pub fn supports_input(&self) -> bool {
        self.supports_input
    }

    /// Wakes the primary display if `enabled` and the screen is off.
    ///
    /// Presses the power key, then waits [`POWER_ON_SETTLE`].  Returns whether
    /// the key was pressed.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if shutdown was requested during the settle wait.
    pub async fn power_on_if_needed(&self, enabled: bool) -> Result<bool, Cancelled> {
        if !enabled || !self.display.is_primary() || self.backend.is_screen_on(self.display) {
            return Ok(false);
        }

        info!("screen is off, pressing power");
        if let Err(e) = self.input.press_release(KeyCode::POWER) {
            warn!("could not press power: {e}");
            return Ok(false);
        }

        tokio::select! {
            _ = self.cancel.cancelled() => Err(Cancelled),
            _ = tokio::time::sleep(POWER_ON_SETTLE) => Ok(true),
        }
    }

    /// Processes one request line.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if shutdown interrupted the command midway.
    /// Every other outcome, including failures, is a [`Response`].
    pub async fn dispatch(&mut self, line: &str) -> Result<Response, Cancelled> {
        let Command { verb, raw_args } = match parse_line(line) {
            Ok(command) => command,
            Err(code) => return Ok(code.into()),
        };

        if verb.requires_input() && !self.supports_input {
            debug!(verb = verb.as_str(), "rejected: input not supported");
            return Ok(ErrorCode::InputNotSupported.into());
        }

        let response = match verb {
            Verb::Ping => Response::ok_with("PONG"),
            Verb::ClipGet => self
                .clipboard
                .get()
                .map_or_else(Response::from, Response::ok_with),
            Verb::ClipSet => self.clipboard.set(&raw_args).into(),
            Verb::Tap => self.tap(&raw_args)?,
            Verb::Swipe | Verb::Drag => self.swipe(&raw_args).await?,
            Verb::Keycode => self.keycode(&raw_args)?,
            Verb::Text => self.text(&raw_args),
            Verb::Unknown(keyword) => {
                debug!(%keyword, "unknown verb");
                ErrorCode::UnknownCommand.into()
            }
        };
        Ok(response)
    }

    fn tap(&mut self, raw_args: &str) -> Result<Response, Cancelled> {
        match TapArgs::parse(raw_args) {
            Ok(args) => gesture_response(self.input.tap(&args)),
            Err(code) => Ok(code.into()),
        }
    }

    async fn swipe(&mut self, raw_args: &str) -> Result<Response, Cancelled> {
        match SwipeArgs::parse(raw_args) {
            Ok(args) => gesture_response(self.input.swipe(&args).await),
            Err(code) => Ok(code.into()),
        }
    }

    fn keycode(&self, raw_args: &str) -> Result<Response, Cancelled> {
        match KeycodeArgs::parse(raw_args) {
            Ok(args) => gesture_response(self.input.keycode(&args)),
            Err(code) => Ok(code.into()),
        }
    }

    fn text(&self, raw_args: &str) -> Response {
        let text = match decode_text(raw_args) {
            Ok(text) => text,
            Err(code) => return code.into(),
        };
        if text.is_empty() {
            return Response::ok();
        }

        let report = self.text.inject(&text);
        if report.injected == 0 {
            return ErrorCode::TextNotSupported.into();
        }
        if report.skipped > 0 {
            info!(
                injected = report.injected,
                skipped = report.skipped,
                total = report.total(),
                "text partially injected"
            );
        }
        Response::ok()
    }
}

/// Maps an injection result to the response, or to [`Cancelled`].
fn gesture_response(result: Result<(), GestureError>) -> Result<Response, Cancelled> {
    match result {
        Ok(()) => Ok(Response::ok()),
        Err(GestureError::Cancelled) => Err(Cancelled),
        Err(e) => {
            warn!("injection failed: {e}");
            Ok(ErrorCode::InjectFailed.into())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
