//! Response lines and the protocol error taxonomy.
//!
//! Every request line is answered by exactly one response line:
//!
//! ```text
//! OK              success, no payload
//! OK PONG         success with a payload
//! ERR INJECT_FAILED
//! ```
//!
//! The error codes are part of the wire contract and are rendered verbatim
//! by [`ErrorCode`]'s `Display` implementation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Every error code the server can answer with.
///
/// The `Display` output of each variant is the exact token written after
/// `ERR ` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorCode {
    /// The line was empty or contained only whitespace.
    #[error("EMPTY_COMMAND")]
    EmptyCommand,
    /// The verb is not one the dispatcher knows.
    #[error("UNKNOWN_COMMAND")]
    UnknownCommand,
    /// Wrong number of arguments, or a field with no more specific code.
    #[error("INVALID_ARGS")]
    InvalidArgs,
    /// A coordinate was not an integer.
    #[error("INVALID_COORDS")]
    InvalidCoords,
    /// The tap pressure was not a number.
    #[error("INVALID_PRESSURE")]
    InvalidPressure,
    /// The tap button state was not an integer.
    #[error("INVALID_BUTTONS")]
    InvalidButtons,
    /// The key code was not an integer.
    #[error("INVALID_KEYCODE")]
    InvalidKeycode,
    /// A payload was not valid base64.
    #[error("INVALID_BASE64")]
    InvalidBase64,
    /// The target display cannot receive injected input.
    #[error("INPUT_NOT_SUPPORTED")]
    InputNotSupported,
    /// The backend refused or failed to inject an event.
    #[error("INJECT_FAILED")]
    InjectFailed,
    /// None of the characters of a non-empty text could be typed.
    #[error("TEXT_NOT_SUPPORTED")]
    TextNotSupported,
    /// The backend could not provide the clipboard contents.
    #[error("CLIPBOARD_UNAVAILABLE")]
    ClipboardUnavailable,
    /// The backend refused the new clipboard contents.
    #[error("CLIPBOARD_SET_FAILED")]
    ClipboardSetFailed,
}

impl ErrorCode {
    /// All codes, in declaration order.
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::EmptyCommand,
        ErrorCode::UnknownCommand,
        ErrorCode::InvalidArgs,
        ErrorCode::InvalidCoords,
        ErrorCode::InvalidPressure,
        ErrorCode::InvalidButtons,
        ErrorCode::InvalidKeycode,
        ErrorCode::InvalidBase64,
        ErrorCode::InputNotSupported,
        ErrorCode::InjectFailed,
        ErrorCode::TextNotSupported,
        ErrorCode::ClipboardUnavailable,
        ErrorCode::ClipboardSetFailed,
    ];
}

impl FromStr for ErrorCode {
    type Err = ResponseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.to_string() == s)
            .ok_or_else(|| ResponseParseError::UnknownErrorCode(s.to_string()))
    }
}

/// Errors returned by [`Response::parse_line`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseParseError {
    /// The line started with neither `OK` nor `ERR`.
    #[error("response must start with OK or ERR: {0:?}")]
    MissingStatus(String),
    /// The line was `ERR` followed by a code this crate does not know.
    #[error("unknown error code: {0}")]
    UnknownErrorCode(String),
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Success, optionally carrying a payload (e.g. `PONG` or base64 text).
    Ok(Option<String>),
    /// Failure with a specific code.
    Err(ErrorCode),
}

impl Response {
    /// Success without payload.
    pub fn ok() -> Self {
        Response::Ok(None)
    }

    /// Success carrying `payload`.  An empty payload renders as bare `OK`.
    pub fn ok_with(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        if payload.is_empty() {
            Response::Ok(None)
        } else {
            Response::Ok(Some(payload))
        }
    }

    /// Returns `true` for `OK` responses.
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }

    /// Parses a response line as written by the server.
    ///
    /// Used by desktop-side clients and by tests that drive a session over a
    /// byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseParseError`] if the line is not a valid response.
    pub fn parse_line(line: &str) -> Result<Self, ResponseParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "OK" {
            return Ok(Response::Ok(None));
        }
        if let Some(payload) = line.strip_prefix("OK ") {
            return Ok(Response::ok_with(payload));
        }
        if let Some(code) = line.strip_prefix("ERR ") {
            return code.parse().map(Response::Err);
        }
        Err(ResponseParseError::MissingStatus(line.to_string()))
    }
}

impl From<ErrorCode> for Response {
    fn from(code: ErrorCode) -> Self {
        Response::Err(code)
    }
}

impl<E> From<Result<(), E>> for Response
where
    E: Into<ErrorCode>,
{
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Response::ok(),
            Err(e) => Response::Err(e.into()),
        }
    }
}

impl fmt::Display for Response {
    /// Renders the wire line without the trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok(None) => f.write_str("OK"),
            Response::Ok(Some(payload)) => write!(f, "OK {payload}"),
            Response::Err(code) => write!(f, "ERR {code}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
