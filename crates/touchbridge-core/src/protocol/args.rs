//! Typed argument parsing for the input verbs.
//!
//! Each parser consumes a whitespace-separated argument tail and returns
//! either a fully typed structure or the most specific [`ErrorCode`] for the
//! first problem found.  Trailing tokens are always rejected with
//! [`ErrorCode::InvalidArgs`] (strict arity).

use std::str::{FromStr, SplitWhitespace};

use crate::domain::key::KeyCode;
use crate::protocol::response::ErrorCode;

/// Default tap pressure when the argument is omitted.
pub const DEFAULT_PRESSURE: f32 = 1.0;

/// Default tap button state when the argument is omitted.
pub const DEFAULT_BUTTONS: i32 = 0;

/// Arguments of `TAP x y [pressure] [buttons]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapArgs {
    pub x: i32,
    pub y: i32,
    pub pressure: f32,
    pub buttons: i32,
}

/// Arguments of `SWIPE|DRAG x1 y1 x2 y2 durationMs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeArgs {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub duration_ms: i32,
}

/// What a `KEYCODE` command should inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeycodeAction {
    /// A single key-down event.
    Down,
    /// A single key-up event.
    Up,
    /// Press and release (the default).
    Both,
    /// An action word the server does not know.
    ///
    /// Kept rather than rejected at parse time: an unknown action is reported
    /// as an injection failure by the dispatcher.
    Unrecognized(String),
}

impl KeycodeAction {
    /// Parses an action word case-insensitively.
    pub fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "down" => KeycodeAction::Down,
            "up" => KeycodeAction::Up,
            "both" => KeycodeAction::Both,
            _ => KeycodeAction::Unrecognized(word.to_string()),
        }
    }
}

/// Arguments of `KEYCODE code [down|up|both]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeycodeArgs {
    pub code: KeyCode,
    pub action: KeycodeAction,
}

/// Parses one token, mapping any failure to `code`.
fn field<T: FromStr>(token: &str, code: ErrorCode) -> Result<T, ErrorCode> {
    token.parse().map_err(|_| code)
}

/// Fails with [`ErrorCode::InvalidArgs`] if any token is left.
fn expect_end(tokens: &mut SplitWhitespace<'_>) -> Result<(), ErrorCode> {
    match tokens.next() {
        Some(_) => Err(ErrorCode::InvalidArgs),
        None => Ok(()),
    }
}

impl TapArgs {
    /// Parses `x y [pressure] [buttons]`.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::InvalidArgs`] with fewer than two tokens or trailing tokens.
    /// - [`ErrorCode::InvalidCoords`] if `x` or `y` is not an integer.
    /// - [`ErrorCode::InvalidPressure`] if `pressure` is not a number.
    /// - [`ErrorCode::InvalidButtons`] if `buttons` is not an integer.
    pub fn parse(raw: &str) -> Result<Self, ErrorCode> {
        if raw.split_whitespace().count() < 2 {
            return Err(ErrorCode::InvalidArgs);
        }

        let mut tokens = raw.split_whitespace();
        let x_token = tokens.next().ok_or(ErrorCode::InvalidArgs)?;
        let y_token = tokens.next().ok_or(ErrorCode::InvalidArgs)?;
        let x = field(x_token, ErrorCode::InvalidCoords)?;
        let y = field(y_token, ErrorCode::InvalidCoords)?;

        let pressure = match tokens.next() {
            Some(token) => field(token, ErrorCode::InvalidPressure)?,
            None => DEFAULT_PRESSURE,
        };
        let buttons = match tokens.next() {
            Some(token) => field(token, ErrorCode::InvalidButtons)?,
            None => DEFAULT_BUTTONS,
        };
        expect_end(&mut tokens)?;

        Ok(TapArgs { x, y, pressure, buttons })
    }
}

impl SwipeArgs {
    /// Parses `x1 y1 x2 y2 durationMs`.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::InvalidArgs`] with fewer than five tokens, trailing
    ///   tokens, or a non-integer duration.
    /// - [`ErrorCode::InvalidCoords`] if any coordinate is not an integer.
    pub fn parse(raw: &str) -> Result<Self, ErrorCode> {
        if raw.split_whitespace().count() < 5 {
            return Err(ErrorCode::InvalidArgs);
        }

        let mut tokens = raw.split_whitespace();
        let mut coord = || -> Result<i32, ErrorCode> {
            let token = tokens.next().ok_or(ErrorCode::InvalidArgs)?;
            field(token, ErrorCode::InvalidCoords)
        };
        let x1 = coord()?;
        let y1 = coord()?;
        let x2 = coord()?;
        let y2 = coord()?;

        let duration_token = tokens.next().ok_or(ErrorCode::InvalidArgs)?;
        let duration_ms = field(duration_token, ErrorCode::InvalidArgs)?;
        expect_end(&mut tokens)?;

        Ok(SwipeArgs { x1, y1, x2, y2, duration_ms })
    }
}

impl KeycodeArgs {
    /// Parses `code [action]`.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::InvalidArgs`] with no tokens or trailing tokens.
    /// - [`ErrorCode::InvalidKeycode`] if `code` is not an integer.
    pub fn parse(raw: &str) -> Result<Self, ErrorCode> {
        let mut tokens = raw.split_whitespace();
        let code_token = tokens.next().ok_or(ErrorCode::InvalidArgs)?;
        let code = KeyCode(field(code_token, ErrorCode::InvalidKeycode)?);

        let action = tokens
            .next()
            .map(KeycodeAction::from_word)
            .unwrap_or(KeycodeAction::Both);
        expect_end(&mut tokens)?;

        Ok(KeycodeArgs { code, action })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
