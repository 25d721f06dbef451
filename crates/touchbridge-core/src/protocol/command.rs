//! Command line parsing: verb extraction and argument tail splitting.
//!
//! Parsing only separates a line into its verb and raw argument tail.  It
//! never rejects a verb: unknown verbs are carried as [`Verb::Unknown`] and
//! rejected by the dispatcher, so that verb validity and line syntax stay
//! separate concerns.

use std::fmt;

use crate::protocol::response::ErrorCode;

/// The command keyword of a request line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Liveness check, answered with `OK PONG`.
    Ping,
    /// Read the device clipboard.
    ClipGet,
    /// Replace the device clipboard.
    ClipSet,
    /// Touch down and up at one point.
    Tap,
    /// Touch down, move, and up along a straight line.
    Swipe,
    /// Alias of [`Verb::Swipe`].
    Drag,
    /// Inject a raw key code.
    Keycode,
    /// Type a base64-encoded UTF-8 string.
    Text,
    /// Any other keyword, already upper-cased.
    Unknown(String),
}

impl Verb {
    /// Maps an upper-cased keyword to its verb.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "PING" => Verb::Ping,
            "CLIP_GET" => Verb::ClipGet,
            "CLIP_SET" => Verb::ClipSet,
            "TAP" => Verb::Tap,
            "SWIPE" => Verb::Swipe,
            "DRAG" => Verb::Drag,
            "KEYCODE" => Verb::Keycode,
            "TEXT" => Verb::Text,
            other => Verb::Unknown(other.to_string()),
        }
    }

    /// Returns `true` if the verb may only run on an input-capable display.
    ///
    /// `PING` and the clipboard verbs bypass the gate; everything else,
    /// including unknown verbs, is gated.
    pub fn requires_input(&self) -> bool {
        match self {
            Verb::Ping | Verb::ClipGet | Verb::ClipSet => false,
            Verb::Tap
            | Verb::Swipe
            | Verb::Drag
            | Verb::Keycode
            | Verb::Text
            | Verb::Unknown(_) => true,
        }
    }

    /// The wire keyword of this verb.
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Ping => "PING",
            Verb::ClipGet => "CLIP_GET",
            Verb::ClipSet => "CLIP_SET",
            Verb::Tap => "TAP",
            Verb::Swipe => "SWIPE",
            Verb::Drag => "DRAG",
            Verb::Keycode => "KEYCODE",
            Verb::Text => "TEXT",
            Verb::Unknown(keyword) => keyword,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed request line.  Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The verb, matched case-insensitively.
    pub verb: Verb,
    /// Everything after the verb, trimmed.  Empty when there are no arguments.
    pub raw_args: String,
}

/// Splits a received line into a [`Command`].
///
/// Steps: trim surrounding whitespace, fail with
/// [`ErrorCode::EmptyCommand`] if nothing is left, split at the first
/// whitespace run, upper-case the verb, and trim the argument tail.
///
/// # Errors
///
/// Returns [`ErrorCode::EmptyCommand`] for blank lines.
///
/// # Examples
///
/// ```rust
/// use touchbridge_core::protocol::command::{parse_line, Verb};
///
/// let cmd = parse_line("  tap 10   20 ").unwrap();
/// assert_eq!(cmd.verb, Verb::Tap);
/// assert_eq!(cmd.raw_args, "10   20");
/// ```
pub fn parse_line(line: &str) -> Result<Command, ErrorCode> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ErrorCode::EmptyCommand);
    }

    let (keyword, tail) = match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim()),
        None => (trimmed, ""),
    };

    Ok(Command {
        verb: Verb::from_keyword(&keyword.to_ascii_uppercase()),
        raw_args: tail.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_empty_is_empty_command() {
        assert_eq!(parse_line(""), Err(ErrorCode::EmptyCommand));
    }

    #[test]
    fn test_parse_line_whitespace_only_is_empty_command() {
        assert_eq!(parse_line(" \t  "), Err(ErrorCode::EmptyCommand));
    }

    #[test]
    fn test_parse_line_verb_without_arguments() {
        // Arrange / Act
        let cmd = parse_line("PING").unwrap();

        // Assert
        assert_eq!(cmd.verb, Verb::Ping);
        assert_eq!(cmd.raw_args, "");
    }

    #[test]
    fn test_parse_line_verb_is_case_insensitive() {
        assert_eq!(parse_line("clip_get").unwrap().verb, Verb::ClipGet);
        assert_eq!(parse_line("Keycode 3").unwrap().verb, Verb::Keycode);
    }

    #[test]
    fn test_parse_line_splits_at_first_whitespace_run() {
        // Arrange / Act
        let cmd = parse_line("SWIPE\t 1 2  3 4 5").unwrap();

        // Assert – inner spacing of the tail is preserved, edges trimmed
        assert_eq!(cmd.verb, Verb::Swipe);
        assert_eq!(cmd.raw_args, "1 2  3 4 5");
    }

    #[test]
    fn test_parse_line_unknown_verb_is_passed_through_uppercased() {
        let cmd = parse_line("foo bar").unwrap();
        assert_eq!(cmd.verb, Verb::Unknown("FOO".to_string()));
        assert_eq!(cmd.raw_args, "bar");
    }

    #[test]
    fn test_parse_line_trims_trailing_carriage_return() {
        let cmd = parse_line("PING\r").unwrap();
        assert_eq!(cmd.verb, Verb::Ping);
    }

    #[test]
    fn test_requires_input_only_exempts_ping_and_clipboard() {
        assert!(!Verb::Ping.requires_input());
        assert!(!Verb::ClipGet.requires_input());
        assert!(!Verb::ClipSet.requires_input());
        assert!(Verb::Tap.requires_input());
        assert!(Verb::Swipe.requires_input());
        assert!(Verb::Drag.requires_input());
        assert!(Verb::Keycode.requires_input());
        assert!(Verb::Text.requires_input());
        assert!(Verb::Unknown("FOO".into()).requires_input());
    }

    #[test]
    fn test_verb_display_round_trips_through_from_keyword() {
        for verb in [
            Verb::Ping,
            Verb::ClipGet,
            Verb::ClipSet,
            Verb::Tap,
            Verb::Swipe,
            Verb::Drag,
            Verb::Keycode,
            Verb::Text,
        ] {
            assert_eq!(Verb::from_keyword(&verb.to_string()), verb);
        }
    }
}
