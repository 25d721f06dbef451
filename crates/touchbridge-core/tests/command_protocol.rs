//! Integration tests for the touchbridge-core command protocol.
//!
//! These tests drive complete request lines through the public API the way
//! the server's dispatcher does: parse the line, pick the verb, parse the
//! verb's arguments, and render the response line that would go back on the
//! wire.

use touchbridge_core::{
    parse_line,
    protocol::{
        args::{KeycodeAction, KeycodeArgs, SwipeArgs, TapArgs},
        payload::{decode_text, encode_text},
    },
    ErrorCode, KeyCode, Response, SwipePlan, Verb,
};

/// Parses a line and validates its arguments the way the dispatcher does,
/// returning the error response or `None` if the line is well formed.
fn validate(line: &str) -> Option<Response> {
    let cmd = match parse_line(line) {
        Ok(cmd) => cmd,
        Err(code) => return Some(Response::Err(code)),
    };
    let result = match cmd.verb {
        Verb::Tap => TapArgs::parse(&cmd.raw_args).map(|_| ()),
        Verb::Swipe | Verb::Drag => SwipeArgs::parse(&cmd.raw_args).map(|_| ()),
        Verb::Keycode => KeycodeArgs::parse(&cmd.raw_args).map(|_| ()),
        Verb::Text | Verb::ClipSet => decode_text(&cmd.raw_args).map(|_| ()),
        Verb::Ping | Verb::ClipGet => Ok(()),
        Verb::Unknown(_) => Err(ErrorCode::UnknownCommand),
    };
    result.err().map(Response::Err)
}

#[test]
fn test_malformed_lines_map_to_specific_error_lines() {
    let cases = [
        ("", "ERR EMPTY_COMMAND"),
        ("   ", "ERR EMPTY_COMMAND"),
        ("FOO", "ERR UNKNOWN_COMMAND"),
        ("TAP 10", "ERR INVALID_ARGS"),
        ("TAP a b", "ERR INVALID_COORDS"),
        ("tap 1 2 soft", "ERR INVALID_PRESSURE"),
        ("TAP 1 2 1.0 x", "ERR INVALID_BUTTONS"),
        ("TAP 1 2 1.0 0 9", "ERR INVALID_ARGS"),
        ("SWIPE 1 2 3", "ERR INVALID_ARGS"),
        ("DRAG 1 2 3 y 100", "ERR INVALID_COORDS"),
        ("KEYCODE", "ERR INVALID_ARGS"),
        ("KEYCODE back", "ERR INVALID_KEYCODE"),
        ("TEXT %%%", "ERR INVALID_BASE64"),
        ("CLIP_SET ***", "ERR INVALID_BASE64"),
    ];

    for (line, expected) in cases {
        let response = validate(line).unwrap_or_else(|| panic!("{line:?} should fail"));
        assert_eq!(response.to_string(), expected, "line {line:?}");
    }
}

#[test]
fn test_well_formed_lines_validate() {
    for line in [
        "PING",
        "CLIP_GET",
        "TAP 100 200",
        "TAP 100 200 0.8 1",
        "SWIPE 0 0 500 500 300",
        "drag 10 10 20 20 0",
        "KEYCODE 82",
        "KEYCODE 4 up",
        "TEXT aGVsbG8=",
        "TEXT",
    ] {
        assert_eq!(validate(line), None, "line {line:?}");
    }
}

#[test]
fn test_keycode_scenario_defaults_to_press_release() {
    let cmd = parse_line("KEYCODE 82").unwrap();
    let args = KeycodeArgs::parse(&cmd.raw_args).unwrap();
    assert_eq!(args.code, KeyCode::MENU);
    assert_eq!(args.action, KeycodeAction::Both);
}

#[test]
fn test_clipboard_payload_survives_the_line_protocol() {
    // Arrange – text with spaces and a newline, which could not travel raw
    let text = "first line\nsecond line with spaces";

    // Act – encode into a CLIP_SET line, parse it back out
    let line = format!("CLIP_SET {}", encode_text(text));
    let cmd = parse_line(&line).unwrap();
    let decoded = decode_text(&cmd.raw_args).unwrap();

    // Assert
    assert_eq!(cmd.verb, Verb::ClipSet);
    assert_eq!(decoded, text);
    assert_eq!(
        Response::ok_with(encode_text(&decoded)).to_string(),
        format!("OK {}", encode_text(text))
    );
}

#[test]
fn test_swipe_line_to_plan() {
    // Arrange
    let cmd = parse_line("SWIPE 0 0 160 320 160").unwrap();
    let args = SwipeArgs::parse(&cmd.raw_args).unwrap();

    // Act
    let plan = SwipePlan::new((args.x1, args.y1), (args.x2, args.y2), args.duration_ms);
    let moves: Vec<_> = plan.moves().collect();

    // Assert
    assert_eq!(plan.steps(), 10);
    assert_eq!(moves.len(), 9);
    assert_eq!((moves[0].x, moves[0].y), (16, 32));
    assert!(moves.windows(2).all(|w| w[0].offset_ms < w[1].offset_ms));
}
