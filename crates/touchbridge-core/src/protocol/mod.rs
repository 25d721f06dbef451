//! Protocol module: line parsing, argument validation, responses, and payloads.
//!
//! Wire format (newline-delimited UTF-8):
//! ```text
//! request  := VERB [ ' ' ARGS ]
//! response := "OK" [ ' ' PAYLOAD ] | "ERR" ' ' CODE
//! ```

pub mod args;
pub mod command;
pub mod payload;
pub mod response;

pub use args::{KeycodeAction, KeycodeArgs, SwipeArgs, TapArgs};
pub use command::{parse_line, Command, Verb};
pub use payload::{decode_text, encode_text};
pub use response::{ErrorCode, Response};
