//! # touchbridge-core
//!
//! Shared library for touchbridge containing the text command protocol,
//! gesture planning, and the key composition tables used for text injection.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or sockets.
//!
//! # Architecture overview (for beginners)
//!
//! touchbridge is a remote-control bridge: a desktop-side client sends one
//! text command per line (`TAP 100 200`, `SWIPE 0 0 500 500 300`, `TEXT aGk=`)
//! and the device-side server injects the matching synthetic input, answering
//! every line with exactly one `OK ...` or `ERR ...` line.
//!
//! This crate (`touchbridge-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – How lines are split into a verb and arguments, how each
//!   verb's arguments are validated (with a specific error code per malformed
//!   field), how responses are rendered, and how text payloads are base64
//!   encoded so they always fit on one line.
//!
//! - **`domain`** – Pure input-event types (pointer and key events) and the
//!   deterministic swipe planner that decides how many MOVE events a gesture
//!   has, where they land, and when they fire.
//!
//! - **`keymap`** – The static table that decomposes accented characters into
//!   a combining accent plus base character, and a reference virtual keyboard
//!   that resolves characters to key-event sequences.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `touchbridge_core::Response` instead of `touchbridge_core::protocol::response::Response`.
pub use domain::gesture::SwipePlan;
pub use domain::key::{KeyAction, KeyCode, KeyEvent, MetaState};
pub use domain::pointer::{MotionAction, PointerEvent, PointerState};
pub use protocol::command::{parse_line, Command, Verb};
pub use protocol::response::{ErrorCode, Response};
