//! Application layer use cases for the server.
//!
//! # What use cases does the server have?
//!
//! - **`dispatcher`** – Maps each parsed verb to its handler, applies the
//!   input-capability gate, and produces exactly one response per line.
//!
//! - **`inject_input`** – Turns tap, swipe, and key-code arguments into an
//!   ordered, timed sequence of synthetic events.
//!
//! - **`inject_text`** – Types a string character by character, decomposing
//!   accented characters into dead-key sequences.
//!
//! - **`clipboard`** – Moves clipboard text across the line protocol as base64.
//!
//! All of them reach the device only through the
//! [`capability::CapabilityBackend`] trait, which is injected at construction
//! time.

pub mod capability;
pub mod clipboard;
pub mod dispatcher;
pub mod inject_input;
pub mod inject_text;
