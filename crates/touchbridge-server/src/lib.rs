//! touchbridge-server library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touchbridge-server do? (for beginners)
//!
//! The server runs on the controlled device.  A desktop-side client connects
//! to it over a byte stream and sends one text command per line.  For each
//! line the server:
//!
//! 1. Parses the verb and its arguments (`touchbridge_core::protocol`).
//! 2. Checks that the target display accepts injected input, unless the verb
//!    is `PING` or a clipboard verb.
//! 3. Turns the arguments into synthetic pointer or key events with explicit
//!    timing, or exchanges clipboard text.
//! 4. Hands the events to a [`application::capability::CapabilityBackend`],
//!    the component that actually talks to the device.
//! 5. Writes exactly one `OK ...` or `ERR ...` line back.
//!
//! Commands are processed strictly one at a time: a long swipe delays the
//! next line until its last event has been injected.

/// Application layer: dispatcher and injection use cases.
pub mod application;

/// Domain layer: server configuration types.
pub mod domain;

/// Infrastructure layer: line channel, session loop, transport, backends.
pub mod infrastructure;
