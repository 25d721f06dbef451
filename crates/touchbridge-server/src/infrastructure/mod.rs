//! Infrastructure layer for the server.
//!
//! Contains the I/O-facing adapters: the newline-delimited line channel, the
//! session loop that drives the dispatcher, connection establishment, TOML
//! configuration loading, and capability backends.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchbridge_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`channel`** – Reads and writes UTF-8 lines over any async byte stream.
//! - **`session`** – One connection's command loop with cancellation and
//!   clean/fatal termination reporting.
//! - **`transport`** – Local-socket or TCP connection setup (listen/accept or
//!   connect), including the optional leading sentinel byte.
//! - **`config_file`** – TOML configuration file parsing.
//! - **`backend`** – Capability backend implementations.

pub mod backend;
pub mod channel;
pub mod config_file;
pub mod session;
pub mod transport;
