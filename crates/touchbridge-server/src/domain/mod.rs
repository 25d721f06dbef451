//! Domain types for the server.
//!
//! Only configuration lives here; the input-event domain is shared with
//! desktop-side tooling and lives in `touchbridge-core`.

/// Server configuration and its value types.
pub mod config;

pub use config::{DisplayId, Endpoint, LogLevel, Scid, ServerConfig, TransportConfig};
