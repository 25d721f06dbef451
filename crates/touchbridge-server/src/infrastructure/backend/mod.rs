//! Capability backend implementations.
//!
//! The device-specific backend (the component that really injects events and
//! reads the clipboard) is supplied by the embedder through
//! [`crate::application::capability::CapabilityBackend`].  The mock backend
//! here records everything in memory and is used by tests and by the binary
//! when no device backend is linked in.

pub mod mock;

pub use mock::MockCapabilityBackend;
