//! Domain entities for touchbridge.
//!
//! This module contains pure input-event logic with no infrastructure
//! dependencies: no clocks, no sleeps, no injection.  Callers supply the
//! timestamps and perform the actual injection; the types here only describe
//! *what* should be injected and *when* relative to a gesture's start.

/// Key codes, meta state, and key events.
pub mod key;

/// Single-pointer touch state and pointer events.
pub mod pointer;

/// Deterministic swipe planning (step count, interpolation, timing).
pub mod gesture;
