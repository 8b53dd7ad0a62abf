//! Habit schedule and consistency aggregation engine.
//!
//! # Responsibility
//! - Index completion logs, aggregate them over date windows, classify days.
//! - Toggle completions optimistically with revert on store failure.
//!
//! # Invariants
//! - Aggregation is a synchronous pure fold over an already-fetched snapshot.
//! - Nothing in this module keeps state between calls except the explicit
//!   local view owned by a `ToggleCoordinator`.

pub mod aggregate;
pub mod board;
pub mod log_index;
pub mod status;
pub mod toggle;
