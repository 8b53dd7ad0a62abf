//! Habit store abstraction and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract the engine and services drive.
//! - Isolate SQLite query details from aggregation and orchestration.
//!
//! # Invariants
//! - Store APIs return semantic errors (`DuplicateLog`, `HabitNotFound`) in
//!   addition to transport errors.

pub mod habit_store;
