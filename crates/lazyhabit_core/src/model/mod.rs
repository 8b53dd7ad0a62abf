//! Habit tracking domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by the engine, store and services.
//!
//! # Invariants
//! - Schedules are Monday-first; calendar weekdays are Sunday-first and must
//!   be translated through `schedule::schedule_index`.
//! - Dates carry no time-of-day component.

pub mod completion;
pub mod habit;
pub mod icon;
pub mod schedule;
pub mod window;
