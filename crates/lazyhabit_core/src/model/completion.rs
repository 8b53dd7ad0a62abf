//! Completion log record.
//!
//! # Invariants
//! - Identity is the pair `(habit_id, date)`; at most one log exists per pair.
//! - Presence means "completed that day"; logs are never updated in place.

use crate::model::habit::HabitId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Record that `habit_id` was completed on calendar day `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompletionLog {
    pub habit_id: HabitId,
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

impl CompletionLog {
    pub fn new(habit_id: HabitId, date: NaiveDate) -> Self {
        Self { habit_id, date }
    }
}
