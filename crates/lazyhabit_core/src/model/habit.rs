//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record read by aggregation components.
//! - Define the creation request (`NewHabit`) and its validation rules.
//!
//! # Invariants
//! - `id` is assigned by the habit store and never reused.
//! - Title and subtitle are display-only; the engine never mutates them.
//! - A habit is never deleted by the engine.

use crate::model::icon::DEFAULT_ICON_KEY;
use crate::model::schedule::WeeklySchedule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier for a habit.
pub type HabitId = Uuid;

/// Subtitle applied when the creator does not supply one.
pub const DEFAULT_SUBTITLE: &str = "Personal";

/// Maximum accepted title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// A user-defined recurring activity with a weekly due schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    pub subtitle: String,
    /// Icon key, resolved for display through [`crate::model::icon::HabitIcon`].
    pub icon: String,
    pub schedule: WeeklySchedule,
    /// Unix epoch milliseconds; the store lists habits in ascending order of this.
    pub created_at: i64,
}

impl Habit {
    /// Returns whether this habit is due on `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.schedule.is_due_on(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitValidationError {
    #[error("habit title cannot be empty")]
    EmptyTitle,
    #[error("habit title is {len} characters; maximum is {max}")]
    TitleTooLong { len: usize, max: usize },
}

/// Request model for creating a habit.
///
/// Defaults mirror the creation flow: every day due, `Personal` subtitle and
/// the `Activity` icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub schedule: WeeklySchedule,
}

impl NewHabit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            icon: DEFAULT_ICON_KEY.to_string(),
            schedule: WeeklySchedule::every_day(),
        }
    }

    pub fn with_schedule(mut self, schedule: WeeklySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Returns a copy with trimmed text fields and defaults for blank ones.
    pub fn normalized(&self) -> Self {
        let subtitle = self.subtitle.trim();
        let icon = self.icon.trim();
        Self {
            title: self.title.trim().to_string(),
            subtitle: if subtitle.is_empty() {
                DEFAULT_SUBTITLE.to_string()
            } else {
                subtitle.to_string()
            },
            icon: if icon.is_empty() {
                DEFAULT_ICON_KEY.to_string()
            } else {
                icon.to_string()
            },
            schedule: self.schedule,
        }
    }

    /// Validates title rules on the normalized form.
    ///
    /// # Errors
    /// - `EmptyTitle` when the trimmed title is empty.
    /// - `TitleTooLong` when the trimmed title exceeds [`MAX_TITLE_CHARS`].
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(HabitValidationError::EmptyTitle);
        }
        let len = title.chars().count();
        if len > MAX_TITLE_CHARS {
            return Err(HabitValidationError::TitleTooLong {
                len,
                max: MAX_TITLE_CHARS,
            });
        }
        Ok(())
    }
}
