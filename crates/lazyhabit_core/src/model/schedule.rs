//! Weekly recurrence model for habits.
//!
//! # Responsibility
//! - Represent a habit's weekly schedule as seven Monday-first slots.
//! - Translate calendar weekdays into schedule slots.
//! - Parse user-facing schedule expressions (`daily`, `1010100`, `mon,wed`).
//!
//! # Invariants
//! - A schedule always has exactly seven slots, index 0 = Monday.
//! - An all-false schedule is legal and means "never due".
//! - Missing or malformed persisted schedules read back as never due.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Number of slots in a weekly schedule.
pub const DAYS_PER_WEEK: usize = 7;

/// Monday-first single-letter labels, one per schedule slot.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["M", "T", "W", "T", "F", "S", "S"];

static MASK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[01]{7}$").expect("valid mask regex"));
static DAY_LIST_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;]+").expect("valid day list regex"));

/// Maps a calendar weekday (0 = Sunday .. 6 = Saturday) to a schedule slot
/// (0 = Monday .. 6 = Sunday).
pub fn weekday_to_schedule_index(days_from_sunday: u32) -> usize {
    if days_from_sunday == 0 {
        DAYS_PER_WEEK - 1
    } else {
        (days_from_sunday as usize - 1) % DAYS_PER_WEEK
    }
}

/// Returns the schedule slot that `date` falls on.
pub fn schedule_index(date: NaiveDate) -> usize {
    weekday_to_schedule_index(date.weekday().num_days_from_sunday())
}

/// Seven-slot weekly recurrence, Monday first.
///
/// Serialized as `{"days":[bool; 7]}`, the same shape used for storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [bool; DAYS_PER_WEEK],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleParseError {
    #[error("schedule expression is empty")]
    Empty,
    #[error("schedule must have exactly 7 days, got {0}")]
    InvalidLength(usize),
    #[error("unknown day name `{0}`")]
    UnknownDay(String),
}

impl WeeklySchedule {
    pub const fn new(days: [bool; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    /// Default schedule for freshly created habits.
    pub const fn every_day() -> Self {
        Self::new([true; DAYS_PER_WEEK])
    }

    pub const fn never() -> Self {
        Self::new([false; DAYS_PER_WEEK])
    }

    pub const fn weekdays() -> Self {
        Self::new([true, true, true, true, true, false, false])
    }

    pub const fn weekends() -> Self {
        Self::new([false, false, false, false, false, true, true])
    }

    /// Builds a schedule from an arbitrary slice, rejecting wrong lengths.
    pub fn from_slice(days: &[bool]) -> Result<Self, ScheduleParseError> {
        let days: [bool; DAYS_PER_WEEK] = days
            .try_into()
            .map_err(|_| ScheduleParseError::InvalidLength(days.len()))?;
        Ok(Self::new(days))
    }

    /// Decodes the persisted JSON form.
    ///
    /// Absent, malformed or wrong-length values decode to [`WeeklySchedule::never`].
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|value| serde_json::from_str::<StoredSchedule>(value).ok())
            .and_then(|stored| Self::from_slice(&stored.days).ok())
            .unwrap_or_else(Self::never)
    }

    /// Encodes the schedule into its persisted JSON form.
    pub fn to_stored(&self) -> String {
        serde_json::json!({ "days": self.days }).to_string()
    }

    pub fn days(&self) -> [bool; DAYS_PER_WEEK] {
        self.days
    }

    /// Returns whether slot `index` (0 = Monday) is due. Out-of-range is never due.
    pub fn is_due_at(&self, index: usize) -> bool {
        self.days.get(index).copied().unwrap_or(false)
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.is_due_at(schedule_index(date))
    }

    /// Number of due slots per week.
    pub fn due_count(&self) -> usize {
        self.days.iter().filter(|due| **due).count()
    }

    pub fn is_never(&self) -> bool {
        self.due_count() == 0
    }
}

impl From<[bool; DAYS_PER_WEEK]> for WeeklySchedule {
    fn from(days: [bool; DAYS_PER_WEEK]) -> Self {
        Self::new(days)
    }
}

impl Display for WeeklySchedule {
    /// Formats as a Monday-first `0/1` mask, e.g. `1010100`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for due in self.days {
            f.write_str(if due { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for WeeklySchedule {
    type Err = ScheduleParseError;

    /// Accepts `daily|weekdays|weekends|never`, a 7-char `0/1` mask, or a
    /// list of day names such as `mon,wed,fri`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ScheduleParseError::Empty);
        }

        match normalized.as_str() {
            "daily" | "everyday" | "all" => return Ok(Self::every_day()),
            "weekdays" => return Ok(Self::weekdays()),
            "weekends" => return Ok(Self::weekends()),
            "never" | "none" => return Ok(Self::never()),
            _ => {}
        }

        if MASK_RE.is_match(&normalized) {
            let days: Vec<bool> = normalized.chars().map(|c| c == '1').collect();
            return Self::from_slice(&days);
        }
        if normalized.chars().all(|c| c == '0' || c == '1') {
            return Err(ScheduleParseError::InvalidLength(normalized.len()));
        }

        let mut days = [false; DAYS_PER_WEEK];
        for token in DAY_LIST_SPLIT_RE
            .split(&normalized)
            .filter(|token| !token.is_empty())
        {
            let index =
                day_name_index(token).ok_or_else(|| ScheduleParseError::UnknownDay(token.into()))?;
            days[index] = true;
        }
        Ok(Self::new(days))
    }
}

#[derive(Deserialize)]
struct StoredSchedule {
    days: Vec<bool>,
}

fn day_name_index(token: &str) -> Option<usize> {
    match token {
        "mon" | "monday" => Some(0),
        "tue" | "tues" | "tuesday" => Some(1),
        "wed" | "wednesday" => Some(2),
        "thu" | "thur" | "thurs" | "thursday" => Some(3),
        "fri" | "friday" => Some(4),
        "sat" | "saturday" => Some(5),
        "sun" | "sunday" => Some(6),
        _ => None,
    }
}
