//! Window aggregation: per-day counts and window-level consistency.
//!
//! # Responsibility
//! - Fold a habit snapshot and a completion index over a date window.
//! - Produce an explicit `WindowReport` value; no state survives the call.
//!
//! # Invariants
//! - `ratio` is `0` whenever nothing is scheduled; no division by zero.
//! - `consistency` is `0` whenever `total_scheduled == 0`.
//! - The counting policy is applied uniformly to every per-day and window
//!   figure (`completed`, `ratio`, `status`, `active_days`, `best_day`).
//! - Percentages round half up.

use crate::engine::log_index::CompletionLogIndex;
use crate::engine::status::DayStatus;
use crate::model::habit::{Habit, HabitId};
use crate::model::schedule::{schedule_index, WEEKDAY_LABELS};
use crate::model::window::DateWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Which completion logs count toward a day's completed total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingPolicy {
    /// Every log dated that day counts, even for habits not due; ratios may exceed 1.0.
    #[default]
    AllLogs,
    /// Only logs for habits due that day count.
    ScheduledOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown counting policy `{0}`; expected all_logs|scheduled_only")]
pub struct UnknownCountingPolicy(pub String);

impl CountingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllLogs => "all_logs",
            Self::ScheduledOnly => "scheduled_only",
        }
    }
}

impl Display for CountingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountingPolicy {
    type Err = UnknownCountingPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all_logs" | "all" => Ok(Self::AllLogs),
            "scheduled_only" | "scheduled" => Ok(Self::ScheduledOnly),
            other => Err(UnknownCountingPolicy(other.to_string())),
        }
    }
}

/// Aggregated figures for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub scheduled: usize,
    pub completed: usize,
    pub ratio: f64,
    /// `round(100 * ratio)`, 0 when nothing is scheduled.
    pub percent: u32,
    pub status: DayStatus,
}

impl DayStat {
    /// Monday-first single-letter weekday label.
    pub fn label(&self) -> &'static str {
        WEEKDAY_LABELS[schedule_index(self.date)]
    }
}

/// Day with the highest ratio in a window; earliest date wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub ratio: f64,
    pub percent: u32,
}

/// Result of aggregating one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    pub window: DateWindow,
    pub policy: CountingPolicy,
    pub days: Vec<DayStat>,
    pub total_habits: usize,
    pub total_scheduled: usize,
    pub total_completed: usize,
    /// `round(100 * total_completed / total_scheduled)`, 0 when nothing is scheduled.
    pub consistency: u32,
    /// Days with at least one counted completion.
    pub active_days: usize,
    /// Days whose rounded percentage is exactly 100.
    pub perfect_days: usize,
    /// `None` means insufficient data: no day has a positive ratio.
    pub best_day: Option<BestDay>,
}

impl WindowReport {
    pub fn day(&self, date: NaiveDate) -> Option<&DayStat> {
        self.days.iter().find(|stat| stat.date == date)
    }

    pub fn statuses(&self) -> impl Iterator<Item = DayStatus> + '_ {
        self.days.iter().map(|stat| stat.status)
    }
}

/// Rounds `100 * numerator / denominator` half up; 0 when `denominator == 0`.
pub fn round_percent(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let (n, d) = (numerator as u128, denominator as u128);
    u32::try_from((200 * n + d) / (2 * d)).unwrap_or(u32::MAX)
}

/// Stateless aggregator parameterized by counting policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowAggregator {
    policy: CountingPolicy,
}

impl WindowAggregator {
    pub fn new(policy: CountingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CountingPolicy {
        self.policy
    }

    /// Aggregates `habits` and `index` over every day of `window`.
    ///
    /// Empty habit lists and empty windows produce zero-valued reports.
    pub fn aggregate(
        &self,
        window: &DateWindow,
        habits: &[Habit],
        index: &CompletionLogIndex,
    ) -> WindowReport {
        let habits_by_id: HashMap<HabitId, &Habit> =
            habits.iter().map(|habit| (habit.id, habit)).collect();

        let days: Vec<DayStat> = window
            .days()
            .map(|date| self.day_stat(date, habits, &habits_by_id, index))
            .collect();

        let total_scheduled: usize = days.iter().map(|stat| stat.scheduled).sum();
        let total_completed: usize = days.iter().map(|stat| stat.completed).sum();
        let active_days = days.iter().filter(|stat| stat.completed > 0).count();
        let perfect_days = days.iter().filter(|stat| stat.percent == 100).count();

        let mut best_day: Option<BestDay> = None;
        for stat in days.iter().filter(|stat| stat.ratio > 0.0) {
            if best_day.map_or(true, |best| stat.ratio > best.ratio) {
                best_day = Some(BestDay {
                    date: stat.date,
                    ratio: stat.ratio,
                    percent: stat.percent,
                });
            }
        }

        WindowReport {
            window: *window,
            policy: self.policy,
            total_habits: habits.len(),
            total_scheduled,
            total_completed,
            consistency: round_percent(total_completed, total_scheduled),
            active_days,
            perfect_days,
            best_day,
            days,
        }
    }

    fn day_stat(
        &self,
        date: NaiveDate,
        habits: &[Habit],
        habits_by_id: &HashMap<HabitId, &Habit>,
        index: &CompletionLogIndex,
    ) -> DayStat {
        let scheduled = habits.iter().filter(|habit| habit.is_due_on(date)).count();
        let completed = match self.policy {
            CountingPolicy::AllLogs => index.completed_count(date),
            CountingPolicy::ScheduledOnly => index
                .completed_habits(date)
                .filter(|habit_id| {
                    habits_by_id
                        .get(habit_id)
                        .is_some_and(|habit| habit.is_due_on(date))
                })
                .count(),
        };
        let ratio = if scheduled > 0 {
            completed as f64 / scheduled as f64
        } else {
            0.0
        };

        DayStat {
            date,
            scheduled,
            completed,
            ratio,
            percent: if scheduled > 0 {
                round_percent(completed, scheduled)
            } else {
                0
            },
            status: DayStatus::classify(scheduled, ratio),
        }
    }
}
