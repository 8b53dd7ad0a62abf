//! Review use-case service.
//!
//! # Responsibility
//! - Fetch consistent habit + completion snapshots from a `HabitStore`.
//! - Run weekly, monthly and board aggregations over fresh snapshots.
//! - Route completion toggles through a `ToggleCoordinator`.
//!
//! # Invariants
//! - Every review fetches its own snapshot; week and month never share data.
//! - A failed fetch aborts the computation; partial data is never aggregated.
//! - No retries happen here; retrying is the caller's decision.

use crate::engine::aggregate::{CountingPolicy, WindowAggregator, WindowReport};
use crate::engine::board::{build_week_board, WeekBoard};
use crate::engine::log_index::CompletionLogIndex;
use crate::engine::status::DayStatus;
use crate::engine::toggle::{ToggleCoordinator, ToggleError, ToggleOutcome};
use crate::model::habit::{Habit, HabitId, NewHabit};
use crate::model::window::DateWindow;
use crate::repo::habit_store::{HabitStore, StoreError};
use chrono::{Datelike, NaiveDate};
use log::{error, info};
use std::time::Instant;
use thiserror::Error;

/// Message shown when no day in a window has a positive ratio.
pub const INSUFFICIENT_DATA: &str = "insufficient data";

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Toggle(#[from] ToggleError),
}

/// Habits and completions fetched together for one window.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub window: DateWindow,
    pub habits: Vec<Habit>,
    pub index: CompletionLogIndex,
}

/// Current-week review.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReview {
    pub report: WindowReport,
}

impl WeeklyReview {
    /// Human-readable best-day insight, or [`INSUFFICIENT_DATA`].
    pub fn best_day_message(&self) -> String {
        match self.report.best_day {
            Some(best) => format!("{} is your best day", best.date.format("%A")),
            None => INSUFFICIENT_DATA.to_string(),
        }
    }
}

/// One day cell of a month calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: u32,
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Current-month review with a Sunday-first calendar layout.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReview {
    pub year: i32,
    pub month: u32,
    /// e.g. `October 2026`.
    pub title: String,
    /// Blank cells before day 1; 0 when the month starts on a Sunday.
    pub leading_empty_slots: usize,
    pub cells: Vec<CalendarCell>,
    pub report: WindowReport,
}

impl MonthlyReview {
    pub fn score(&self) -> u32 {
        self.report.consistency
    }

    pub fn total_days(&self) -> usize {
        self.cells.len()
    }
}

/// Use-case facade over a habit store.
pub struct ReviewService<S: HabitStore> {
    store: S,
    aggregator: WindowAggregator,
}

impl<S: HabitStore> ReviewService<S> {
    pub fn new(store: S, policy: CountingPolicy) -> Self {
        Self {
            store,
            aggregator: WindowAggregator::new(policy),
        }
    }

    pub fn policy(&self) -> CountingPolicy {
        self.aggregator.policy()
    }

    /// Creates a habit through the store.
    pub fn create_habit(&self, request: &NewHabit) -> Result<Habit, ReviewError> {
        self.store.create_habit(request).map_err(|err| {
            error!("event=habit_create module=service status=error error={err}");
            ReviewError::from(err)
        })
    }

    pub fn list_habits(&self) -> Result<Vec<Habit>, ReviewError> {
        Ok(self.store.list_habits()?)
    }

    /// Fetches habits, then logs for `window`. Either failure aborts.
    pub fn snapshot(&self, window: DateWindow) -> Result<Snapshot, ReviewError> {
        let habits = self.store.list_habits().map_err(|err| {
            error!(
                "event=snapshot module=service status=error stage=habits start={} end={} error={err}",
                window.start(),
                window.end()
            );
            ReviewError::from(err)
        })?;
        let logs = self
            .store
            .list_completion_logs(window.start(), window.end())
            .map_err(|err| {
                error!(
                    "event=snapshot module=service status=error stage=logs start={} end={} error={err}",
                    window.start(),
                    window.end()
                );
                ReviewError::from(err)
            })?;

        Ok(Snapshot {
            window,
            habits,
            index: CompletionLogIndex::from_logs(&logs),
        })
    }

    /// Aggregates an arbitrary window over a fresh snapshot.
    pub fn review_window(&self, window: DateWindow) -> Result<WindowReport, ReviewError> {
        let snapshot = self.snapshot(window)?;
        Ok(self
            .aggregator
            .aggregate(&snapshot.window, &snapshot.habits, &snapshot.index))
    }

    /// Reviews the Monday–Sunday week containing `today`.
    pub fn weekly_review(&self, today: NaiveDate) -> Result<WeeklyReview, ReviewError> {
        let started_at = Instant::now();
        let report = self.review_window(DateWindow::week_of(today))?;
        info!(
            "event=review_week module=service status=ok start={} policy={} consistency={} active_days={} duration_ms={}",
            report.window.start(),
            report.policy,
            report.consistency,
            report.active_days,
            started_at.elapsed().as_millis()
        );
        Ok(WeeklyReview { report })
    }

    /// Reviews the calendar month containing `today`.
    pub fn monthly_review(&self, today: NaiveDate) -> Result<MonthlyReview, ReviewError> {
        let started_at = Instant::now();
        let window = DateWindow::month_of(today);
        let report = self.review_window(window)?;
        let cells = report
            .days
            .iter()
            .map(|stat| CalendarCell {
                day: stat.date.day(),
                date: stat.date,
                status: stat.status,
            })
            .collect::<Vec<_>>();

        info!(
            "event=review_month module=service status=ok start={} policy={} score={} active_days={} duration_ms={}",
            window.start(),
            report.policy,
            report.consistency,
            report.active_days,
            started_at.elapsed().as_millis()
        );
        Ok(MonthlyReview {
            year: window.start().year(),
            month: window.start().month(),
            title: window.start().format("%B %Y").to_string(),
            leading_empty_slots: window.leading_empty_slots(),
            cells,
            report,
        })
    }

    /// Builds the habit board for the week containing `today`.
    pub fn week_board(&self, today: NaiveDate) -> Result<WeekBoard, ReviewError> {
        let snapshot = self.snapshot(DateWindow::week_of(today))?;
        let board = build_week_board(today, &snapshot.habits, &snapshot.index);
        info!(
            "event=board_week module=service status=ok start={} habits={} success_rate={}",
            board.window.start(),
            board.total_habits,
            board.success_rate
        );
        Ok(board)
    }

    /// Creates a coordinator whose local view is loaded for `window`.
    pub fn coordinator(&self, window: DateWindow) -> Result<ToggleCoordinator<&S>, ReviewError> {
        let logs = self
            .store
            .list_completion_logs(window.start(), window.end())?;
        Ok(ToggleCoordinator::new(
            &self.store,
            CompletionLogIndex::from_logs(&logs),
        ))
    }

    /// Toggles one pair against the store's current state for that day.
    pub fn toggle(&self, habit_id: HabitId, date: NaiveDate) -> Result<ToggleOutcome, ReviewError> {
        let mut coordinator = self.coordinator(DateWindow::day(date))?;
        Ok(coordinator.toggle(habit_id, date)?)
    }
}
