//! Weekly habit board: one Monday–Sunday row per habit.
//!
//! Unlike window aggregation, the board only credits completions on due days.

use crate::engine::aggregate::round_percent;
use crate::engine::log_index::CompletionLogIndex;
use crate::model::habit::{Habit, HabitId};
use crate::model::icon::HabitIcon;
use crate::model::schedule::DAYS_PER_WEEK;
use crate::model::window::DateWindow;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One habit's week: due flags, checked flags and progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitWeekRow {
    pub habit_id: HabitId,
    pub title: String,
    pub subtitle: String,
    pub icon: HabitIcon,
    pub dates: [NaiveDate; DAYS_PER_WEEK],
    pub due: [bool; DAYS_PER_WEEK],
    /// Completion state per date, including days that are not due.
    pub checked: [bool; DAYS_PER_WEEK],
    /// `round(100 * |checked ∧ due| / |due|)`, 0 when nothing is due.
    pub progress: u32,
}

impl HabitWeekRow {
    pub fn due_count(&self) -> usize {
        self.due.iter().filter(|due| **due).count()
    }

    /// Completions that landed on due days.
    pub fn completed_due_count(&self) -> usize {
        self.due
            .iter()
            .zip(self.checked.iter())
            .filter(|(due, checked)| **due && **checked)
            .count()
    }

    /// Position of `date` within this row, if it belongs to the week.
    pub fn slot_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|candidate| *candidate == date)
    }
}

/// Board for the week containing a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBoard {
    pub window: DateWindow,
    pub rows: Vec<HabitWeekRow>,
    pub total_habits: usize,
    pub total_opportunities: usize,
    pub total_completed: usize,
    /// `round(100 * total_completed / total_opportunities)`, 0 with no opportunities.
    pub success_rate: u32,
}

impl WeekBoard {
    pub fn row(&self, habit_id: HabitId) -> Option<&HabitWeekRow> {
        self.rows.iter().find(|row| row.habit_id == habit_id)
    }
}

/// Builds the board for the Monday–Sunday week containing `reference`.
pub fn build_week_board(
    reference: NaiveDate,
    habits: &[Habit],
    index: &CompletionLogIndex,
) -> WeekBoard {
    let window = DateWindow::week_of(reference);
    let monday = window.start();
    let dates: [NaiveDate; DAYS_PER_WEEK] =
        std::array::from_fn(|offset| monday + Duration::days(offset as i64));

    let rows: Vec<HabitWeekRow> = habits
        .iter()
        .map(|habit| {
            let due = dates.map(|date| habit.is_due_on(date));
            let checked = dates.map(|date| index.is_completed(habit.id, date));
            let mut row = HabitWeekRow {
                habit_id: habit.id,
                title: habit.title.clone(),
                subtitle: habit.subtitle.clone(),
                icon: HabitIcon::from_key(Some(habit.icon.as_str())),
                dates,
                due,
                checked,
                progress: 0,
            };
            row.progress = round_percent(row.completed_due_count(), row.due_count());
            row
        })
        .collect();

    let total_opportunities: usize = rows.iter().map(HabitWeekRow::due_count).sum();
    let total_completed: usize = rows.iter().map(HabitWeekRow::completed_due_count).sum();

    WeekBoard {
        window,
        total_habits: rows.len(),
        total_opportunities,
        total_completed,
        success_rate: round_percent(total_completed, total_opportunities),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::completion::CompletionLog;
    use crate::model::schedule::WeeklySchedule;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn habit(schedule: WeeklySchedule) -> Habit {
        Habit {
            id: Uuid::new_v4(),
            title: "Walk".to_string(),
            subtitle: "Personal".to_string(),
            icon: "Unknown".to_string(),
            schedule,
            created_at: 0,
        }
    }

    #[test]
    fn board_only_credits_due_days() {
        let walk = habit(WeeklySchedule::new([
            true, false, true, false, true, false, false,
        ]));
        // Week of 2026-10-12 (Mon) .. 2026-10-18 (Sun); Tuesday is not due.
        let logs = vec![
            CompletionLog::new(walk.id, date(12)),
            CompletionLog::new(walk.id, date(13)),
        ];
        let index = CompletionLogIndex::from_logs(&logs);
        let board = build_week_board(date(15), std::slice::from_ref(&walk), &index);

        let row = board.row(walk.id).unwrap();
        assert_eq!(row.dates[0], date(12));
        assert_eq!(row.checked[..2], [true, true]);
        assert_eq!(row.completed_due_count(), 1);
        assert_eq!(row.progress, 33);
        assert_eq!(row.icon, HabitIcon::Activity);
        assert_eq!(board.total_opportunities, 3);
        assert_eq!(board.total_completed, 1);
        assert_eq!(board.success_rate, 33);
    }

    #[test]
    fn never_due_habit_has_zero_progress() {
        let idle = habit(WeeklySchedule::never());
        let board = build_week_board(date(15), &[idle], &CompletionLogIndex::new());
        assert_eq!(board.rows[0].progress, 0);
        assert_eq!(board.success_rate, 0);
        assert_eq!(board.total_habits, 1);
    }
}
