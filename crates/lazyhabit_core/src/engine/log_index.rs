//! In-memory completion lookup.
//!
//! # Invariants
//! - A `(habit_id, date)` pair is either present once or absent.
//! - `completed_count(date)` counts distinct habits logged that day, scheduled
//!   or not; counting policy is applied by the aggregator.

use crate::model::completion::CompletionLog;
use crate::model::habit::HabitId;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// `(habit, date) -> completed` index built from raw completion logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionLogIndex {
    by_date: HashMap<NaiveDate, HashSet<HabitId>>,
}

impl CompletionLogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index; duplicate records collapse into one entry.
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a CompletionLog>) -> Self {
        let mut index = Self::new();
        for log in logs {
            index.insert(log.habit_id, log.date);
        }
        index
    }

    pub fn is_completed(&self, habit_id: HabitId, date: NaiveDate) -> bool {
        self.by_date
            .get(&date)
            .is_some_and(|habits| habits.contains(&habit_id))
    }

    /// Number of distinct habits logged on `date`.
    pub fn completed_count(&self, date: NaiveDate) -> usize {
        self.by_date.get(&date).map_or(0, HashSet::len)
    }

    /// Habits logged on `date`, in no particular order.
    pub fn completed_habits(&self, date: NaiveDate) -> impl Iterator<Item = HabitId> + '_ {
        self.by_date
            .get(&date)
            .into_iter()
            .flat_map(|habits| habits.iter().copied())
    }

    /// Marks a pair completed. Returns `false` when it already was.
    pub fn insert(&mut self, habit_id: HabitId, date: NaiveDate) -> bool {
        self.by_date.entry(date).or_default().insert(habit_id)
    }

    /// Clears a pair. Returns `false` when it was not completed.
    pub fn remove(&mut self, habit_id: HabitId, date: NaiveDate) -> bool {
        let Some(habits) = self.by_date.get_mut(&date) else {
            return false;
        };
        let removed = habits.remove(&habit_id);
        if habits.is_empty() {
            self.by_date.remove(&date);
        }
        removed
    }

    /// Total number of recorded pairs.
    pub fn len(&self) -> usize {
        self.by_date.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
