//! Optimistic completion toggling.
//!
//! # Responsibility
//! - Flip one `(habit, date)` pair in the local view, then persist the flip.
//! - Reconcile the local view with the store when the write fails.
//!
//! # Invariants
//! - The local flip is applied before the store call returns.
//! - Any store failure restores the pre-toggle local state before the error
//!   is returned; the caller sees the failure exactly once.
//! - A duplicate-insert rejection leaves the pair completed and counts as success.
//! - Two successful toggles of the same pair restore its original state.

use crate::engine::log_index::CompletionLogIndex;
use crate::model::habit::HabitId;
use crate::repo::habit_store::{HabitStore, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use thiserror::Error;

/// State of a pair after a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    /// `true` when the pair is now completed.
    pub completed: bool,
}

#[derive(Debug, Error)]
pub enum ToggleError {
    /// The store rejected the write; the local flip has been reverted.
    #[error("failed to toggle habit {habit_id} on {date}: {source}")]
    Store {
        habit_id: HabitId,
        date: NaiveDate,
        #[source]
        source: StoreError,
    },
}

/// Owns the local completion view for one session and drives a store.
pub struct ToggleCoordinator<S: HabitStore> {
    store: S,
    local: CompletionLogIndex,
}

impl<S: HabitStore> ToggleCoordinator<S> {
    /// Creates a coordinator over an already-fetched local view.
    pub fn new(store: S, local: CompletionLogIndex) -> Self {
        Self { store, local }
    }

    /// Current local view, including optimistic state.
    pub fn local(&self) -> &CompletionLogIndex {
        &self.local
    }

    pub fn is_completed(&self, habit_id: HabitId, date: NaiveDate) -> bool {
        self.local.is_completed(habit_id, date)
    }

    /// Consumes the coordinator and returns its local view.
    pub fn into_local(self) -> CompletionLogIndex {
        self.local
    }

    /// Flips completion for `(habit_id, date)`.
    ///
    /// # Errors
    /// - `ToggleError::Store` when the store write fails; the local view is
    ///   back to its pre-toggle value when this is returned.
    pub fn toggle(
        &mut self,
        habit_id: HabitId,
        date: NaiveDate,
    ) -> Result<ToggleOutcome, ToggleError> {
        let was_completed = self.local.is_completed(habit_id, date);
        self.apply(habit_id, date, !was_completed);

        let write = if was_completed {
            self.store
                .delete_completion_log(habit_id, date)
                .map(|_| ())
        } else {
            match self.store.insert_completion_log(habit_id, date) {
                Ok(_) | Err(StoreError::DuplicateLog { .. }) => Ok(()),
                Err(err) => Err(err),
            }
        };

        match write {
            Ok(()) => {
                info!(
                    "event=toggle module=engine status=ok habit_id={habit_id} date={date} completed={}",
                    !was_completed
                );
                Ok(ToggleOutcome {
                    habit_id,
                    date,
                    completed: !was_completed,
                })
            }
            Err(source) => {
                self.apply(habit_id, date, was_completed);
                warn!(
                    "event=toggle module=engine status=reverted habit_id={habit_id} date={date} completed={was_completed} error={source}"
                );
                Err(ToggleError::Store {
                    habit_id,
                    date,
                    source,
                })
            }
        }
    }

    fn apply(&mut self, habit_id: HabitId, date: NaiveDate, completed: bool) {
        if completed {
            self.local.insert(habit_id, date);
        } else {
            self.local.remove(habit_id, date);
        }
    }
}
