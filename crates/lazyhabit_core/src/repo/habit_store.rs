//! Habit store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the read/write surface the engine drives (`HabitStore`).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - At most one completion log per `(habit_id, date)`; the schema enforces it
//!   and duplicate inserts surface as `StoreError::DuplicateLog`.
//! - Deleting a missing completion log is a no-op success.
//! - Habits are listed in ascending creation order.
//! - Persisted schedules that fail to decode read back as never due.

use crate::db::DbError;
use crate::model::completion::CompletionLog;
use crate::model::habit::{Habit, HabitId, HabitValidationError, NewHabit};
use crate::model::schedule::WeeklySchedule;
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    subtitle,
    icon,
    schedule,
    created_at
FROM habits";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a habit store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] HabitValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("habit not found: {0}")]
    HabitNotFound(HabitId),
    /// Uniqueness violation on `(habit_id, date)`.
    #[error("completion log already exists for habit {habit_id} on {date}")]
    DuplicateLog { habit_id: HabitId, date: NaiveDate },
    #[error("invalid persisted habit data: {0}")]
    InvalidData(String),
    /// Transport-level failure for stores that are not local SQLite.
    #[error("habit store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read/write operations the engine needs from persistence.
pub trait HabitStore {
    /// Lists every habit, oldest first.
    fn list_habits(&self) -> StoreResult<Vec<Habit>>;

    /// Lists completion logs with `date` in `[start, end]`, in no particular order.
    fn list_completion_logs(&self, start: NaiveDate, end: NaiveDate)
        -> StoreResult<Vec<CompletionLog>>;

    /// Inserts one completion log.
    ///
    /// # Errors
    /// - `DuplicateLog` when the pair is already recorded.
    /// - `HabitNotFound` when `habit_id` does not exist.
    fn insert_completion_log(&self, habit_id: HabitId, date: NaiveDate)
        -> StoreResult<CompletionLog>;

    /// Deletes one completion log. Returns whether a row was removed; a
    /// missing row is not an error.
    fn delete_completion_log(&self, habit_id: HabitId, date: NaiveDate) -> StoreResult<bool>;

    /// Creates a habit and returns it with its store-assigned id.
    fn create_habit(&self, request: &NewHabit) -> StoreResult<Habit>;
}

impl<S: HabitStore + ?Sized> HabitStore for &S {
    fn list_habits(&self) -> StoreResult<Vec<Habit>> {
        (**self).list_habits()
    }

    fn list_completion_logs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<CompletionLog>> {
        (**self).list_completion_logs(start, end)
    }

    fn insert_completion_log(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
    ) -> StoreResult<CompletionLog> {
        (**self).insert_completion_log(habit_id, date)
    }

    fn delete_completion_log(&self, habit_id: HabitId, date: NaiveDate) -> StoreResult<bool> {
        (**self).delete_completion_log(habit_id, date)
    }

    fn create_habit(&self, request: &NewHabit) -> StoreResult<Habit> {
        (**self).create_habit(request)
    }
}

/// SQLite-backed habit store.
#[derive(Clone, Copy)]
pub struct SqliteHabitStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitStore<'conn> {
    /// Wraps a connection opened through [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Gets one habit by id.
    pub fn get_habit(&self, id: HabitId) -> StoreResult<Option<Habit>> {
        let habit = self
            .conn
            .query_row(
                &format!("{HABIT_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_habit_row(row)),
            )
            .optional()?;
        habit.transpose()
    }
}

impl HabitStore for SqliteHabitStore<'_> {
    fn list_habits(&self) -> StoreResult<Vec<Habit>> {
        let started_at = Instant::now();
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }

        info!(
            "event=habit_list module=repo status=ok count={} duration_ms={}",
            habits.len(),
            started_at.elapsed().as_millis()
        );
        Ok(habits)
    }

    fn list_completion_logs(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<CompletionLog>> {
        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(
            "SELECT habit_uuid, completed_on
             FROM habit_logs
             WHERE completed_on >= ?1 AND completed_on <= ?2;",
        )?;
        let mut rows = stmt.query(params![format_date(start), format_date(end)])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }

        info!(
            "event=log_list module=repo status=ok start={start} end={end} count={} duration_ms={}",
            logs.len(),
            started_at.elapsed().as_millis()
        );
        Ok(logs)
    }

    fn insert_completion_log(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
    ) -> StoreResult<CompletionLog> {
        let result = self.conn.execute(
            "INSERT INTO habit_logs (habit_uuid, completed_on, created_at)
             VALUES (?1, ?2, ?3);",
            params![
                habit_id.to_string(),
                format_date(date),
                Utc::now().timestamp_millis()
            ],
        );

        match result {
            Ok(_) => {
                info!("event=log_insert module=repo status=ok habit_id={habit_id} date={date}");
                Ok(CompletionLog::new(habit_id, date))
            }
            Err(err) => {
                let mapped = match constraint_kind(&err) {
                    Some(ConstraintKind::Unique) => StoreError::DuplicateLog { habit_id, date },
                    Some(ConstraintKind::ForeignKey) => StoreError::HabitNotFound(habit_id),
                    None => StoreError::from(err),
                };
                warn!(
                    "event=log_insert module=repo status=error habit_id={habit_id} date={date} error={mapped}"
                );
                Err(mapped)
            }
        }
    }

    fn delete_completion_log(&self, habit_id: HabitId, date: NaiveDate) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM habit_logs WHERE habit_uuid = ?1 AND completed_on = ?2;",
                params![habit_id.to_string(), format_date(date)],
            )
            .map_err(|err| {
                error!(
                    "event=log_delete module=repo status=error habit_id={habit_id} date={date} error={err}"
                );
                StoreError::from(err)
            })?;

        info!(
            "event=log_delete module=repo status=ok habit_id={habit_id} date={date} removed={}",
            changed > 0
        );
        Ok(changed > 0)
    }

    fn create_habit(&self, request: &NewHabit) -> StoreResult<Habit> {
        request.validate()?;
        let request = request.normalized();
        let habit = Habit {
            id: Uuid::new_v4(),
            title: request.title,
            subtitle: request.subtitle,
            icon: request.icon,
            schedule: request.schedule,
            created_at: Utc::now().timestamp_millis(),
        };

        self.conn.execute(
            "INSERT INTO habits (uuid, title, subtitle, icon, schedule, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                habit.id.to_string(),
                habit.title.as_str(),
                habit.subtitle.as_str(),
                habit.icon.as_str(),
                habit.schedule.to_stored(),
                habit.created_at,
            ],
        )?;

        info!(
            "event=habit_create module=repo status=ok habit_id={} due_days={}",
            habit.id,
            habit.schedule.due_count()
        );
        Ok(habit)
    }
}

enum ConstraintKind {
    Unique,
    ForeignKey,
}

fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }
    match failure.extended_code {
        rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Some(ConstraintKind::Unique)
        }
        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
        _ => None,
    }
}

fn parse_habit_row(row: &Row<'_>) -> StoreResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in habits.uuid"))
    })?;
    let schedule: Option<String> = row.get("schedule")?;

    Ok(Habit {
        id,
        title: row.get("title")?,
        subtitle: row.get("subtitle")?,
        icon: row.get("icon")?,
        schedule: WeeklySchedule::from_stored(schedule.as_deref()),
        created_at: row.get("created_at")?,
    })
}

fn parse_log_row(row: &Row<'_>) -> StoreResult<CompletionLog> {
    let uuid_text: String = row.get("habit_uuid")?;
    let habit_id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in habit_logs.habit_uuid"
        ))
    })?;
    let date_text: String = row.get("completed_on")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid date value `{date_text}` in habit_logs.completed_on"
        ))
    })?;
    Ok(CompletionLog::new(habit_id, date))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
