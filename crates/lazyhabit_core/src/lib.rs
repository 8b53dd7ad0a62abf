//! Core domain logic for LazyHabit.
//! Habit schedules, completion logs and the consistency aggregation engine.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use engine::aggregate::{
    round_percent, BestDay, CountingPolicy, DayStat, WindowAggregator, WindowReport,
};
pub use engine::board::{build_week_board, HabitWeekRow, WeekBoard};
pub use engine::log_index::CompletionLogIndex;
pub use engine::status::DayStatus;
pub use engine::toggle::{ToggleCoordinator, ToggleError, ToggleOutcome};
pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingError, UnsupportedLogLevel,
};
pub use model::completion::CompletionLog;
pub use model::habit::{Habit, HabitId, HabitValidationError, NewHabit};
pub use model::icon::HabitIcon;
pub use model::schedule::{ScheduleParseError, WeeklySchedule, WEEKDAY_LABELS};
pub use model::window::DateWindow;
pub use repo::habit_store::{HabitStore, SqliteHabitStore, StoreError, StoreResult};
pub use service::review_service::{
    CalendarCell, MonthlyReview, ReviewError, ReviewService, WeeklyReview, INSUFFICIENT_DATA,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
