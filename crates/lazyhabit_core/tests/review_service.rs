use chrono::NaiveDate;
use lazyhabit_core::db::open_db_in_memory;
use lazyhabit_core::{
    CompletionLog, CountingPolicy, DayStatus, Habit, HabitId, HabitStore, NewHabit,
    ReviewError, ReviewService, SqliteHabitStore, StoreError, StoreResult, WeeklySchedule,
    INSUFFICIENT_DATA,
};
use std::cell::Cell;

fn oct(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).expect("valid calendar date")
}

/// Store whose reads fail after listing habits, counting how far it got.
struct FlakyStore {
    fail_habits: bool,
    log_calls: Cell<usize>,
}

impl HabitStore for FlakyStore {
    fn list_habits(&self) -> StoreResult<Vec<Habit>> {
        if self.fail_habits {
            return Err(StoreError::Unavailable("habits offline".to_string()));
        }
        Ok(Vec::new())
    }

    fn list_completion_logs(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> StoreResult<Vec<CompletionLog>> {
        self.log_calls.set(self.log_calls.get() + 1);
        Err(StoreError::Unavailable("logs offline".to_string()))
    }

    fn insert_completion_log(
        &self,
        _habit_id: HabitId,
        _date: NaiveDate,
    ) -> StoreResult<CompletionLog> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn delete_completion_log(&self, _habit_id: HabitId, _date: NaiveDate) -> StoreResult<bool> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn create_habit(&self, _request: &NewHabit) -> StoreResult<Habit> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}

#[test]
fn habit_fetch_failure_aborts_before_logs_are_read() {
    let store = FlakyStore {
        fail_habits: true,
        log_calls: Cell::new(0),
    };
    let service = ReviewService::new(&store, CountingPolicy::AllLogs);

    let err = service.weekly_review(oct(15)).expect_err("review should fail");

    assert!(matches!(err, ReviewError::Store(StoreError::Unavailable(_))));
    assert_eq!(store.log_calls.get(), 0);
}

#[test]
fn log_fetch_failure_aborts_monthly_review() {
    let store = FlakyStore {
        fail_habits: false,
        log_calls: Cell::new(0),
    };
    let service = ReviewService::new(&store, CountingPolicy::AllLogs);

    assert!(service.monthly_review(oct(15)).is_err());
    assert!(service.week_board(oct(15)).is_err());
    assert_eq!(store.log_calls.get(), 2);
}

#[test]
fn weekly_review_reads_fresh_sqlite_snapshot() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let service = ReviewService::new(SqliteHabitStore::new(&conn), CountingPolicy::AllLogs);
    let gym = service
        .create_habit(&NewHabit::new("Gym").with_schedule(WeeklySchedule::new([
            true, false, true, false, true, false, false,
        ])))
        .expect("create habit");

    let empty = service.weekly_review(oct(15)).expect("weekly review");
    assert_eq!(empty.report.consistency, 0);
    assert_eq!(empty.best_day_message(), INSUFFICIENT_DATA);

    service.toggle(gym.id, oct(12)).expect("toggle should succeed");
    service.toggle(gym.id, oct(14)).expect("toggle should succeed");

    let review = service.weekly_review(oct(18)).expect("weekly review");
    assert_eq!(review.report.window.start(), oct(12));
    assert_eq!(review.report.consistency, 67);
    assert_eq!(review.report.day(oct(12)).expect("day inside window").status, DayStatus::High);
    assert_eq!(review.best_day_message(), "Monday is your best day");
}

#[test]
fn monthly_review_lays_out_calendar() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let service = ReviewService::new(SqliteHabitStore::new(&conn), CountingPolicy::AllLogs);
    let read = service.create_habit(&NewHabit::new("Read")).expect("create habit");
    service.toggle(read.id, oct(1)).expect("toggle should succeed");

    let review = service.monthly_review(oct(18)).expect("monthly review");

    assert_eq!(review.title, "October 2026");
    assert_eq!((review.year, review.month), (2026, 10));
    // 2026-10-01 is a Thursday.
    assert_eq!(review.leading_empty_slots, 4);
    assert_eq!(review.total_days(), 31);
    assert_eq!(review.cells[0].day, 1);
    assert_eq!(review.cells[0].status, DayStatus::High);
    assert_eq!(review.cells[1].status, DayStatus::None);
    assert_eq!(review.score(), 3);
    assert_eq!(review.report.active_days, 1);
}

#[test]
fn week_board_credits_only_due_days() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let service = ReviewService::new(SqliteHabitStore::new(&conn), CountingPolicy::AllLogs);
    let gym = service
        .create_habit(
            &NewHabit::new("Gym")
                .with_icon("Dumbbell")
                .with_schedule(WeeklySchedule::new([
                    true, false, true, false, true, false, false,
                ])),
        )
        .expect("create habit");
    service.toggle(gym.id, oct(12)).expect("toggle should succeed");
    service.toggle(gym.id, oct(13)).expect("toggle should succeed");

    let board = service.week_board(oct(15)).expect("week board");
    let row = board.row(gym.id).expect("board row for habit");

    assert_eq!(row.checked[..2], [true, true]);
    assert_eq!(row.progress, 33);
    assert_eq!(board.success_rate, 33);
    assert_eq!(board.total_opportunities, 3);
}

#[test]
fn scheduled_only_policy_ignores_off_schedule_logs() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let gym = store
        .create_habit(&NewHabit::new("Gym").with_schedule(WeeklySchedule::new([
            true, false, true, false, true, false, false,
        ])))
        .expect("create habit");
    store.insert_completion_log(gym.id, oct(13)).expect("insert completion log");

    let all = ReviewService::new(store, CountingPolicy::AllLogs)
        .weekly_review(oct(15))
        .expect("weekly review");
    let scheduled = ReviewService::new(store, CountingPolicy::ScheduledOnly)
        .weekly_review(oct(15))
        .expect("weekly review");

    assert_eq!(all.report.active_days, 1);
    assert_eq!(all.report.total_completed, 1);
    assert_eq!(scheduled.report.active_days, 0);
    assert_eq!(scheduled.report.total_completed, 0);
    assert_eq!(scheduled.best_day_message(), INSUFFICIENT_DATA);
}

#[test]
fn toggle_through_service_reports_store_failure() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let service = ReviewService::new(SqliteHabitStore::new(&conn), CountingPolicy::AllLogs);

    let err = service.toggle(uuid::Uuid::new_v4(), oct(12)).expect_err("toggle should fail");

    assert!(matches!(err, ReviewError::Toggle(_)));
}
