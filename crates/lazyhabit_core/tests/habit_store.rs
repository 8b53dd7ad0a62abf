use chrono::NaiveDate;
use lazyhabit_core::db::open_db_in_memory;
use lazyhabit_core::{
    HabitStore, HabitValidationError, NewHabit, SqliteHabitStore, StoreError, WeeklySchedule,
};
use rusqlite::params;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

#[test]
fn create_habit_applies_defaults_and_lists_in_creation_order() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);

    let first = store
        .create_habit(&NewHabit::new("  Meditate  ").with_icon("Brain"))
        .expect("create habit");
    let second = store
        .create_habit(
            &NewHabit::new("Gym")
                .with_subtitle("Health")
                .with_schedule(WeeklySchedule::new([
                    true, false, true, false, true, false, false,
                ])),
        )
        .expect("create habit");

    assert_eq!(first.title, "Meditate");
    assert_eq!(first.subtitle, "Personal");
    assert_eq!(first.schedule, WeeklySchedule::every_day());

    let habits = store.list_habits().expect("list habits");
    assert_eq!(habits.len(), 2);
    assert_eq!(habits[0], first);
    assert_eq!(habits[1], second);
    assert_eq!(
        store
            .get_habit(second.id)
            .expect("get habit")
            .expect("habit should exist")
            .schedule
            .days(),
        [true, false, true, false, true, false, false]
    );
}

#[test]
fn create_habit_rejects_blank_title() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);

    let err = store.create_habit(&NewHabit::new("   ")).expect_err("blank title must be rejected");
    assert!(matches!(
        err,
        StoreError::Validation(HabitValidationError::EmptyTitle)
    ));
    assert!(store.list_habits().expect("list habits").is_empty());
}

#[test]
fn duplicate_completion_log_is_rejected() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let habit = store.create_habit(&NewHabit::new("Read")).expect("create habit");
    let day = date(2026, 10, 12);

    store.insert_completion_log(habit.id, day).expect("insert completion log");
    let err = store.insert_completion_log(habit.id, day).expect_err("insert should fail");
    assert!(matches!(
        err,
        StoreError::DuplicateLog { habit_id, date } if habit_id == habit.id && date == day
    ));
    assert_eq!(store.list_completion_logs(day, day).expect("list completion logs").len(), 1);
}

#[test]
fn completion_log_for_unknown_habit_is_rejected() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let ghost = Uuid::new_v4();

    let err = store
        .insert_completion_log(ghost, date(2026, 10, 12))
        .expect_err("insert should fail");
    assert!(matches!(err, StoreError::HabitNotFound(id) if id == ghost));
}

#[test]
fn deleting_missing_completion_log_is_a_noop() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let habit = store.create_habit(&NewHabit::new("Read")).expect("create habit");
    let day = date(2026, 10, 12);

    assert!(!store.delete_completion_log(habit.id, day).expect("delete completion log"));
    store.insert_completion_log(habit.id, day).expect("insert completion log");
    assert!(store.delete_completion_log(habit.id, day).expect("delete completion log"));
    assert!(store.list_completion_logs(day, day).expect("list completion logs").is_empty());
}

#[test]
fn completion_log_range_is_inclusive() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let habit = store.create_habit(&NewHabit::new("Read")).expect("create habit");
    for day in [11, 12, 15, 18, 19] {
        store
            .insert_completion_log(habit.id, date(2026, 10, day))
            .expect("insert completion log");
    }

    let mut dates = store
        .list_completion_logs(date(2026, 10, 12), date(2026, 10, 18))
        .expect("list completion logs")
        .into_iter()
        .map(|log| log.date)
        .collect::<Vec<_>>();
    dates.sort();
    assert_eq!(
        dates,
        vec![date(2026, 10, 12), date(2026, 10, 15), date(2026, 10, 18)]
    );
}

#[test]
fn malformed_or_missing_schedule_reads_as_never_due() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let broken = store.create_habit(&NewHabit::new("Broken")).expect("create habit");
    let missing = store.create_habit(&NewHabit::new("Missing")).expect("create habit");
    let short = store.create_habit(&NewHabit::new("Short")).expect("create habit");

    conn.execute(
        "UPDATE habits SET schedule = 'not json' WHERE uuid = ?1;",
        params![broken.id.to_string()],
    )
    .expect("execute raw sql");
    conn.execute(
        "UPDATE habits SET schedule = NULL WHERE uuid = ?1;",
        params![missing.id.to_string()],
    )
    .expect("execute raw sql");
    conn.execute(
        "UPDATE habits SET schedule = '{\"days\":[true,true]}' WHERE uuid = ?1;",
        params![short.id.to_string()],
    )
    .expect("execute raw sql");

    for habit in store.list_habits().expect("list habits") {
        assert!(habit.schedule.is_never(), "{} should be never due", habit.title);
    }
}

#[test]
fn deleting_a_habit_cascades_to_its_logs() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let store = SqliteHabitStore::new(&conn);
    let habit = store.create_habit(&NewHabit::new("Read")).expect("create habit");
    let day = date(2026, 10, 12);
    store.insert_completion_log(habit.id, day).expect("insert completion log");

    conn.execute(
        "DELETE FROM habits WHERE uuid = ?1;",
        params![habit.id.to_string()],
    )
    .expect("execute raw sql");
    assert!(store.list_completion_logs(day, day).expect("list completion logs").is_empty());
}
