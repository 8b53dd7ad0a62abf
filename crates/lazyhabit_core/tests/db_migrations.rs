use lazyhabit_core::db::migrations::latest_version;
use lazyhabit_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().expect("open in-memory db");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "habits");
    assert_table_exists(&conn, "habit_logs");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("lazyhabit.db");

    let conn_first = open_db(&path).expect("open db file");
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).expect("open db file");
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "habit_logs");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).expect("open raw sqlite file");
    conn.execute_batch("PRAGMA user_version = 999;").expect("execute raw sql");
    drop(conn);

    let err = open_db(&path).expect_err("newer schema must be rejected");
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .expect("query pragma");
    assert_eq!(enabled, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("query pragma")
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .expect("query sqlite_master");
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
