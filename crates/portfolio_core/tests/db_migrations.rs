use portfolio_core::db::migrations::latest_version;
use portfolio_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "slots");
    assert_table_exists(&conn, "documents");
}

#[test]
fn reopening_database_keeps_slot_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portfolio.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2);",
            ["portfolioData", "{}"],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let value: String = conn_second
        .query_row(
            "SELECT value FROM slots WHERE key = 'portfolioData';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "{}");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 999);
}

#[test]
fn current_version_without_backend_tables_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gutted.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::MissingTable("slots")), "{err}");
}

#[test]
fn partially_migrated_database_gets_remaining_steps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE slots (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL);
         INSERT INTO slots (key, value) VALUES ('portfolioData', '{}');
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "documents");
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
