use linknote_core::db::migrations::{apply_migrations, latest_version};
use linknote_core::db::{open_db, DbError};
use linknote_core::{NoteRepository, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn reopening_database_keeps_notes_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    {
        let mut repo = SqliteNoteRepository::open(&path).unwrap();
        repo.write("kept.md", "still here").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteNoteRepository::try_new(conn).unwrap();
    assert_eq!(repo.read("kept.md").unwrap().as_deref(), Some("still here"));
}

#[test]
fn applying_migrations_twice_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO notes (key, content, position) VALUES ('a.md', 'x', 1);",
        [],
    )
    .unwrap();

    apply_migrations(&mut conn).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
