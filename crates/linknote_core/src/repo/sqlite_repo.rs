//! SQLite-backed note repository.
//!
//! # Responsibility
//! - Persist note keys and text in the `notes` table.
//!
//! # Invariants
//! - Enumeration follows insertion order (`position ASC`).
//! - Overwriting a key keeps its original position.
//! - The connection must be migrated before the repository is built.

use crate::db::migrations::latest_version;
use crate::db::{open_db, open_db_in_memory};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SQLITE_LOCATION: &str = "sqlite:notes";

/// Notes stored as rows of a single SQLite table.
pub struct SqliteNoteRepository {
    conn: Connection,
}

impl SqliteNoteRepository {
    /// Wraps a connection that already went through `db::open_db*`.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(RepoError::Unavailable {
                location: SQLITE_LOCATION.to_string(),
                reason: format!(
                    "expected schema version {}, got {version}",
                    latest_version()
                ),
            });
        }
        Ok(Self { conn })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn ensure_ready(&mut self) -> RepoResult<()> {
        self.conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|err| RepoError::Unavailable {
                location: SQLITE_LOCATION.to_string(),
                reason: err.to_string(),
            })
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        let unavailable = |err: rusqlite::Error| RepoError::Unavailable {
            location: SQLITE_LOCATION.to_string(),
            reason: err.to_string(),
        };
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM notes ORDER BY position ASC;")
            .map_err(unavailable)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;
        Ok(keys)
    }

    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        self.conn
            .query_row("SELECT content FROM notes WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|err| RepoError::Read {
                key: key.to_string(),
                reason: err.to_string(),
            })
    }

    fn write(&mut self, key: &str, text: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO notes (key, content, position)
                 VALUES (?1, ?2, (SELECT COALESCE(MAX(position), 0) + 1 FROM notes))
                 ON CONFLICT(key) DO UPDATE SET content = excluded.content;",
                params![key, text],
            )
            .map(|_| ())
            .map_err(|err| RepoError::Write {
                key: key.to_string(),
                reason: err.to_string(),
            })
    }

    fn delete(&mut self, key: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE key = ?1;", [key])
            .map_err(|err| RepoError::Write {
                key: key.to_string(),
                reason: err.to_string(),
            })?;
        if changed == 0 {
            return Err(RepoError::NotFound(key.to_string()));
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE key = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteNoteRepository;
    use crate::repo::note_repo::{NoteRepository, RepoError};
    use rusqlite::Connection;

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteNoteRepository::try_new(conn).err().unwrap();
        assert!(matches!(err, RepoError::Unavailable { .. }));
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut repo = SqliteNoteRepository::open_in_memory().unwrap();
        repo.write("z.md", "1").unwrap();
        repo.write("a.md", "2").unwrap();
        repo.write("z.md", "3").unwrap();

        assert_eq!(repo.list_keys().unwrap(), vec!["z.md", "a.md"]);
        assert_eq!(repo.read("z.md").unwrap().as_deref(), Some("3"));
        assert!(repo.exists("a.md").unwrap());
    }
}
