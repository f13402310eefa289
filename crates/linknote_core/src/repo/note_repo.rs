//! Note persistence contract.
//!
//! # Responsibility
//! - Define the key/text storage collaborator the note store depends on.
//! - Map storage failures onto semantic error kinds.
//!
//! # Invariants
//! - Keys are note keys (`name + NOTE_EXTENSION`), never raw names.
//! - `write` is create-or-overwrite; there is no conflict detection.
//! - `list_keys` returns keys in backing order; callers must not assume sorting.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Backing collection cannot be created, reached or enumerated.
    Unavailable { location: String, reason: String },
    /// Key is absent from the backing collection.
    NotFound(String),
    /// Key exists (or was listed) but its text could not be read.
    Read { key: String, reason: String },
    /// Write or delete was rejected by the backing collection.
    Write { key: String, reason: String },
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { location, reason } => {
                write!(f, "note storage `{location}` unavailable: {reason}")
            }
            Self::NotFound(key) => write!(f, "note key not found: {key}"),
            Self::Read { key, reason } => write!(f, "failed to read `{key}`: {reason}"),
            Self::Write { key, reason } => write!(f, "failed to write `{key}`: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key/text storage collaborator backing a note store.
pub trait NoteRepository {
    /// Checks that the backing collection exists, creating it when possible.
    fn ensure_ready(&mut self) -> RepoResult<()>;
    /// Enumerates every stored key in backing order.
    fn list_keys(&self) -> RepoResult<Vec<String>>;
    /// Reads one key; `None` when absent.
    fn read(&self, key: &str) -> RepoResult<Option<String>>;
    /// Creates or overwrites one key.
    fn write(&mut self, key: &str, text: &str) -> RepoResult<()>;
    /// Removes one key; `NotFound` when absent.
    fn delete(&mut self, key: &str) -> RepoResult<()>;
    /// Returns whether one key is present.
    fn exists(&self, key: &str) -> RepoResult<bool> {
        Ok(self.read(key)?.is_some())
    }
}

impl<R: NoteRepository + ?Sized> NoteRepository for Box<R> {
    fn ensure_ready(&mut self) -> RepoResult<()> {
        (**self).ensure_ready()
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        (**self).list_keys()
    }

    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, text: &str) -> RepoResult<()> {
        (**self).write(key, text)
    }

    fn delete(&mut self, key: &str) -> RepoResult<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        (**self).exists(key)
    }
}
