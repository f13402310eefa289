//! Directory-backed note repository.
//!
//! # Responsibility
//! - Store each note as one `<name>.md` file inside a single directory.
//!
//! # Invariants
//! - Only regular files whose name ends in the note extension are enumerated.
//! - Enumeration order is whatever the platform directory listing yields.
//! - Subdirectories are ignored; keys never contain separators.

use crate::model::note::note_name_from_key;
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Notes stored as markdown files in one directory.
#[derive(Debug, Clone)]
pub struct FsNoteRepository {
    root: PathBuf,
}

impl FsNoteRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn unavailable(&self, reason: impl ToString) -> RepoError {
        RepoError::Unavailable {
            location: self.root.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl NoteRepository for FsNoteRepository {
    fn ensure_ready(&mut self) -> RepoResult<()> {
        if self.root.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.root).map_err(|err| self.unavailable(err))
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|err| self.unavailable(err))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| self.unavailable(err))?;
            let file_type = entry.file_type().map_err(|err| self.unavailable(err))?;
            if !file_type.is_file() {
                continue;
            }
            // Non-UTF-8 file names cannot be note names.
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            if note_name_from_key(&file_name).is_some() {
                keys.push(file_name);
            }
        }
        Ok(keys)
    }

    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(RepoError::Read {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    fn write(&mut self, key: &str, text: &str) -> RepoResult<()> {
        fs::write(self.path_for(key), text).map_err(|err| RepoError::Write {
            key: key.to_string(),
            reason: err.to_string(),
        })
    }

    fn delete(&mut self, key: &str) -> RepoResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(RepoError::NotFound(key.to_string()))
            }
            Err(err) => Err(RepoError::Write {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        Ok(self.path_for(key).is_file())
    }
}
