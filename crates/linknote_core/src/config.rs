//! Runtime configuration for core entry points.
//!
//! # Responsibility
//! - Resolve the notes location, storage backend and logging settings.
//! - Apply `LINKNOTE_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - Blank environment values are ignored, not treated as overrides.

use crate::logging::default_log_level;
use crate::repo::{FsNoteRepository, NoteRepository, RepoResult, SqliteNoteRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const NOTES_DIR_ENV: &str = "LINKNOTE_NOTES_DIR";
pub const BACKEND_ENV: &str = "LINKNOTE_BACKEND";
pub const LOG_LEVEL_ENV: &str = "LINKNOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "LINKNOTE_LOG_DIR";

const DEFAULT_NOTES_DIR_NAME: &str = "linknote_notes";
const DEFAULT_LOG_DIR_NAME: &str = "linknote_logs";
/// Database file created inside the notes directory for the SQLite backend.
pub const SQLITE_FILE_NAME: &str = "notes.sqlite3";

/// Where note text is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One markdown file per note.
    #[default]
    Files,
    /// One row per note in `notes.sqlite3`.
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "files" | "fs" => Ok(Self::Files),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unknown storage backend `{value}`; expected files|sqlite")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the FFI and CLI front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub notes_dir: PathBuf,
    pub backend: StorageBackend,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            notes_dir: temp.join(DEFAULT_NOTES_DIR_NAME),
            backend: StorageBackend::default(),
            log_level: default_log_level().to_string(),
            log_dir: temp.join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to a value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(dir) = non_blank(NOTES_DIR_ENV) {
            config.notes_dir = PathBuf::from(dir);
        }
        if let Some(backend) = non_blank(BACKEND_ENV) {
            config.backend = backend.parse()?;
        }
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        if let Some(dir) = non_blank(LOG_DIR_ENV) {
            config.log_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Builds the repository selected by `backend`, rooted at `notes_dir`.
    pub fn open_repository(&self) -> RepoResult<Box<dyn NoteRepository + Send>> {
        match self.backend {
            StorageBackend::Files => Ok(Box::new(FsNoteRepository::new(&self.notes_dir))),
            StorageBackend::Sqlite => {
                let mut fs = FsNoteRepository::new(&self.notes_dir);
                fs.ensure_ready()?;
                let repo = SqliteNoteRepository::open(self.notes_dir.join(SQLITE_FILE_NAME))?;
                Ok(Box::new(repo))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, StorageBackend, BACKEND_ENV, NOTES_DIR_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (NOTES_DIR_ENV, "/data/notes"),
            (BACKEND_ENV, "SQLite"),
        ]))
        .unwrap();
        assert_eq!(config.notes_dir, PathBuf::from("/data/notes"));
        assert_eq!(config.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = CoreConfig::from_lookup(lookup_from(&[(NOTES_DIR_ENV, "   ")])).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(BACKEND_ENV, "cloud")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("cloud".to_string()));
    }

    #[test]
    fn sqlite_backend_creates_database_in_notes_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig {
            notes_dir: dir.path().join("vault"),
            backend: StorageBackend::Sqlite,
            ..CoreConfig::default()
        };
        let mut repo = config.open_repository().unwrap();
        repo.ensure_ready().unwrap();
        assert!(dir.path().join("vault").join(super::SQLITE_FILE_NAME).is_file());
    }
}
