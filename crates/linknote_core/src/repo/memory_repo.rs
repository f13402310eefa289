//! In-memory note repository.
//!
//! Keeps keys in insertion order; overwriting a key keeps its position.
//! Failure switches let callers exercise the store's error paths.

use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};

const MEMORY_LOCATION: &str = "memory";

#[derive(Debug, Clone, Default)]
pub struct MemoryNoteRepository {
    entries: Vec<(String, String)>,
    fail_writes: bool,
    fail_listing: bool,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-filled with `(key, text)` pairs.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut repo = Self::new();
        for (key, text) in entries {
            repo.upsert(key.into(), text.into());
        }
        repo
    }

    /// Makes subsequent writes and deletes fail with `RepoError::Write`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Makes subsequent readiness checks and listings fail with
    /// `RepoError::Unavailable`.
    pub fn set_fail_listing(&mut self, fail: bool) {
        self.fail_listing = fail;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(current, _)| current == key)
    }

    fn upsert(&mut self, key: String, text: String) {
        match self.position(&key) {
            Some(index) => self.entries[index].1 = text,
            None => self.entries.push((key, text)),
        }
    }

    fn check_listing(&self) -> RepoResult<()> {
        if self.fail_listing {
            return Err(RepoError::Unavailable {
                location: MEMORY_LOCATION.to_string(),
                reason: "listing disabled".to_string(),
            });
        }
        Ok(())
    }

    fn check_write(&self, key: &str) -> RepoResult<()> {
        if self.fail_writes {
            return Err(RepoError::Write {
                key: key.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        Ok(())
    }
}

impl NoteRepository for MemoryNoteRepository {
    fn ensure_ready(&mut self) -> RepoResult<()> {
        self.check_listing()
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        self.check_listing()?;
        Ok(self.entries.iter().map(|(key, _)| key.clone()).collect())
    }

    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.position(key).map(|index| self.entries[index].1.clone()))
    }

    fn write(&mut self, key: &str, text: &str) -> RepoResult<()> {
        self.check_write(key)?;
        self.upsert(key.to_string(), text.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> RepoResult<()> {
        let index = self
            .position(key)
            .ok_or_else(|| RepoError::NotFound(key.to_string()))?;
        self.check_write(key)?;
        self.entries.remove(index);
        Ok(())
    }

    fn exists(&self, key: &str) -> RepoResult<bool> {
        Ok(self.position(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryNoteRepository;
    use crate::repo::note_repo::NoteRepository;

    #[test]
    fn overwrite_keeps_insertion_position() {
        let mut repo = MemoryNoteRepository::with_entries([("b.md", "1"), ("a.md", "2")]);
        repo.write("b.md", "3").unwrap();

        assert_eq!(repo.list_keys().unwrap(), vec!["b.md", "a.md"]);
        assert_eq!(repo.read("b.md").unwrap().as_deref(), Some("3"));
    }
}
