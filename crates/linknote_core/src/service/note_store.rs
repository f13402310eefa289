//! Note store: the working set of notes and the current selection.
//!
//! # Responsibility
//! - Mediate every read/write through a `NoteRepository`.
//! - Keep the in-memory collection in sync after each mutation.
//! - Track the currently opened note and its content buffer.
//!
//! # Invariants
//! - After `list_notes` succeeds the collection is never empty: an empty
//!   repository is seeded with the `welcome` note.
//! - Keys that cannot be read as UTF-8 text, or whose names `open`/`delete`
//!   would reject, are skipped with a warning instead of failing the listing.
//! - If the current note is no longer in the collection, the current name and
//!   content are cleared together.
//! - In-memory selection changes only after the repository confirmed the
//!   write; a failed `save` or `delete` leaves it untouched.
//! - Mutations take `&mut self`; share a store through `SharedNoteStore` to
//!   get one writer at a time.

use crate::graph::link_graph::{build_link_graph, LinkGraph};
use crate::model::note::{
    note_key, note_name_from_key, validate_note_name, Note, NoteNameError, WELCOME_CONTENT,
    WELCOME_NOTE_NAME,
};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::search::substring::search_notes;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store shared between threads, guarded by a single writer lock.
pub type SharedNoteStore<R> = Arc<RwLock<NoteStore<R>>>;

/// Error kinds surfaced by note store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Backing collection cannot be reached or enumerated.
    StorageUnavailable(RepoError),
    /// `open`/`delete` on a name that does not resolve.
    NoteNotFound(String),
    /// Persisting a save or delete failed. Call `list_notes` to resync.
    StorageWriteError(RepoError),
    /// Name rejected before reaching storage.
    InvalidNoteName(NoteNameError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::NoteNotFound(name) => write!(f, "note not found: {name}"),
            Self::StorageWriteError(err) => write!(f, "storage write failed: {err}"),
            Self::InvalidNoteName(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) | Self::StorageWriteError(err) => Some(err),
            Self::InvalidNoteName(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<NoteNameError> for StoreError {
    fn from(value: NoteNameError) -> Self {
        Self::InvalidNoteName(value)
    }
}

/// The note currently opened in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentNote {
    pub name: String,
    pub content: String,
}

/// Owner of the note collection and the current selection.
pub struct NoteStore<R: NoteRepository> {
    repo: R,
    notes: Vec<Note>,
    current: Option<CurrentNote>,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Creates a store with an empty, not yet loaded collection.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notes: Vec::new(),
            current: None,
        }
    }

    /// Creates a store and performs the initial `list_notes` load.
    pub fn load(repo: R) -> StoreResult<Self> {
        let mut store = Self::new(repo);
        store.list_notes()?;
        Ok(store)
    }

    /// Wraps the store for shared use behind one `RwLock`.
    pub fn into_shared(self) -> SharedNoteStore<R> {
        Arc::new(RwLock::new(self))
    }

    /// Last loaded collection, in repository order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn current(&self) -> Option<&CurrentNote> {
        self.current.as_ref()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|current| current.name.as_str())
    }

    pub fn current_content(&self) -> Option<&str> {
        self.current.as_ref().map(|current| current.content.as_str())
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    /// Reloads the whole collection from the repository.
    ///
    /// Seeds the `welcome` note when the repository is empty.
    ///
    /// # Errors
    /// - `StorageUnavailable` when the repository cannot be prepared,
    ///   enumerated or read.
    /// - `StorageWriteError` when the seed note cannot be written.
    pub fn list_notes(&mut self) -> StoreResult<&[Note]> {
        let started_at = Instant::now();
        self.repo
            .ensure_ready()
            .map_err(StoreError::StorageUnavailable)?;

        let mut notes = self.load_collection()?;
        if notes.is_empty() {
            self.repo
                .write(&note_key(WELCOME_NOTE_NAME), WELCOME_CONTENT)
                .map_err(StoreError::StorageWriteError)?;
            info!("event=notes_seed module=store status=ok");
            notes = self.load_collection()?;
        }

        self.notes = notes;
        self.drop_stale_current();
        info!(
            "event=notes_list module=store status=ok count={} duration_ms={}",
            self.notes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(&self.notes)
    }

    /// Reads one note and makes it current.
    pub fn open(&mut self, name: &str) -> StoreResult<String> {
        validate_note_name(name)?;
        let content = self
            .repo
            .read(&note_key(name))
            .map_err(StoreError::StorageUnavailable)?
            .ok_or_else(|| StoreError::NoteNotFound(name.to_string()))?;

        self.current = Some(CurrentNote {
            name: name.to_string(),
            content: content.clone(),
        });
        Ok(content)
    }

    /// Creates or overwrites one note, makes it current, then resyncs.
    ///
    /// There is no conflict detection: saving an existing name replaces its
    /// content even if it was never opened.
    pub fn save(&mut self, name: &str, content: &str) -> StoreResult<()> {
        validate_note_name(name)?;
        if let Err(err) = self.repo.write(&note_key(name), content) {
            warn!("event=note_save module=store status=error error={err}");
            return Err(StoreError::StorageWriteError(err));
        }

        self.current = Some(CurrentNote {
            name: name.to_string(),
            content: content.to_string(),
        });
        info!(
            "event=note_save module=store status=ok bytes={}",
            content.len()
        );
        self.list_notes()?;
        Ok(())
    }

    /// Removes one note, clears the selection if it was current, then resyncs.
    ///
    /// Deleting the last note leaves an empty repository, which the resync
    /// seeds with `welcome` again.
    pub fn delete(&mut self, name: &str) -> StoreResult<()> {
        validate_note_name(name)?;
        match self.repo.delete(&note_key(name)) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => return Err(StoreError::NoteNotFound(name.to_string())),
            Err(err) => {
                warn!("event=note_delete module=store status=error error={err}");
                return Err(StoreError::StorageWriteError(err));
            }
        }

        if self.current_name() == Some(name) {
            self.current = None;
        }
        info!("event=note_delete module=store status=ok");
        self.list_notes()?;
        Ok(())
    }

    /// Notes whose name or content contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        search_notes(&self.notes, query)
    }

    /// Fresh link graph over the current collection.
    pub fn link_graph(&self) -> LinkGraph {
        build_link_graph(&self.notes)
    }

    /// Distinct names of notes linking to `name`, in collection order.
    pub fn backlinks(&self, name: &str) -> Vec<String> {
        let graph = self.link_graph();
        let mut sources: Vec<String> = Vec::new();
        for source in graph.incoming(name) {
            if !sources.iter().any(|known| known == source) {
                sources.push(source.to_string());
            }
        }
        sources
    }

    fn load_collection(&self) -> StoreResult<Vec<Note>> {
        let keys = self
            .repo
            .list_keys()
            .map_err(StoreError::StorageUnavailable)?;
        let mut notes = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(name) = note_name_from_key(&key) else {
                continue;
            };
            // Names open/delete would reject stay out of the collection.
            if validate_note_name(name).is_err() {
                warn!("event=notes_list module=store status=skip reason=invalid_name");
                continue;
            }
            // A key can vanish between enumeration and read.
            match self.repo.read(&key) {
                Ok(Some(content)) => notes.push(Note::new(name, content)),
                Ok(None) => {}
                Err(RepoError::Read { reason, .. }) => {
                    warn!(
                        "event=notes_list module=store status=skip reason=unreadable error={reason}"
                    );
                }
                Err(err) => return Err(StoreError::StorageUnavailable(err)),
            }
        }
        Ok(notes)
    }

    fn drop_stale_current(&mut self) {
        let stale = self
            .current
            .as_ref()
            .is_some_and(|current| !self.notes.iter().any(|note| note.name == current.name));
        if stale {
            self.current = None;
        }
    }
}
