//! Persistence collaborators for the note store.
//!
//! # Responsibility
//! - Define the key/text storage contract (`NoteRepository`).
//! - Provide directory, SQLite and in-memory implementations.
//!
//! # Invariants
//! - Repositories return semantic errors (`NotFound`, `Unavailable`, `Write`)
//!   rather than raw transport errors wherever the caller must branch on them.

pub mod fs_repo;
pub mod memory_repo;
pub mod note_repo;
pub mod sqlite_repo;

pub use fs_repo::FsNoteRepository;
pub use memory_repo::MemoryNoteRepository;
pub use note_repo::{NoteRepository, RepoError, RepoResult};
pub use sqlite_repo::SqliteNoteRepository;
