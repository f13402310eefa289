//! Core domain logic for LinkNote.
//! This crate is the single source of truth for note, search and link-graph
//! invariants; UI shells consume it through `linknote_ffi`.

pub mod config;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, CoreConfig, StorageBackend};
pub use graph::layout::{FruchtermanReingold, GraphLayout, LayoutConfig, NodePosition};
pub use graph::link_graph::{
    build_link_graph, extract_link_targets, GraphNode, LinkEdge, LinkGraph,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{
    note_key, note_name_from_key, validate_note_name, Note, NoteNameError, NOTE_EXTENSION,
    WELCOME_CONTENT, WELCOME_NOTE_NAME,
};
pub use repo::{
    FsNoteRepository, MemoryNoteRepository, NoteRepository, RepoError, RepoResult,
    SqliteNoteRepository,
};
pub use search::substring::search_notes;
pub use service::note_store::{CurrentNote, NoteStore, SharedNoteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
