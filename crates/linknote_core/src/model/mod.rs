//! Domain model for the note collection.
//!
//! # Responsibility
//! - Define the canonical note record shared by store, search and graph.
//! - Own the single mapping between note names and persisted keys.
//!
//! # Invariants
//! - A note is identified by its name; the name doubles as title and link target.
//! - Persisted keys are always `name + NOTE_EXTENSION`.

pub mod note;
