//! Note search entry points.
//!
//! # Responsibility
//! - Filter the in-memory note collection by a query string.
//!
//! # See also
//! - `service::note_store::NoteStore::search`

pub mod substring;
