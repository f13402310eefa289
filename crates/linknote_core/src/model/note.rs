//! Note domain model.
//!
//! # Responsibility
//! - Define the `Note` record and name validation rules.
//! - Convert between note names and repository keys.
//!
//! # Invariants
//! - `note_key` and `note_name_from_key` are the only places the extension is
//!   appended or stripped; link resolution relies on the same suffix.
//! - Names never contain path separators, so a key stays inside its collection.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suffix appended to a note name to form its persisted key.
pub const NOTE_EXTENSION: &str = ".md";

/// Name of the note synthesized when the collection is empty.
pub const WELCOME_NOTE_NAME: &str = "welcome";

/// Content of the seed note. Carries a sample link so the graph view has
/// something to show on first launch.
pub const WELCOME_CONTENT: &str = "# Welcome\n\n\
This is your first note. Write markdown here and link other notes by name,\n\
like [[ideas]]. Links to notes that do not exist yet are kept in the text\n\
and show up in the graph as soon as the target note is saved.\n";

/// A named unit of markdown text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique name, also used as display title and link target.
    pub name: String,
    /// Raw markdown source.
    pub content: String,
}

impl Note {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Repository key for this note.
    pub fn key(&self) -> String {
        note_key(&self.name)
    }
}

/// Rejected note name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteNameError {
    Empty,
    PathSeparator(String),
    NulByte(String),
}

impl Display for NoteNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "note name cannot be empty"),
            Self::PathSeparator(name) => {
                write!(f, "note name `{name}` must not contain path separators")
            }
            Self::NulByte(name) => write!(f, "note name `{name}` must not contain NUL"),
        }
    }
}

impl Error for NoteNameError {}

/// Checks that `name` can be used as a note identifier.
///
/// Valid names are stored exactly as given; no trimming is applied.
pub fn validate_note_name(name: &str) -> Result<(), NoteNameError> {
    if name.trim().is_empty() {
        return Err(NoteNameError::Empty);
    }
    if name.contains(['/', '\\']) {
        return Err(NoteNameError::PathSeparator(name.to_string()));
    }
    if name.contains('\0') {
        return Err(NoteNameError::NulByte(name.to_string()));
    }
    Ok(())
}

/// Maps a note name to its repository key.
pub fn note_key(name: &str) -> String {
    format!("{name}{NOTE_EXTENSION}")
}

/// Maps a repository key back to a note name.
///
/// Returns `None` for keys that do not carry the note extension, or whose
/// name part is empty.
pub fn note_name_from_key(key: &str) -> Option<&str> {
    key.strip_suffix(NOTE_EXTENSION)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_name_are_inverse() {
        let key = note_key("daily log");
        assert_eq!(key, "daily log.md");
        assert_eq!(note_name_from_key(&key), Some("daily log"));
    }

    #[test]
    fn name_from_key_rejects_foreign_files() {
        assert_eq!(note_name_from_key("image.png"), None);
        assert_eq!(note_name_from_key(".md"), None);
    }

    #[test]
    fn validate_rejects_blank_and_separators() {
        assert_eq!(validate_note_name("  "), Err(NoteNameError::Empty));
        assert!(matches!(
            validate_note_name("../escape"),
            Err(NoteNameError::PathSeparator(_))
        ));
        assert!(matches!(
            validate_note_name("a\\b"),
            Err(NoteNameError::PathSeparator(_))
        ));
        assert!(validate_note_name("Meeting notes 2024").is_ok());
    }

    #[test]
    fn welcome_content_links_somewhere() {
        assert!(WELCOME_CONTENT.contains("[["));
    }
}
