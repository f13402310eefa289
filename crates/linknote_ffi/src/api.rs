//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note store, search and link-graph use-cases to Dart via FRB.
//! - Flatten core errors into stable response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One process-wide store serves every call; mutations are serialized by
//!   its mutex.
//! - Store location comes from `CoreConfig::from_env` on first use.

use linknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, FruchtermanReingold, GraphLayout, LayoutConfig, Note, NoteRepository, NoteStore,
    StoreError,
};
use log::error;
use once_cell::sync::OnceCell;
use std::sync::Mutex;

type FfiStore = NoteStore<Box<dyn NoteRepository + Send>>;

static STORE: OnceCell<Mutex<FfiStore>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One note as shown in the drawer and search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub name: String,
    pub content: String,
}

/// List/search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub ok: bool,
    /// Notes in store order (empty on failure).
    pub items: Vec<NoteItem>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

/// Open-note response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContentResponse {
    pub ok: bool,
    pub name: String,
    /// Note content; empty on failure.
    pub content: String,
    /// Stable error code (`note_not_found`, `storage_unavailable`, ...) or
    /// empty on success.
    pub error_code: String,
    pub message: String,
}

/// Generic mutation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub error_code: String,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error_code: String::new(),
            message: message.into(),
        }
    }

    fn failure(operation: &str, err: &StoreError) -> Self {
        Self {
            ok: false,
            error_code: error_code(err).to_string(),
            message: format!("{operation} failed: {err}"),
        }
    }
}

/// Current selection snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentNoteItem {
    pub name: String,
    pub content: String,
}

/// Graph node for the render shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNodeItem {
    pub name: String,
    pub isolated: bool,
}

/// Directed graph edge for the render shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdgeItem {
    pub source: String,
    pub target: String,
}

/// Positioned graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPositionItem {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub isolated: bool,
}

/// Link graph response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphResponse {
    pub ok: bool,
    pub nodes: Vec<GraphNodeItem>,
    pub edges: Vec<GraphEdgeItem>,
    /// Filled only by `link_graph_layout`.
    pub positions: Vec<GraphPositionItem>,
    pub message: String,
}

impl GraphResponse {
    fn failure(message: String) -> Self {
        Self {
            ok: false,
            nodes: Vec::new(),
            edges: Vec::new(),
            positions: Vec::new(),
            message,
        }
    }
}

/// Reloads and returns the full note collection.
///
/// # FFI contract
/// - Seeds the `welcome` note on an empty store.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NotesResponse {
    let result = with_store(|store| Ok(store.list_notes()?.iter().map(to_note_item).collect()));
    notes_response("notes_list", result)
}

/// Filters the loaded collection by case-insensitive substring.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_search(query: String) -> NotesResponse {
    let result = with_store(|store| {
        Ok(store
            .search(query.as_str())
            .into_iter()
            .map(to_note_item)
            .collect())
    });
    notes_response("notes_search", result)
}

/// Opens one note and makes it current.
#[flutter_rust_bridge::frb(sync)]
pub fn note_open(name: String) -> NoteContentResponse {
    match with_store(|store| store.open(name.as_str())) {
        Ok(content) => NoteContentResponse {
            ok: true,
            name,
            content,
            error_code: String::new(),
            message: String::new(),
        },
        Err(err) => NoteContentResponse {
            ok: false,
            error_code: error_code(&err).to_string(),
            message: format!("note_open failed: {err}"),
            name,
            content: String::new(),
        },
    }
}

/// Creates or overwrites one note.
///
/// # FFI contract
/// - Blind overwrite; no conflict detection.
/// - On failure the current note is left as it was.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(name: String, content: String) -> ActionResponse {
    match with_store(|store| store.save(name.as_str(), content.as_str())) {
        Ok(()) => ActionResponse::success("Note saved."),
        Err(err) => ActionResponse::failure("note_save", &err),
    }
}

/// Deletes one note; deleting a missing note reports `note_not_found`.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(name: String) -> ActionResponse {
    match with_store(|store| store.delete(name.as_str())) {
        Ok(()) => ActionResponse::success("Note deleted."),
        Err(err) => ActionResponse::failure("note_delete", &err),
    }
}

/// Returns the current selection, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn current_note() -> Option<CurrentNoteItem> {
    with_store(|store| {
        Ok(store.current().map(|current| CurrentNoteItem {
            name: current.name.clone(),
            content: current.content.clone(),
        }))
    })
    .ok()
    .flatten()
}

/// Distinct names of notes linking to `name`; empty on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn note_backlinks(name: String) -> Vec<String> {
    with_store(|store| Ok(store.backlinks(name.as_str()))).unwrap_or_default()
}

/// Returns the link graph of the loaded collection.
#[flutter_rust_bridge::frb(sync)]
pub fn link_graph() -> GraphResponse {
    graph_response(None)
}

/// Returns the link graph plus Fruchterman-Reingold positions.
///
/// Zero or negative dimensions fall back to the layout defaults.
#[flutter_rust_bridge::frb(sync)]
pub fn link_graph_layout(iterations: u32, width: f64, height: f64) -> GraphResponse {
    let defaults = LayoutConfig::default();
    let config = LayoutConfig {
        iterations,
        width: if width > 0.0 { width } else { defaults.width },
        height: if height > 0.0 { height } else { defaults.height },
        ..defaults
    };
    graph_response(Some(config))
}

fn graph_response(layout: Option<LayoutConfig>) -> GraphResponse {
    let result = with_store(|store| Ok(store.link_graph()));
    let graph = match result {
        Ok(graph) => graph,
        Err(err) => return GraphResponse::failure(format!("link_graph failed: {err}")),
    };

    let positions = layout
        .map(|config| {
            FruchtermanReingold::new(config)
                .layout(&graph)
                .into_iter()
                .map(|position| GraphPositionItem {
                    name: position.name,
                    x: position.x,
                    y: position.y,
                    isolated: position.isolated,
                })
                .collect()
        })
        .unwrap_or_default();

    GraphResponse {
        ok: true,
        nodes: graph
            .nodes()
            .iter()
            .map(|node| GraphNodeItem {
                name: node.name.clone(),
                isolated: node.isolated,
            })
            .collect(),
        edges: graph
            .edges()
            .iter()
            .map(|edge| GraphEdgeItem {
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect(),
        positions,
        message: format!(
            "{} note(s), {} link(s).",
            graph.nodes().len(),
            graph.edges().len()
        ),
    }
}

fn notes_response(operation: &str, result: Result<Vec<NoteItem>, StoreError>) -> NotesResponse {
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NotesResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => NotesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn with_store<T>(f: impl FnOnce(&mut FfiStore) -> Result<T, StoreError>) -> Result<T, StoreError> {
    let store = STORE.get_or_try_init(|| -> Result<Mutex<FfiStore>, StoreError> {
        let config = CoreConfig::from_env().map_err(|err| {
            StoreError::StorageUnavailable(linknote_core::RepoError::Unavailable {
                location: "config".to_string(),
                reason: err.to_string(),
            })
        })?;
        let repo = config
            .open_repository()
            .map_err(StoreError::StorageUnavailable)?;
        Ok(Mutex::new(NoteStore::load(repo)?))
    });
    let store = match store {
        Ok(store) => store,
        Err(err) => {
            error!("event=ffi_store_init module=ffi status=error error={err}");
            return Err(err);
        }
    };

    // Poisoned locks are recovered; the next resync rebuilds the collection.
    let mut guard = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        name: note.name.clone(),
        content: note.content.clone(),
    }
}

fn error_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::StorageUnavailable(_) => "storage_unavailable",
        StoreError::NoteNotFound(_) => "note_not_found",
        StoreError::StorageWriteError(_) => "storage_write_error",
        StoreError::InvalidNoteName(_) => "invalid_note_name",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, link_graph, link_graph_layout, note_backlinks,
        note_delete, note_open, note_save, notes_list, notes_search, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn save_open_search_and_delete_flow() {
        let name = unique_token("ffi-note");
        let marker = unique_token("Marker");

        let saved = note_save(name.clone(), format!("body {marker}"));
        assert!(saved.ok, "{}", saved.message);

        let listed = notes_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.name == name));

        let found = notes_search(marker.to_lowercase());
        assert!(found.items.iter().any(|item| item.name == name));

        let opened = note_open(name.clone());
        assert!(opened.ok, "{}", opened.message);
        assert_eq!(opened.content, format!("body {marker}"));

        let deleted = note_delete(name.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let again = note_delete(name);
        assert!(!again.ok);
        assert_eq!(again.error_code, "note_not_found");
    }

    #[test]
    fn open_missing_note_reports_not_found() {
        let response = note_open(unique_token("missing"));
        assert!(!response.ok);
        assert_eq!(response.error_code, "note_not_found");
        assert!(response.content.is_empty());
    }

    #[test]
    fn invalid_name_is_rejected() {
        let response = note_save("../escape".to_string(), "x".to_string());
        assert!(!response.ok);
        assert_eq!(response.error_code, "invalid_note_name");
    }

    #[test]
    fn graph_and_backlinks_reflect_saved_links() {
        let target = unique_token("ffi-target");
        let source = unique_token("ffi-source");
        assert!(note_save(target.clone(), "target".to_string()).ok);
        assert!(note_save(source.clone(), format!("see [[{target}]]")).ok);

        let graph = link_graph();
        assert!(graph.ok, "{}", graph.message);
        assert!(graph
            .edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target));
        assert_eq!(note_backlinks(target.clone()), vec![source.clone()]);

        let laid_out = link_graph_layout(10, 200.0, 100.0);
        assert_eq!(laid_out.positions.len(), laid_out.nodes.len());

        assert!(note_delete(source).ok);
        assert!(note_delete(target).ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
