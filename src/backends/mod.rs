//! Document storage backends
//!
//! Backends expose a uniform list/load/save/delete contract over:
//! - A user-granted local directory (read/write)
//! - The bundled content library served over HTTP (read-only)
//! - A remote key-value store behind a REST proxy (read/write)

mod cloud;
mod library;
mod local;

pub use cloud::CloudBackend;
pub use library::LibraryBackend;
pub use local::LocalBackend;

use thiserror::Error;

/// Error type for backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}")]
    Http { status: u16 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Malformed document: {0}")]
    Parse(String),
    #[error("No folder selected")]
    NoFolder,
    #[error("Not supported: {0}")]
    NotSupported(&'static str),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Which storage source an entry or tab refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Local,
    Library,
    Cloud,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Local, SourceKind::Library, SourceKind::Cloud];

    /// Tab label for display
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Local => "Local",
            SourceKind::Library => "Library",
            SourceKind::Cloud => "Cloud",
        }
    }
}

/// A single listed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    /// Display name (extension stripped)
    pub name: String,
    /// Which backend this entry belongs to
    pub source: SourceKind,
    /// Backend identifier (file name or store key), recomputed on every list
    pub file_name: String,
}

impl DocEntry {
    pub fn new(file_name: impl Into<String>, source: SourceKind) -> Self {
        let file_name = file_name.into();
        Self {
            name: display_name(&file_name).to_string(),
            source,
            file_name,
        }
    }
}

/// Trait for document storage backends.
///
/// `list` failures are degraded by the session to an empty listing plus a
/// status message; they are never surfaced as hard UI errors.
pub trait DocumentBackend {
    /// List available documents, in this backend's contractual order:
    /// Local ascending (case-folded), Library manifest order (or ascending
    /// in fallback mode), Cloud descending by key (newest-first).
    fn list(&mut self) -> BackendResult<Vec<DocEntry>>;

    /// Load a whole document
    fn load(&mut self, file_name: &str) -> BackendResult<serde_json::Value>;

    /// Write a whole document
    fn save(&mut self, file_name: &str, doc: &serde_json::Value) -> BackendResult<()>;

    /// Delete a document. Idempotent: deleting a missing entry succeeds.
    fn delete(&mut self, file_name: &str) -> BackendResult<()>;

    /// Whether this backend supports delete (Library does not)
    fn can_delete(&self) -> bool;

    /// Whether this backend supports save
    fn can_save(&self) -> bool;
}

/// Strip a trailing `.json` (any case) for display
pub fn display_name(file_name: &str) -> &str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".json") {
        &file_name[..file_name.len() - 5]
    } else {
        file_name
    }
}

/// True if the name looks like a JSON document
pub fn is_json_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".json")
}

/// Append `.json` unless the name already carries it
pub fn ensure_json_ext(name: &str) -> String {
    if is_json_name(name) {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}

/// Case-folded ascending sort used by Local and the Library fallback
pub fn sort_ascending(names: &mut [String]) {
    names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
}

/// Descending key sort used by Cloud (keys are assumed chronological,
/// so this reads as newest-first)
pub fn sort_descending(names: &mut [String]) {
    names.sort_by(|a, b| b.to_lowercase().cmp(&a.to_lowercase()).then_with(|| b.cmp(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_json() {
        assert_eq!(display_name("notes.json"), "notes");
        assert_eq!(display_name("Notes.JSON"), "Notes");
        assert_eq!(display_name("readme.txt"), "readme.txt");
        assert_eq!(display_name("plain"), "plain");
    }

    #[test]
    fn test_ensure_json_ext() {
        assert_eq!(ensure_json_ext("notes"), "notes.json");
        assert_eq!(ensure_json_ext("notes.json"), "notes.json");
        assert_eq!(ensure_json_ext("Notes.JSON"), "Notes.JSON");
    }

    #[test]
    fn test_sort_ascending_case_folded() {
        let mut names = vec!["Zoo.json".to_string(), "apple.json".to_string(), "Mango.json".to_string()];
        sort_ascending(&mut names);
        assert_eq!(names, vec!["apple.json", "Mango.json", "Zoo.json"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut keys = vec!["2024-01".to_string(), "2024-03".to_string(), "2024-02".to_string()];
        sort_descending(&mut keys);
        assert_eq!(keys, vec!["2024-03", "2024-02", "2024-01"]);
    }
}
