//! Local granted-folder backend

use std::io;
use std::path::Path;

use super::{
    BackendError, BackendResult, DocEntry, DocumentBackend, SourceKind, is_json_name,
    sort_ascending,
};
use crate::errors::AppResult;
use crate::folder::FolderAccess;

/// Backend over the user-granted local directory.
///
/// Listing re-validates permission non-interactively so a silently revoked
/// grant degrades to the re-grant affordance; load/save/delete run from a
/// user action and may raise an interactive request.
pub struct LocalBackend {
    access: FolderAccess,
}

impl LocalBackend {
    pub fn new(access: FolderAccess) -> Self {
        Self { access }
    }

    /// Select a new folder (persisted before use)
    pub fn select_folder(&mut self, path: &Path) -> AppResult<()> {
        self.access.select_folder(path)
    }

    /// Interactive re-grant, from an explicit user action
    pub fn grant(&mut self) -> BackendResult<()> {
        self.access.granted(true).map(|_| ())
    }

    pub fn folder_label(&mut self) -> Option<String> {
        self.access.label()
    }

    pub fn take_store_warning(&mut self) -> Option<String> {
        self.access.take_store_warning()
    }

    fn map_io(name: &str, err: io::Error) -> BackendError {
        match err.kind() {
            io::ErrorKind::NotFound => BackendError::NotFound(name.to_string()),
            io::ErrorKind::PermissionDenied => BackendError::PermissionDenied(name.to_string()),
            _ => BackendError::Io(err),
        }
    }
}

impl DocumentBackend for LocalBackend {
    fn list(&mut self) -> BackendResult<Vec<DocEntry>> {
        let dir = self.access.granted(false)?;
        let mut names: Vec<String> = dir
            .list_entries()?
            .into_iter()
            .filter(|n| is_json_name(n))
            .collect();
        sort_ascending(&mut names);
        Ok(names
            .into_iter()
            .map(|n| DocEntry::new(n, SourceKind::Local))
            .collect())
    }

    fn load(&mut self, file_name: &str) -> BackendResult<serde_json::Value> {
        let dir = self.access.granted(true)?;
        let data = dir
            .read_entry(file_name)
            .map_err(|e| Self::map_io(file_name, e))?;
        serde_json::from_slice(&data).map_err(|e| BackendError::Parse(e.to_string()))
    }

    fn save(&mut self, file_name: &str, doc: &serde_json::Value) -> BackendResult<()> {
        let dir = self.access.granted(true)?;
        let data = serde_json::to_vec_pretty(doc).map_err(|e| BackendError::Parse(e.to_string()))?;
        dir.write_entry(file_name, &data)
            .map_err(|e| Self::map_io(file_name, e))
    }

    fn delete(&mut self, file_name: &str) -> BackendResult<()> {
        let dir = self.access.granted(true)?;
        match dir.remove_entry(file_name) {
            Ok(()) => Ok(()),
            // Deleting something already gone is not an error
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::map_io(file_name, e)),
        }
    }

    fn can_delete(&self) -> bool {
        true
    }

    fn can_save(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder::Permission;
    use crate::folder::mock::{MockDirAccess, temp_store};

    fn backend_with(files: &[(&str, &str)], tag: &str) -> LocalBackend {
        let mock = MockDirAccess::granted(files);
        LocalBackend::new(FolderAccess::with_handle(temp_store(tag), Box::new(mock)))
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let mut backend = backend_with(
            &[
                ("Zebra.json", "{}"),
                ("apple.json", "{}"),
                ("notes.txt", "x"),
                ("mango.json", "{}"),
                ("image.png", "x"),
            ],
            "list",
        );
        let entries = backend.list().unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["apple.json", "mango.json", "Zebra.json"]);
        assert!(entries.iter().all(|e| e.source == SourceKind::Local));
        assert_eq!(entries[0].name, "apple");
    }

    #[test]
    fn test_list_denied_permission() {
        let mock = MockDirAccess::granted(&[("a.json", "{}")]);
        *mock.permission.borrow_mut() = Permission::Denied;
        let mut backend =
            LocalBackend::new(FolderAccess::with_handle(temp_store("denied"), Box::new(mock)));
        assert!(matches!(
            backend.list(),
            Err(BackendError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_load_parses_json() {
        let mut backend = backend_with(&[("doc.json", r#"{"k": 1}"#)], "load");
        let value = backend.load("doc.json").unwrap();
        assert_eq!(value["k"], 1);
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let mut backend = backend_with(&[("bad.json", "not json")], "parse");
        assert!(matches!(
            backend.load("bad.json"),
            Err(BackendError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let mut backend = backend_with(&[], "missing");
        assert!(matches!(
            backend.load("ghost.json"),
            Err(BackendError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_roundtrip() {
        let mut backend = backend_with(&[], "save");
        let doc = serde_json::json!({"title": "hello"});
        backend.save("new.json", &doc).unwrap();
        assert_eq!(backend.load("new.json").unwrap(), doc);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut backend = backend_with(&[("doc.json", "{}")], "delete");
        backend.delete("doc.json").unwrap();
        backend.delete("doc.json").unwrap();
        assert!(backend.list().unwrap().is_empty());
    }
}
