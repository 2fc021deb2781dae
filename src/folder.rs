//! Granted-folder capability management
//!
//! The local backend never touches the filesystem directly; it goes through
//! a revocable, permission-gated `DirAccess` handle. The handle is remembered
//! across sessions in the durable slot store and re-validated before every
//! operation, because access can be revoked out from under us between runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::backends::{BackendError, BackendResult};
use crate::errors::{AppError, AppResult};
use crate::store::{DEFAULT_FOLDER_SLOT, SlotStore};

/// Permission state for a directory handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// A permission-gated directory handle.
///
/// `query` is non-interactive and precedes every filesystem operation;
/// `request` may interact with the user and must only be invoked from a
/// user-initiated action.
pub trait DirAccess {
    /// Non-interactive permission check
    fn query(&self) -> Permission;

    /// Attempt to (re-)acquire permission
    fn request(&mut self) -> Permission;

    /// List file names in the directory (files only, no directories)
    fn list_entries(&self) -> io::Result<Vec<String>>;

    /// Read a file's full contents
    fn read_entry(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Write a file's full contents
    fn write_entry(&mut self, name: &str, data: &[u8]) -> io::Result<()>;

    /// Remove a file
    fn remove_entry(&mut self, name: &str) -> io::Result<()>;

    /// Display label for the folder
    fn label(&self) -> String;
}

/// Real-filesystem directory handle
#[derive(Debug)]
pub struct FsDirAccess {
    path: PathBuf,
}

impl FsDirAccess {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn probe(&self) -> Permission {
        if !self.path.is_dir() {
            return Permission::Denied;
        }
        match fs::read_dir(&self.path) {
            Ok(_) => Permission::Granted,
            Err(_) => Permission::Denied,
        }
    }
}

impl DirAccess for FsDirAccess {
    fn query(&self) -> Permission {
        self.probe()
    }

    fn request(&mut self) -> Permission {
        // The OS has no prompt to raise; a request is a fresh probe.
        self.probe()
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn read_entry(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path.join(name))
    }

    fn write_entry(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        fs::write(self.path.join(name), data)
    }

    fn remove_entry(&mut self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path.join(name))
    }

    fn label(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Owns the one process-wide directory capability and its persistence.
pub struct FolderAccess {
    handle: Option<Box<dyn DirAccess>>,
    store: SlotStore,
    /// Whether the durable slot has been consulted this session
    store_checked: bool,
}

impl FolderAccess {
    pub fn new(store: SlotStore) -> Self {
        Self {
            handle: None,
            store,
            store_checked: false,
        }
    }

    /// Construct with a pre-acquired handle (used by tests with mocks)
    pub fn with_handle(store: SlotStore, handle: Box<dyn DirAccess>) -> Self {
        Self {
            handle: Some(handle),
            store,
            store_checked: true,
        }
    }

    /// Select a new folder. Persists to the durable slot *before* the
    /// in-memory handle is replaced, so a crash in between leaves the
    /// previous capability intact.
    pub fn select_folder(&mut self, path: &Path) -> AppResult<()> {
        if !path.is_dir() {
            return Err(AppError::Config(format!(
                "not a directory: {}",
                path.display()
            )));
        }
        self.store
            .put(DEFAULT_FOLDER_SLOT, &path.to_string_lossy())?;
        self.handle = Some(Box::new(FsDirAccess::new(path.to_path_buf())));
        self.store_checked = true;
        Ok(())
    }

    /// Lazily restore a handle from the durable slot
    fn restore_from_store(&mut self) {
        if self.handle.is_none() && !self.store_checked {
            self.store_checked = true;
            if let Some(path) = self.store.get(DEFAULT_FOLDER_SLOT) {
                self.handle = Some(Box::new(FsDirAccess::new(PathBuf::from(path))));
            }
        }
    }

    /// Resolve a granted handle, querying permission first and issuing an
    /// interactive request only when allowed and needed.
    pub fn granted(&mut self, interactive: bool) -> BackendResult<&mut dyn DirAccess> {
        self.restore_from_store();
        let handle = self.handle.as_mut().ok_or(BackendError::NoFolder)?;
        let mut permission = handle.query();
        if permission != Permission::Granted && interactive {
            permission = handle.request();
        }
        if permission != Permission::Granted {
            return Err(BackendError::PermissionDenied(handle.label()));
        }
        Ok(handle.as_mut())
    }

    /// Whether a folder has been selected (this session or a prior one)
    pub fn has_folder(&mut self) -> bool {
        self.restore_from_store();
        self.handle.is_some()
    }

    /// Display label for the selected folder, if any
    pub fn label(&mut self) -> Option<String> {
        self.restore_from_store();
        self.handle.as_ref().map(|h| h.label())
    }

    /// Warning accumulated while opening the durable store, if any
    pub fn take_store_warning(&mut self) -> Option<String> {
        self.store.take_warning()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// In-memory `DirAccess` with scriptable permission behavior
    pub struct MockDirAccess {
        pub files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
        pub permission: Rc<RefCell<Permission>>,
        /// What `request` flips the permission to
        pub grant_on_request: bool,
    }

    impl MockDirAccess {
        pub fn granted(files: &[(&str, &str)]) -> Self {
            let map = files
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                .collect();
            Self {
                files: Rc::new(RefCell::new(map)),
                permission: Rc::new(RefCell::new(Permission::Granted)),
                grant_on_request: true,
            }
        }
    }

    impl DirAccess for MockDirAccess {
        fn query(&self) -> Permission {
            *self.permission.borrow()
        }

        fn request(&mut self) -> Permission {
            if self.grant_on_request {
                *self.permission.borrow_mut() = Permission::Granted;
            }
            *self.permission.borrow()
        }

        fn list_entries(&self) -> io::Result<Vec<String>> {
            Ok(self.files.borrow().keys().cloned().collect())
        }

        fn read_entry(&self, name: &str) -> io::Result<Vec<u8>> {
            self.files
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }

        fn write_entry(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
            self.files.borrow_mut().insert(name.to_string(), data.to_vec());
            Ok(())
        }

        fn remove_entry(&mut self, name: &str) -> io::Result<()> {
            self.files
                .borrow_mut()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }

        fn label(&self) -> String {
            "mock".to_string()
        }
    }

    /// A throwaway store in the system temp dir
    pub fn temp_store(tag: &str) -> SlotStore {
        let dir = std::env::temp_dir().join(format!(
            "satchel-folder-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        SlotStore::open(dir.join("handles.toml")).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_no_folder_selected() {
        let mut access = FolderAccess::new(temp_store("none"));
        assert!(!access.has_folder());
        assert!(matches!(
            access.granted(false),
            Err(BackendError::NoFolder)
        ));
    }

    #[test]
    fn test_denied_then_interactive_request_grants() {
        let mock = MockDirAccess::granted(&[]);
        *mock.permission.borrow_mut() = Permission::Denied;
        let mut access = FolderAccess::with_handle(temp_store("regrant"), Box::new(mock));

        // Non-interactive query alone must not re-grant
        assert!(matches!(
            access.granted(false),
            Err(BackendError::PermissionDenied(_))
        ));
        // Interactive request may
        assert!(access.granted(true).is_ok());
        // Subsequent non-interactive checks now pass
        assert!(access.granted(false).is_ok());
    }

    #[test]
    fn test_select_folder_persists_before_use() {
        let dir = std::env::temp_dir().join(format!("satchel-select-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let mut access = FolderAccess::new(temp_store("select"));
        access.select_folder(&dir).unwrap();
        assert!(access.has_folder());
        assert_eq!(access.label().unwrap(), dir.to_string_lossy());
    }

    #[test]
    fn test_select_folder_rejects_non_directory() {
        let mut access = FolderAccess::new(temp_store("reject"));
        assert!(access
            .select_folder(Path::new("/definitely/not/a/real/dir"))
            .is_err());
        assert!(!access.has_folder());
    }
}
