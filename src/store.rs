//! Durable single-slot store for the granted-folder capability
//!
//! A small versioned TOML file holding one logical table of named slots.
//! Older files written before the slots table existed are upgraded in
//! place when opened.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Current schema version. Version 1 predates the slots table.
const SCHEMA_VERSION: i64 = 2;

/// Slot under which the granted folder path is remembered
pub const DEFAULT_FOLDER_SLOT: &str = "default_folder";

const LOCK_RETRIES: u32 = 20;
const LOCK_WAIT: Duration = Duration::from_millis(250);

/// Persistent named-slot store backed by a TOML file
pub struct SlotStore {
    path: PathBuf,
    doc: toml_edit::DocumentMut,
    warning: Option<String>,
}

impl SlotStore {
    /// Open (or create) the store at `path`, upgrading older schemas.
    ///
    /// If another session holds the store lock, waits for it to be released
    /// rather than failing; the wait is reported as a non-fatal warning.
    pub fn open(path: PathBuf) -> AppResult<Self> {
        let warning = wait_for_lock(&path);

        let doc = match fs::read_to_string(&path) {
            Ok(content) => content
                .parse::<toml_edit::DocumentMut>()
                .unwrap_or_default(),
            Err(_) => toml_edit::DocumentMut::new(),
        };

        let version = doc
            .get("version")
            .and_then(|v| v.as_integer())
            .unwrap_or(0);

        let mut store = Self { path, doc, warning };

        // Upgrade: add the missing slots table and stamp the current version.
        if version < SCHEMA_VERSION || store.doc.get("slots").is_none() {
            store.doc["version"] = toml_edit::value(SCHEMA_VERSION);
            if store.doc.get("slots").is_none() {
                store.doc["slots"] = toml_edit::Item::Table(toml_edit::Table::new());
            }
            store.write()?;
        }

        Ok(store)
    }

    /// Warning accumulated while opening (e.g. a lock wait), if any
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    /// Read a slot value
    pub fn get(&self, slot: &str) -> Option<String> {
        self.doc
            .get("slots")
            .and_then(|t| t.get(slot))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Write a slot value (overwrite semantics), persisting immediately
    pub fn put(&mut self, slot: &str, value: &str) -> AppResult<()> {
        self.doc["slots"][slot] = toml_edit::value(value);
        self.write()
    }

    fn write(&self) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| AppError::Store(format!("cannot create store dir: {}", e)))?;
        }
        let lock = lock_path(&self.path);
        let _ = fs::write(&lock, std::process::id().to_string());
        let result = fs::write(&self.path, self.doc.to_string())
            .map_err(|e| AppError::Store(format!("cannot write store: {}", e)));
        let _ = fs::remove_file(&lock);
        result
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut p = path.as_os_str().to_os_string();
    p.push(".lock");
    PathBuf::from(p)
}

/// Wait for a concurrent session's lock to clear. Returns a warning to show
/// if a wait happened. A lock that never clears is treated as stale.
fn wait_for_lock(path: &Path) -> Option<String> {
    let lock = lock_path(path);
    if !lock.exists() {
        return None;
    }
    for _ in 0..LOCK_RETRIES {
        thread::sleep(LOCK_WAIT);
        if !lock.exists() {
            return Some("Waited for another session to release the folder store".to_string());
        }
    }
    // Stale lock left behind by a crashed session
    let _ = fs::remove_file(&lock);
    Some("Ignored a stale folder store lock".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "satchel-store-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join("handles.toml")
    }

    #[test]
    fn test_put_get_roundtrip() {
        let path = temp_store_path("roundtrip");
        let mut store = SlotStore::open(path.clone()).unwrap();
        assert_eq!(store.get(DEFAULT_FOLDER_SLOT), None);

        store.put(DEFAULT_FOLDER_SLOT, "/tmp/docs").unwrap();
        assert_eq!(store.get(DEFAULT_FOLDER_SLOT).as_deref(), Some("/tmp/docs"));

        // Reopen and read back
        let store = SlotStore::open(path).unwrap();
        assert_eq!(store.get(DEFAULT_FOLDER_SLOT).as_deref(), Some("/tmp/docs"));
    }

    #[test]
    fn test_overwrite_semantics() {
        let path = temp_store_path("overwrite");
        let mut store = SlotStore::open(path).unwrap();
        store.put(DEFAULT_FOLDER_SLOT, "/old").unwrap();
        store.put(DEFAULT_FOLDER_SLOT, "/new").unwrap();
        assert_eq!(store.get(DEFAULT_FOLDER_SLOT).as_deref(), Some("/new"));
    }

    #[test]
    fn test_upgrades_old_schema() {
        let path = temp_store_path("upgrade");
        // A version-1 file without the slots table
        fs::write(&path, "version = 1\n").unwrap();

        let mut store = SlotStore::open(path.clone()).unwrap();
        assert_eq!(store.get(DEFAULT_FOLDER_SLOT), None);
        store.put(DEFAULT_FOLDER_SLOT, "/docs").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("version = 2"));
        assert!(content.contains("[slots]"));
    }

    #[test]
    fn test_open_missing_file_creates_schema() {
        let path = temp_store_path("fresh");
        let store = SlotStore::open(path.clone()).unwrap();
        assert_eq!(store.get("anything"), None);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("version = 2"));
    }
}
