//! The owned panel session: geometry, per-tab listings, the active-file
//! tracker and every load/save/delete flow. All mutation of process-wide
//! state routes through this type's operations on the single UI thread.

use std::collections::HashMap;
use std::path::Path;

use crate::backends::{
    BackendError, CloudBackend, DocEntry, DocumentBackend, LibraryBackend, LocalBackend,
    SourceKind, ensure_json_ext,
};
use crate::config::{Config, store_file};
use crate::errors::{AppError, AppResult};
use crate::folder::FolderAccess;
use crate::store::SlotStore;

use super::mode::Mode;
use super::panel::{PanelGeometry, Viewport};

/// One tab's most recent listing
#[derive(Debug, Default)]
pub struct Listing {
    pub entries: Vec<DocEntry>,
    /// Cursor position within `entries`
    pub cursor: usize,
    /// Inline message shown when the listing degraded to empty
    pub error: Option<String>,
}

impl Listing {
    fn set_entries(&mut self, entries: Vec<DocEntry>) {
        self.entries = entries;
        self.error = None;
        if self.cursor >= self.entries.len() {
            self.cursor = self.entries.len().saturating_sub(1);
        }
    }

    fn set_error(&mut self, message: String) {
        self.entries.clear();
        self.cursor = 0;
        self.error = Some(message);
    }
}

/// The most recently loaded document, tracked for highlighting and
/// prev/next navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFile {
    pub name: String,
    pub source: SourceKind,
}

/// The loaded JSON payload handed to the (out-of-scope) editor
pub struct LoadedDocument {
    pub name: String,
    pub source: SourceKind,
    pub value: serde_json::Value,
}

pub struct Session {
    pub panel: PanelGeometry,
    pub mode: Mode,
    pub config: Config,
    pub should_quit: bool,
    /// Failure side-channel: one transient status-line message
    pub status: Option<String>,
    pub active_file: Option<ActiveFile>,
    pub document: Option<LoadedDocument>,
    local: LocalBackend,
    library: Box<dyn DocumentBackend>,
    cloud: Box<dyn DocumentBackend>,
    listings: HashMap<SourceKind, Listing>,
}

impl Session {
    /// Build a session with the real backends
    pub fn new(config: Config) -> AppResult<Self> {
        let store_path =
            store_file().ok_or_else(|| AppError::Config("no config directory".to_string()))?;
        let store = SlotStore::open(store_path)?;
        let local = LocalBackend::new(FolderAccess::new(store));
        let library = Box::new(LibraryBackend::new(
            config.library.base_url.clone(),
            config.library.manifest.clone(),
        ));
        let cloud = Box::new(CloudBackend::new(config.cloud.base_url.clone()));
        Ok(Self::assemble(config, local, library, cloud))
    }

    /// Build a session with injected backends (tests use mocks)
    pub fn with_backends(
        config: Config,
        local: LocalBackend,
        library: Box<dyn DocumentBackend>,
        cloud: Box<dyn DocumentBackend>,
    ) -> Self {
        Self::assemble(config, local, library, cloud)
    }

    fn assemble(
        config: Config,
        mut local: LocalBackend,
        library: Box<dyn DocumentBackend>,
        cloud: Box<dyn DocumentBackend>,
    ) -> Self {
        let mut panel = PanelGeometry::default();
        if config.panel.remember_geometry {
            if let (Some(x), Some(y)) = (config.panel.last_x, config.panel.last_y) {
                panel.position = Some((x, y));
            }
            panel.collapsed = config.panel.last_collapsed;
            if let Some(tab) = config.panel.last_tab.as_deref().and_then(tab_from_str) {
                panel.active_tab = tab;
            }
        }
        let status = local.take_store_warning();
        let mut listings = HashMap::new();
        for kind in SourceKind::ALL {
            listings.insert(kind, Listing::default());
        }
        Self {
            panel,
            mode: Mode::Normal,
            config,
            should_quit: false,
            status,
            active_file: None,
            document: None,
            local,
            library,
            cloud,
            listings,
        }
    }

    pub fn listing(&self, kind: SourceKind) -> &Listing {
        &self.listings[&kind]
    }

    pub fn active_listing(&self) -> &Listing {
        self.listing(self.panel.active_tab)
    }

    fn listing_mut(&mut self, kind: SourceKind) -> &mut Listing {
        self.listings.get_mut(&kind).expect("all tabs have listings")
    }

    fn backend_mut(&mut self, kind: SourceKind) -> &mut dyn DocumentBackend {
        match kind {
            SourceKind::Local => &mut self.local,
            SourceKind::Library => self.library.as_mut(),
            SourceKind::Cloud => self.cloud.as_mut(),
        }
    }

    pub fn local_mut(&mut self) -> &mut LocalBackend {
        &mut self.local
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // === Panel transitions ===

    /// Open the panel and refresh the (resumed) active tab
    pub fn open_panel(&mut self, viewport: Viewport) {
        self.panel.open(viewport);
        self.refresh_active();
    }

    /// Close the panel; pending state is resumed on the next open
    pub fn close_panel(&mut self) {
        self.panel.close();
        self.remember_geometry();
    }

    /// Switch tabs, always re-fetching the target listing
    pub fn switch_tab(&mut self, tab: SourceKind) {
        self.panel.switch_tab(tab);
        self.refresh(tab);
    }

    pub fn toggle_collapse(&mut self, viewport: Viewport) {
        self.panel.toggle_collapse(viewport);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.panel.resize(viewport);
    }

    /// Snapshot geometry into the config for the next run
    pub fn remember_geometry(&mut self) {
        if !self.config.panel.remember_geometry {
            return;
        }
        if let Some((x, y)) = self.panel.position {
            self.config.panel.last_x = Some(x);
            self.config.panel.last_y = Some(y);
        }
        self.config.panel.last_collapsed = self.panel.collapsed;
        self.config.panel.last_tab = Some(tab_to_str(self.panel.active_tab).to_string());
    }

    // === Listings ===

    pub fn refresh_active(&mut self) {
        self.refresh(self.panel.active_tab);
    }

    /// Refresh one tab's listing. Failures degrade to an empty listing with
    /// an inline message; they never become hard UI errors.
    pub fn refresh(&mut self, kind: SourceKind) {
        match self.backend_mut(kind).list() {
            Ok(entries) => self.listing_mut(kind).set_entries(entries),
            Err(err) => {
                let message = listing_failure_message(kind, &err);
                self.listing_mut(kind).set_error(message.clone());
                self.set_status(message);
            }
        }
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let tab = self.panel.active_tab;
        let listing = self.listing_mut(tab);
        if listing.entries.is_empty() {
            return;
        }
        let max = listing.entries.len() as i32 - 1;
        listing.cursor = (listing.cursor as i32 + delta).clamp(0, max) as usize;
    }

    pub fn set_cursor(&mut self, index: usize) {
        let tab = self.panel.active_tab;
        let listing = self.listing_mut(tab);
        if index < listing.entries.len() {
            listing.cursor = index;
        }
    }

    // === Load / save / delete ===

    /// Load the entry under the cursor
    pub fn load_selected(&mut self) {
        let listing = self.active_listing();
        if let Some(entry) = listing.entries.get(listing.cursor).cloned() {
            self.load_entry(&entry);
        }
    }

    /// Load one entry. On success the active-file tracker is updated here,
    /// by the caller of the backend, keeping backends free of side effects
    /// on global state.
    pub fn load_entry(&mut self, entry: &DocEntry) {
        match self.backend_mut(entry.source).load(&entry.file_name) {
            Ok(value) => {
                self.document = Some(LoadedDocument {
                    name: entry.file_name.clone(),
                    source: entry.source,
                    value,
                });
                self.active_file = Some(ActiveFile {
                    name: entry.file_name.clone(),
                    source: entry.source,
                });
                self.set_status(format!(
                    "Loaded {} from {}",
                    entry.name,
                    entry.source.label()
                ));
            }
            Err(err) => {
                self.mode = Mode::Alert {
                    message: format!("Could not load {}: {}", entry.name, err),
                };
            }
        }
    }

    /// Ask for (or directly perform) deletion of the entry under the cursor
    pub fn request_delete(&mut self) {
        let tab = self.panel.active_tab;
        if !self.backend_mut(tab).can_delete() {
            self.set_status(format!("{} entries cannot be deleted", tab.label()));
            return;
        }
        let listing = self.active_listing();
        let Some(entry) = listing.entries.get(listing.cursor).cloned() else {
            return;
        };
        if self.config.confirmations.confirm_delete {
            // Default focus on No
            self.mode = Mode::ConfirmDelete { entry, focus: 1 };
        } else {
            self.perform_delete(&entry);
        }
    }

    /// Delete an entry; clears the active-file tracker only when the
    /// deleted entry is the tracked one, then re-lists the tab.
    pub fn perform_delete(&mut self, entry: &DocEntry) {
        match self.backend_mut(entry.source).delete(&entry.file_name) {
            Ok(()) => {
                let was_active = self
                    .active_file
                    .as_ref()
                    .is_some_and(|a| a.name == entry.file_name && a.source == entry.source);
                if was_active {
                    self.active_file = None;
                }
                self.set_status(format!("Deleted {}", entry.name));
                self.refresh(entry.source);
            }
            Err(err) => {
                self.mode = Mode::Alert {
                    message: format!("Could not delete {}: {}", entry.name, err),
                };
            }
        }
    }

    /// Save the loaded document under a new name to the active tab's backend
    pub fn save_document_as(&mut self, name: &str) {
        let tab = self.panel.active_tab;
        let Some(value) = self.document.as_ref().map(|d| d.value.clone()) else {
            self.set_status("No document loaded");
            return;
        };
        if !self.backend_mut(tab).can_save() {
            self.set_status(format!("{} is read-only", tab.label()));
            return;
        }
        let file_name = match tab {
            SourceKind::Cloud => name.to_string(),
            _ => ensure_json_ext(name),
        };
        match self.backend_mut(tab).save(&file_name, &value) {
            Ok(()) => {
                self.set_status(format!("Saved {} to {}", name, tab.label()));
                self.refresh(tab);
            }
            Err(err) => {
                self.mode = Mode::Alert {
                    message: format!("Could not save {}: {}", name, err),
                };
            }
        }
    }

    // === Navigation ===

    /// Step the active file forward/backward within the active tab's last
    /// listing, going through the same load path as a manual selection.
    /// Out-of-bounds steps are no-ops.
    pub fn navigate(&mut self, direction: i32) {
        let tab = self.panel.active_tab;
        let listing = self.listing(tab);
        if listing.entries.is_empty() {
            return;
        }
        // An active file from another tab counts as "before the first entry"
        let current: i32 = match self.active_file.as_ref() {
            Some(active) if active.source == tab => listing
                .entries
                .iter()
                .position(|e| e.file_name == active.name)
                .map(|i| i as i32)
                .unwrap_or(-1),
            _ => -1,
        };
        let next = current + direction;
        if next < 0 || next as usize >= listing.entries.len() {
            return;
        }
        let entry = listing.entries[next as usize].clone();
        self.set_cursor(next as usize);
        self.load_entry(&entry);
    }

    // === Folder capability ===

    /// Interactive re-grant of the local folder, from a user action
    pub fn grant_local_access(&mut self) {
        match self.local.grant() {
            Ok(()) => {
                self.set_status("Folder access granted");
                self.refresh(SourceKind::Local);
            }
            Err(err) => self.set_status(format!("Could not grant access: {}", err)),
        }
    }

    /// Select a new granted folder (persisted before first use)
    pub fn select_folder(&mut self, path: &Path) {
        match self.local.select_folder(path) {
            Ok(()) => {
                self.set_status(format!("Folder set to {}", path.display()));
                self.refresh(SourceKind::Local);
            }
            Err(err) => {
                self.mode = Mode::Alert {
                    message: format!("Could not select folder: {}", err),
                };
            }
        }
    }

    /// Persist config (geometry snapshot included) on the way out
    pub fn shutdown(&mut self) {
        self.remember_geometry();
        if let Err(e) = self.config.save() {
            eprintln!("Warning: could not save config: {}", e);
        }
    }
}

/// Inline message for a degraded listing
fn listing_failure_message(kind: SourceKind, err: &BackendError) -> String {
    match err {
        BackendError::NoFolder => "No folder selected (press f to choose one)".to_string(),
        BackendError::PermissionDenied(label) => {
            format!("Access to {} denied (press g to re-grant)", label)
        }
        BackendError::Network(_) => format!("Could not fetch {} listing", kind.label()),
        BackendError::Http { status } => {
            format!("Could not fetch {} listing (HTTP {})", kind.label(), status)
        }
        other => format!("Could not list {}: {}", kind.label(), other),
    }
}

fn tab_from_str(s: &str) -> Option<SourceKind> {
    match s {
        "local" => Some(SourceKind::Local),
        "library" => Some(SourceKind::Library),
        "cloud" => Some(SourceKind::Cloud),
        _ => None,
    }
}

fn tab_to_str(tab: SourceKind) -> &'static str {
    match tab {
        SourceKind::Local => "local",
        SourceKind::Library => "library",
        SourceKind::Cloud => "cloud",
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::backends::{BackendResult, DocEntry};
    use std::collections::HashMap;

    /// Scriptable in-memory backend for session tests
    pub struct MockBackend {
        pub kind: SourceKind,
        pub names: Vec<String>,
        pub docs: HashMap<String, serde_json::Value>,
        pub deletable: bool,
        pub fail_list: Option<BackendError>,
    }

    impl MockBackend {
        pub fn new(kind: SourceKind, names: &[&str]) -> Self {
            let docs = names
                .iter()
                .map(|n| (n.to_string(), serde_json::json!({"name": n})))
                .collect();
            Self {
                kind,
                names: names.iter().map(|n| n.to_string()).collect(),
                docs,
                deletable: true,
                fail_list: None,
            }
        }
    }

    impl DocumentBackend for MockBackend {
        fn list(&mut self) -> BackendResult<Vec<DocEntry>> {
            if let Some(err) = self.fail_list.take() {
                return Err(err);
            }
            Ok(self
                .names
                .iter()
                .map(|n| DocEntry::new(n.clone(), self.kind))
                .collect())
        }

        fn load(&mut self, file_name: &str) -> BackendResult<serde_json::Value> {
            self.docs
                .get(file_name)
                .cloned()
                .ok_or_else(|| BackendError::NotFound(file_name.to_string()))
        }

        fn save(&mut self, file_name: &str, doc: &serde_json::Value) -> BackendResult<()> {
            if !self.names.iter().any(|n| n == file_name) {
                self.names.push(file_name.to_string());
            }
            self.docs.insert(file_name.to_string(), doc.clone());
            Ok(())
        }

        fn delete(&mut self, file_name: &str) -> BackendResult<()> {
            if !self.deletable {
                return Err(BackendError::NotSupported("read-only"));
            }
            self.names.retain(|n| n != file_name);
            self.docs.remove(file_name);
            Ok(())
        }

        fn can_delete(&self) -> bool {
            self.deletable
        }

        fn can_save(&self) -> bool {
            self.deletable
        }
    }

    /// A session over mock backends; the local tab serves `local_files`
    pub fn session_with(local_files: &[(&str, &str)], tag: &str) -> Session {
        use crate::folder::FolderAccess;
        use crate::folder::mock::{MockDirAccess, temp_store};

        let mock_dir = MockDirAccess::granted(local_files);
        let local = LocalBackend::new(FolderAccess::with_handle(
            temp_store(tag),
            Box::new(mock_dir),
        ));
        let library = Box::new(MockBackend {
            deletable: false,
            ..MockBackend::new(SourceKind::Library, &["b.json", "a.json"])
        });
        let cloud = Box::new(MockBackend::new(SourceKind::Cloud, &["2024-02", "2024-01"]));
        let mut config = Config::default();
        config.panel.remember_geometry = false;
        Session::with_backends(config, local, library, cloud)
    }
}
