//! Modal dialog states

use crate::backends::DocEntry;

/// What the UI is currently doing besides showing the panel
#[derive(Debug, Clone, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Ask before deleting an entry; focus 0 = Yes, 1 = No
    ConfirmDelete { entry: DocEntry, focus: usize },
    /// Path input for selecting the granted folder
    SelectFolder { input: String, cursor: usize },
    /// Name input for saving the loaded document to the active tab's backend
    SaveAs { input: String, cursor: usize },
    /// Blocking alert for a failed interactive operation
    Alert { message: String },
}

impl Mode {
    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }
}
