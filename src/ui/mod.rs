//! UI widgets and layout

pub mod dialog;
pub mod layout;
mod panel;
mod preview;
mod status;
mod theme;

pub use dialog::{AlertDialog, ConfirmDialog, InputDialog};
pub use panel::PanelWidget;
pub use preview::PreviewPane;
pub use status::StatusBar;
pub use theme::Theme;
