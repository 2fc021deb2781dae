//! Application state modules

pub mod mode;
pub mod panel;
pub mod session;

pub use mode::Mode;
pub use session::Session;
