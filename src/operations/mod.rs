//! Read-only operations behind the CLI's informational commands.

pub mod history;
pub mod supported;

pub use history::{list_history, HistoryResult};
pub use supported::{list_supported, SupportedResult};
