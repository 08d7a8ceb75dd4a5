//! Editing sessions for Tabula.
//!
//! [`EditorSession`] owns a [`TableProvider`] and a
//! [`HistoryManager`](tabula_history::HistoryManager). Applying an operation
//! dispatches it against the active table and records the before and after
//! states so the change can be undone.

pub mod session;

pub use session::EditorSession;
pub use tabula_history::{ClearScope, HistoryError, TableProvider, TableStore};
