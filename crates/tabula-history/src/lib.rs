//! Undo/redo history for Tabula tables.
//!
//! Every applied operation is recorded with the table state before and after
//! it ran. Undo and redo restore those states through a [`TableProvider`],
//! refusing to restore a snapshot onto a different dataset.
//!
//! # Example
//!
//! ```
//! use tabula_history::{HistoryManager, TableProvider, TableStore};
//! use tabula_model::{DatasetId, Operation, Table, Value};
//!
//! let id = DatasetId::new("sales").unwrap();
//! let table = |id: DatasetId, n: i64| {
//!     Table::from_records(id, vec!["n".into()], vec![vec![Value::from(n)]]).unwrap()
//! };
//! let before = table(id.clone(), 1);
//! let after = table(id, 2);
//!
//! let mut store = TableStore::with_table(after.clone());
//! let mut history = HistoryManager::new(10);
//! history.record(Operation::new("numeric_transform", "n"), before.clone(), after).unwrap();
//!
//! history.undo(&mut store).unwrap();
//! assert_eq!(store.active_table(), Some(before));
//! ```

mod error;
mod manager;
mod provider;
mod snapshot;

pub use error::HistoryError;
pub use manager::{ClearScope, HistoryManager};
pub use provider::{TableProvider, TableStore};
pub use snapshot::{ColumnOperation, Snapshot};
