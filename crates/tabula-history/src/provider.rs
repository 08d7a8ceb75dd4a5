//! Access to the active table.
//!
//! The history manager never owns the data it restores. It goes through a
//! [`TableProvider`], which lets an application keep tables wherever it likes
//! and lets tests substitute an in-memory [`TableStore`].

use std::collections::BTreeMap;

use tabula_model::{DatasetId, Table};

use crate::HistoryError;

/// Source and sink of the active table.
pub trait TableProvider {
    /// Identity of the active table, if any.
    fn active_dataset_id(&self) -> Option<DatasetId>;

    /// The active table. Clones share row storage with the provider's copy.
    fn active_table(&self) -> Option<Table>;

    /// Replaces the dataset identified by `table.id()` with `table`.
    fn replace_table(&mut self, table: Table) -> Result<(), HistoryError>;
}

/// In-memory tables keyed by dataset id, with one active dataset.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: BTreeMap<DatasetId, Table>,
    active: Option<DatasetId>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `table` as the active dataset.
    pub fn with_table(table: Table) -> Self {
        let mut store = Self::new();
        store.insert(table);
        store
    }

    /// Adds or replaces a table. The first table inserted becomes active.
    pub fn insert(&mut self, table: Table) {
        let id = table.id().clone();
        if self.active.is_none() {
            self.active = Some(id.clone());
        }
        self.tables.insert(id, table);
    }

    pub fn set_active(&mut self, id: &DatasetId) -> Result<(), HistoryError> {
        if !self.tables.contains_key(id) {
            return Err(HistoryError::UnknownDataset(id.clone()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    pub fn get(&self, id: &DatasetId) -> Option<&Table> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableProvider for TableStore {
    fn active_dataset_id(&self) -> Option<DatasetId> {
        self.active.clone()
    }

    fn active_table(&self) -> Option<Table> {
        self.active.as_ref().and_then(|id| self.tables.get(id)).cloned()
    }

    fn replace_table(&mut self, table: Table) -> Result<(), HistoryError> {
        let Some(slot) = self.tables.get_mut(table.id()) else {
            return Err(HistoryError::UnknownDataset(table.id().clone()));
        };
        *slot = table;
        Ok(())
    }
}
