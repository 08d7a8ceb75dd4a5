//! Linear, bounded undo/redo over table snapshots.

use std::collections::VecDeque;

use tabula_model::{DEFAULT_MAX_HISTORY_SIZE, Operation, Table};
use tracing::{debug, warn};

use crate::provider::TableProvider;
use crate::snapshot::{ColumnOperation, Snapshot};
use crate::HistoryError;

/// Which entries [`HistoryManager::clear`] removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearScope {
    All,
    /// Entries whose operation targeted this column.
    Column(String),
}

/// Records operations with before/after snapshots and moves a cursor over them.
///
/// The cursor points at the most recently applied entry, or is `None` when
/// every entry has been undone. Recording after an undo discards the redo
/// branch. When the entry count exceeds the bound, the oldest entries are
/// evicted and can no longer be undone.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: VecDeque<ColumnOperation>,
    cursor: Option<usize>,
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_SIZE)
    }
}

impl HistoryManager {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the most recently applied entry; `None` before the first.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.entries.len()
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> + '_ {
        self.entries().map(|entry| &entry.operation)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ColumnOperation> + '_ {
        self.entries.iter()
    }

    /// Records an applied operation.
    ///
    /// Both snapshots must belong to the same dataset.
    pub fn record(
        &mut self,
        operation: Operation,
        before: Table,
        after: Table,
    ) -> Result<(), HistoryError> {
        if before.id() != after.id() {
            return Err(HistoryError::SnapshotMismatch {
                before: before.id().clone(),
                after: after.id().clone(),
            });
        }
        let discarded = self.entries.len() - self.next_index();
        self.entries.truncate(self.next_index());
        self.entries.push_back(ColumnOperation {
            operation,
            before_snapshot: Snapshot::new(before),
            after_snapshot: Snapshot::new(after),
        });
        let mut evicted = 0;
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
            evicted += 1;
        }
        self.cursor = self.entries.len().checked_sub(1);
        debug!(entries = self.entries.len(), discarded, evicted, "recorded operation");
        Ok(())
    }

    fn check_dataset(
        snapshot: &Snapshot,
        provider: &dyn TableProvider,
    ) -> Result<(), HistoryError> {
        let Some(active) = provider.active_dataset_id() else {
            return Err(HistoryError::NoActiveDataset);
        };
        if &active != snapshot.dataset_id() {
            warn!(
                snapshot = %snapshot.dataset_id(),
                active = %active,
                "refusing to restore a snapshot of another dataset"
            );
            return Err(HistoryError::DatasetMismatch {
                snapshot: snapshot.dataset_id().clone(),
                active,
            });
        }
        Ok(())
    }

    /// Restores the before snapshot of the current entry and steps back.
    ///
    /// Returns the undone operation, or `None` when there is nothing to undo.
    /// On a dataset mismatch neither the table nor the cursor changes.
    pub fn undo(
        &mut self,
        provider: &mut dyn TableProvider,
    ) -> Result<Option<Operation>, HistoryError> {
        let Some(index) = self.cursor else {
            return Ok(None);
        };
        let entry = &self.entries[index];
        Self::check_dataset(&entry.before_snapshot, provider)?;
        provider.replace_table(entry.before_snapshot.data.clone())?;
        let operation = entry.operation.clone();
        self.cursor = index.checked_sub(1);
        debug!(operation = %operation.kind, index, "undid operation");
        Ok(Some(operation))
    }

    /// Restores the after snapshot of the next entry and steps forward.
    pub fn redo(
        &mut self,
        provider: &mut dyn TableProvider,
    ) -> Result<Option<Operation>, HistoryError> {
        let index = self.next_index();
        let Some(entry) = self.entries.get(index) else {
            return Ok(None);
        };
        Self::check_dataset(&entry.after_snapshot, provider)?;
        provider.replace_table(entry.after_snapshot.data.clone())?;
        let operation = entry.operation.clone();
        self.cursor = Some(index);
        debug!(operation = %operation.kind, index, "redid operation");
        Ok(Some(operation))
    }

    /// Moves the cursor to `target`, restoring the matching snapshot in one
    /// step. `None` goes back before the first entry.
    pub fn jump_to(
        &mut self,
        target: Option<usize>,
        provider: &mut dyn TableProvider,
    ) -> Result<(), HistoryError> {
        if target == self.cursor {
            return Ok(());
        }
        let snapshot = match target {
            None => match self.entries.front() {
                Some(first) => &first.before_snapshot,
                None => return Ok(()),
            },
            Some(index) => match self.entries.get(index) {
                Some(entry) => &entry.after_snapshot,
                None => {
                    return Err(HistoryError::OutOfRange {
                        target: index,
                        len: self.entries.len(),
                    });
                }
            },
        };
        Self::check_dataset(snapshot, provider)?;
        provider.replace_table(snapshot.data.clone())?;
        self.cursor = target;
        Ok(())
    }

    /// Drops entries without touching the active table.
    pub fn clear(&mut self, scope: &ClearScope) {
        match scope {
            ClearScope::All => {
                self.entries.clear();
                self.cursor = None;
            }
            ClearScope::Column(column) => {
                let applied = self.next_index();
                let mut kept_applied: usize = 0;
                let mut index = 0;
                self.entries.retain(|entry| {
                    let keep = entry.operation.column_name != *column;
                    if keep && index < applied {
                        kept_applied += 1;
                    }
                    index += 1;
                    keep
                });
                self.cursor = kept_applied.checked_sub(1);
            }
        }
    }
}
