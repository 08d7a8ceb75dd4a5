//! Editing session: snapshot, transform, record.

use tabula_history::{ClearScope, HistoryError, HistoryManager, TableProvider};
use tabula_model::{EditorOptions, Operation, TransformResult};
use tabula_transform::dispatch;
use tracing::{info, warn};

/// An editing session over one table provider.
///
/// `apply` runs an operation against the active table: the table before the
/// operation is kept as the undo snapshot, the transformed table replaces the
/// active one, and both are recorded. Failed operations leave the provider
/// and the history untouched.
#[derive(Debug)]
pub struct EditorSession<P: TableProvider> {
    provider: P,
    history: HistoryManager,
}

impl<P: TableProvider> EditorSession<P> {
    pub fn new(provider: P, options: &EditorOptions) -> Self {
        Self {
            provider,
            history: HistoryManager::new(options.max_history_size),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn apply(&mut self, operation: Operation) -> TransformResult {
        let Some(before) = self.provider.active_table() else {
            return TransformResult::failed(HistoryError::NoActiveDataset.to_string());
        };
        let result = dispatch(&before, &operation);
        let Some(after) = result.data.clone().filter(|_| result.success) else {
            return result;
        };
        if let Err(error) = self.provider.replace_table(after.clone()) {
            return TransformResult::failed(error.to_string());
        }
        let label = operation.label();
        if let Err(error) = self.history.record(operation, before.clone(), after) {
            warn!(%error, "could not record operation, restoring previous table");
            if let Err(restore) = self.provider.replace_table(before) {
                warn!(error = %restore, "could not restore previous table");
            }
            return TransformResult::failed(error.to_string());
        }
        info!(operation = %label, entries = self.history.len(), "applied operation");
        result
    }

    /// Applies operations in order, stopping at the first failure.
    ///
    /// Returns the results of every operation attempted.
    pub fn apply_all(
        &mut self,
        operations: impl IntoIterator<Item = Operation>,
    ) -> Vec<TransformResult> {
        let mut results = Vec::new();
        for operation in operations {
            let result = self.apply(operation);
            let failed = !result.success;
            results.push(result);
            if failed {
                break;
            }
        }
        results
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<Option<Operation>, HistoryError> {
        self.history.undo(&mut self.provider)
    }

    pub fn redo(&mut self) -> Result<Option<Operation>, HistoryError> {
        self.history.redo(&mut self.provider)
    }

    pub fn jump_to(&mut self, target: Option<usize>) -> Result<(), HistoryError> {
        self.history.jump_to(target, &mut self.provider)
    }

    pub fn clear_history(&mut self, scope: &ClearScope) {
        self.history.clear(scope);
    }
}
