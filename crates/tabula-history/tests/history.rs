//! Tests for recording, undo/redo, and dataset pinning.

use tabula_history::{ClearScope, HistoryError, HistoryManager, TableProvider, TableStore};
use tabula_model::{DatasetId, Operation, Table, Value};

fn id(name: &str) -> DatasetId {
    DatasetId::new(name).unwrap()
}

fn state(dataset: &str, n: i64) -> Table {
    Table::from_records(id(dataset), vec!["n".to_string()], vec![vec![Value::from(n)]]).unwrap()
}

fn current(store: &TableStore) -> Value {
    store.active_table().unwrap().values("n").next().cloned().unwrap()
}

/// Records `count` operations that step `n` from 0 up to `count`.
fn recorded(count: i64, max: usize) -> (HistoryManager, TableStore) {
    let mut history = HistoryManager::new(max);
    for i in 0..count {
        let operation = Operation::new("step", "n").with_id(format!("op{i}"));
        history.record(operation, state("d", i), state("d", i + 1)).unwrap();
    }
    (history, TableStore::with_table(state("d", count)))
}

// =========================================================================
// Undo and redo
// =========================================================================

#[test]
fn test_undo_then_redo_restores_states() {
    let (mut history, mut store) = recorded(2, 10);
    assert_eq!(history.current_index(), Some(1));

    let undone = history.undo(&mut store).unwrap().unwrap();
    assert_eq!(undone.id, "op1");
    assert_eq!(current(&store), Value::from(1));

    history.undo(&mut store).unwrap();
    assert_eq!(current(&store), Value::from(0));
    assert_eq!(history.current_index(), None);
    assert_eq!(history.undo(&mut store).unwrap(), None);

    let redone = history.redo(&mut store).unwrap().unwrap();
    assert_eq!(redone.id, "op0");
    assert_eq!(current(&store), Value::from(1));
    assert!(history.can_redo());
}

#[test]
fn test_redo_at_the_end_is_a_no_op() {
    let (mut history, mut store) = recorded(1, 10);
    assert_eq!(history.redo(&mut store).unwrap(), None);
    assert_eq!(current(&store), Value::from(1));
}

#[test]
fn test_recording_after_undo_discards_redo_branch() {
    let (mut history, mut store) = recorded(3, 10);
    history.undo(&mut store).unwrap();
    history.undo(&mut store).unwrap();

    history
        .record(Operation::new("branch", "n"), state("d", 1), state("d", 100))
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.current_index(), Some(1));
    assert!(!history.can_redo());
    let kinds: Vec<_> = history.operations().map(|op| op.kind.as_str()).collect();
    assert_eq!(kinds, ["step", "branch"]);
}

#[test]
fn test_oldest_entries_are_evicted() {
    let (mut history, mut store) = recorded(5, 3);
    assert_eq!(history.len(), 3);
    assert_eq!(history.current_index(), Some(2));
    let ids: Vec<_> = history.operations().map(|op| op.id.as_str()).collect();
    assert_eq!(ids, ["op2", "op3", "op4"]);

    while history.undo(&mut store).unwrap().is_some() {}
    assert_eq!(current(&store), Value::from(2));
}

// =========================================================================
// Dataset pinning
// =========================================================================

#[test]
fn test_undo_refuses_other_dataset() {
    let (mut history, mut store) = recorded(1, 10);
    store.insert(state("other", 7));
    store.set_active(&id("other")).unwrap();

    let err = history.undo(&mut store).unwrap_err();
    assert_eq!(
        err,
        HistoryError::DatasetMismatch {
            snapshot: id("d"),
            active: id("other"),
        }
    );
    assert_eq!(
        err.to_string(),
        "Snapshot belongs to dataset 'd' but the active dataset is 'other'"
    );
    assert_eq!(history.current_index(), Some(0));
    assert_eq!(current(&store), Value::from(7));
    assert_eq!(store.get(&id("d")).unwrap().values("n").next(), Some(&Value::from(1)));
}

#[test]
fn test_undo_without_active_dataset() {
    let (mut history, _) = recorded(1, 10);
    let mut empty = TableStore::new();
    assert_eq!(history.undo(&mut empty).unwrap_err(), HistoryError::NoActiveDataset);
    assert_eq!(history.current_index(), Some(0));
}

#[test]
fn test_record_rejects_mixed_snapshots() {
    let mut history = HistoryManager::default();
    let err = history
        .record(Operation::new("step", "n"), state("a", 0), state("b", 1))
        .unwrap_err();
    assert!(matches!(err, HistoryError::SnapshotMismatch { .. }));
    assert!(history.is_empty());
}

// =========================================================================
// Jumping and clearing
// =========================================================================

#[test]
fn test_jump_to_restores_in_one_step() {
    let (mut history, mut store) = recorded(4, 10);
    history.jump_to(Some(0), &mut store).unwrap();
    assert_eq!(current(&store), Value::from(1));
    assert_eq!(history.current_index(), Some(0));

    history.jump_to(None, &mut store).unwrap();
    assert_eq!(current(&store), Value::from(0));

    history.jump_to(Some(3), &mut store).unwrap();
    assert_eq!(current(&store), Value::from(4));

    let err = history.jump_to(Some(9), &mut store).unwrap_err();
    assert_eq!(err, HistoryError::OutOfRange { target: 9, len: 4 });
    assert_eq!(history.current_index(), Some(3));
}

#[test]
fn test_clear_leaves_table_alone() {
    let (mut history, store) = recorded(2, 10);
    history.clear(&ClearScope::All);
    assert!(history.is_empty());
    assert!(!history.can_undo());
    assert_eq!(current(&store), Value::from(2));
}

#[test]
fn test_entries_serialize_with_snapshots() {
    let (history, _) = recorded(1, 10);
    let entry = history.entries().next().unwrap();
    let json = serde_json::to_value(entry).unwrap();
    assert_eq!(json["operation"]["type"], "step");
    assert!(json.get("beforeSnapshot").is_some());
    assert!(json.get("afterSnapshot").is_some());
}
