//! Tests for editing sessions.

use serde_json::json;
use tabula_core::{EditorSession, TableProvider, TableStore};
use tabula_model::{DatasetId, EditorOptions, Operation, Table, Value};

fn prices() -> Table {
    Table::from_records(
        DatasetId::new("prices").unwrap(),
        vec!["item".to_string(), "price".to_string()],
        vec![
            vec![Value::text(" pen "), Value::Number(2.5)],
            vec![Value::text("ink"), Value::Number(3.5)],
        ],
    )
    .unwrap()
}

fn session() -> EditorSession<TableStore> {
    EditorSession::new(TableStore::with_table(prices()), &EditorOptions::default())
}

fn round() -> Operation {
    Operation::new("numeric_transform", "price")
        .with_parameters(json!({"transformType": "round", "method": "banker"}))
}

fn column(session: &EditorSession<TableStore>, name: &str) -> Vec<Value> {
    let table = session.provider().active_table().unwrap();
    table.values(name).cloned().collect()
}

// =========================================================================
// Applying operations
// =========================================================================

#[test]
fn test_apply_replaces_active_table_and_records() {
    let mut session = session();
    let result = session.apply(round());
    assert!(result.success, "{:?}", result.error);
    assert_eq!(column(&session, "price"), vec![Value::Number(2.0), Value::Number(4.0)]);
    assert_eq!(session.history().len(), 1);
    assert!(session.can_undo());
}

#[test]
fn test_failed_operation_changes_nothing() {
    let mut session = session();
    let op = Operation::new("numeric_transform", "price")
        .with_parameters(json!({"transformType": "arithmetic", "operation": "divide", "value": 0}));
    let result = session.apply(op);
    assert_eq!(result.error.as_deref(), Some("Cannot divide by zero"));
    assert_eq!(column(&session, "price"), vec![Value::Number(2.5), Value::Number(3.5)]);
    assert!(session.history().is_empty());
}

#[test]
fn test_apply_without_active_dataset() {
    let mut session = EditorSession::new(TableStore::new(), &EditorOptions::default());
    let result = session.apply(round());
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("No active dataset"));
}

#[test]
fn test_apply_all_stops_at_first_failure() {
    let mut session = session();
    let results = session.apply_all([
        Operation::new("trim", "item"),
        Operation::new("teleport", "item"),
        round(),
    ]);
    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(session.history().len(), 1);
    assert_eq!(column(&session, "price"), vec![Value::Number(2.5), Value::Number(3.5)]);
}

// =========================================================================
// Undo and redo
// =========================================================================

#[test]
fn test_undo_and_redo_through_session() {
    let mut session = session();
    session.apply(Operation::new("trim", "item"));
    session.apply(round());

    let undone = session.undo().unwrap().unwrap();
    assert_eq!(undone.kind, "numeric_transform");
    assert_eq!(column(&session, "price"), vec![Value::Number(2.5), Value::Number(3.5)]);
    assert_eq!(column(&session, "item"), vec![Value::text("pen"), Value::text("ink")]);

    session.jump_to(None).unwrap();
    assert_eq!(session.provider().active_table(), Some(prices()));

    session.redo().unwrap();
    session.redo().unwrap();
    assert!(!session.can_redo());
    assert_eq!(column(&session, "price"), vec![Value::Number(2.0), Value::Number(4.0)]);
}

#[test]
fn test_history_bound_comes_from_options() {
    let options = EditorOptions::default().with_max_history_size(1);
    let mut session = EditorSession::new(TableStore::with_table(prices()), &options);
    session.apply(Operation::new("trim", "item"));
    session.apply(round());
    assert_eq!(session.history().len(), 1);

    session.undo().unwrap();
    assert!(!session.can_undo());
    assert_eq!(column(&session, "item"), vec![Value::text("pen"), Value::text("ink")]);
}

#[test]
fn test_structural_changes_undo_cleanly() {
    let mut session = session();
    let result = session.apply(Operation::new("duplicate_column", "item"));
    assert_eq!(result.new_columns, vec!["item_copy"]);
    session.undo().unwrap();
    let table = session.provider().active_table().unwrap();
    assert_eq!(table.columns(), ["item", "price"]);
}
