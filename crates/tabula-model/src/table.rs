#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::{DatasetId, ModelError, RowId, Value};

static NULL: Value = Value::Null;

/// One row: a stable id plus cells keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: RowId,
    pub cells: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            cells: BTreeMap::new(),
        }
    }

    /// Returns the cell for `column`, reading absent cells as `Null`.
    pub fn get(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&NULL)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.cells.insert(column.into(), value);
    }

    pub fn remove(&mut self, column: &str) -> Value {
        self.cells.remove(column).unwrap_or_default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value.into());
        self
    }
}

/// An immutable table: dataset identity, ordered unique columns, ordered rows.
///
/// Columns and rows live behind `Arc`, so cloning a table (for a history
/// snapshot or a provider read) shares storage. Every change produces a new
/// table; nothing hands out mutable access to shared rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    id: DatasetId,
    columns: Arc<Vec<String>>,
    rows: Arc<Vec<Row>>,
}

impl Table {
    /// Builds a table, rejecting empty or duplicate column names.
    ///
    /// Rows are normalized to the column set: missing cells become `Null`
    /// and cells for unknown columns are dropped.
    pub fn new(id: DatasetId, columns: Vec<String>, rows: Vec<Row>) -> Result<Self, ModelError> {
        validate_columns(&columns)?;
        let rows = normalize_rows(&columns, rows);
        Ok(Self {
            id,
            columns: Arc::new(columns),
            rows: Arc::new(rows),
        })
    }

    /// Builds a table from positional records, assigning sequential row ids.
    pub fn from_records(
        id: DatasetId,
        columns: Vec<String>,
        records: Vec<Vec<Value>>,
    ) -> Result<Self, ModelError> {
        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            if record.len() != columns.len() {
                return Err(ModelError::RowWidth {
                    row: idx,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            let cells = columns.iter().cloned().zip(record).collect();
            rows.push(Row {
                id: RowId::new(idx as u64),
                cells,
            });
        }
        Self::new(id, columns, rows)
    }

    pub fn empty(id: DatasetId) -> Self {
        Self {
            id,
            columns: Arc::new(Vec::new()),
            rows: Arc::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &DatasetId {
        &self.id
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|col| col == name)
    }

    /// Iterates the values of one column in row order.
    pub fn values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Returns a clone of the rows, ready for building a derived table.
    pub fn to_rows(&self) -> Vec<Row> {
        self.rows.as_ref().clone()
    }

    /// New table with the same id and columns.
    #[must_use]
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        let rows = normalize_rows(&self.columns, rows);
        Self {
            id: self.id.clone(),
            columns: Arc::clone(&self.columns),
            rows: Arc::new(rows),
        }
    }

    /// New table with the same id and a different column set.
    pub fn with_data(&self, columns: Vec<String>, rows: Vec<Row>) -> Result<Self, ModelError> {
        Self::new(self.id.clone(), columns, rows)
    }

    /// True when both tables point at the same row storage.
    pub fn shares_rows_with(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

fn validate_columns(columns: &[String]) -> Result<(), ModelError> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if column.trim().is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        if !seen.insert(column.as_str()) {
            return Err(ModelError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

fn normalize_rows(columns: &[String], rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter()
        .map(|mut row| {
            if row.cells.len() != columns.len()
                || columns.iter().any(|col| !row.cells.contains_key(col))
            {
                let mut cells = BTreeMap::new();
                for column in columns {
                    let value = row.cells.remove(column).unwrap_or_default();
                    cells.insert(column.clone(), value);
                }
                row.cells = cells;
            }
            row
        })
        .collect()
}
