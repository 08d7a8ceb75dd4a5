//! Table-building helpers shared by the transform modules.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tabula_model::{Table, Value};

use crate::error::{Result, TransformError};

/// A successful transform: the replacement table and its column deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub table: Table,
    pub new_columns: Vec<String>,
    pub removed_columns: Vec<String>,
}

impl TransformOutput {
    /// Values changed, column set unchanged.
    pub fn in_place(table: Table) -> Self {
        Self {
            table,
            new_columns: Vec::new(),
            removed_columns: Vec::new(),
        }
    }

    pub fn added(table: Table, new_columns: Vec<String>) -> Self {
        Self {
            table,
            new_columns,
            removed_columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_removed(mut self, removed_columns: Vec<String>) -> Self {
        self.removed_columns = removed_columns;
        self
    }
}

pub(crate) fn require_column(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(TransformError::ColumnNotFound(column.to_string()))
    }
}

pub(crate) fn require_absent(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Err(TransformError::ColumnExists(column.to_string()))
    } else {
        Ok(())
    }
}

/// Rebuilds the column through `f`, one cell at a time.
pub(crate) fn map_cells(table: &Table, column: &str, mut f: impl FnMut(&Value) -> Value) -> Table {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let value = f(row.get(column));
            updated.set(column, value);
            updated
        })
        .collect();
    table.with_rows(rows)
}

/// Applies `f` to cells that coerce to numbers; other cells pass through.
pub(crate) fn map_numeric(
    table: &Table,
    column: &str,
    mut f: impl FnMut(&Value, f64) -> Value,
) -> Table {
    map_cells(table, column, |cell| match cell.as_number() {
        Some(number) => f(cell, number),
        None => cell.clone(),
    })
}

/// Applies `f` to the text form of text and number cells.
///
/// A cell is only rewritten when `f` changes its text, so numbers that a
/// text operation leaves alone keep their type.
pub(crate) fn map_textual(table: &Table, column: &str, mut f: impl FnMut(&str) -> String) -> Table {
    map_cells(table, column, |cell| match cell {
        Value::Text(_) | Value::Number(_) => {
            let original = cell.to_text();
            let updated = f(&original);
            if updated == original {
                cell.clone()
            } else {
                Value::Text(updated)
            }
        }
        _ => cell.clone(),
    })
}

/// Non-null values of the column that coerce to numbers, in row order.
pub(crate) fn numeric_values(table: &Table, column: &str) -> Vec<f64> {
    table.values(column).filter_map(Value::as_number).collect()
}

/// Column list with `new` inserted right after `anchor`.
pub(crate) fn insert_after(columns: &[String], anchor: &str, new: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(columns.len() + new.len());
    for column in columns {
        out.push(column.clone());
        if column == anchor {
            out.extend(new.iter().cloned());
        }
    }
    out
}

/// Builds a find pattern; literal patterns have every metacharacter escaped.
pub(crate) fn build_pattern(pattern: &str, use_regex: bool, case_sensitive: bool) -> Result<Regex> {
    let source = if use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| TransformError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}

/// Distinct non-null values keyed by their text form, in first-seen order,
/// with occurrence counts.
pub(crate) fn value_counts<'a>(
    values: impl Iterator<Item = &'a Value>,
) -> Vec<(String, Value, usize)> {
    let mut counts: Vec<(String, Value, usize)> = Vec::new();
    let mut index = HashMap::<String, usize>::new();
    for value in values {
        if value.is_null() {
            continue;
        }
        let key = value.to_text();
        match index.get(&key) {
            Some(&pos) => counts[pos].2 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, value.clone(), 1));
            }
        }
    }
    counts
}
