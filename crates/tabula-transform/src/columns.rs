//! Structural column operations.

use serde::Deserialize;
use tabula_model::Table;

use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, insert_after, require_absent, require_column};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameColumnParams {
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicateColumnParams {
    pub new_name: Option<String>,
}

fn checked_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(TransformError::invalid("Column name cannot be empty"))
    } else {
        Ok(trimmed)
    }
}

/// Renames in place; the column keeps its position.
pub fn rename_column(
    table: &Table,
    column: &str,
    params: &RenameColumnParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let new_name = checked_name(&params.new_name)?;
    if new_name == column {
        return Ok(TransformOutput::in_place(table.clone()));
    }
    require_absent(table, new_name)?;

    let columns = table
        .columns()
        .iter()
        .map(|c| if c == column { new_name.to_string() } else { c.clone() })
        .collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let value = updated.remove(column);
            updated.set(new_name, value);
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    let output = TransformOutput::added(table, vec![new_name.to_string()]);
    Ok(output.with_removed(vec![column.to_string()]))
}

pub fn delete_column(table: &Table, column: &str) -> Result<TransformOutput> {
    require_column(table, column)?;
    let columns = table
        .columns()
        .iter()
        .filter(|c| *c != column)
        .cloned()
        .collect();
    let table = table.with_data(columns, table.to_rows())?;
    Ok(TransformOutput::in_place(table).with_removed(vec![column.to_string()]))
}

/// Copies the column under a new name, right after the source.
pub fn duplicate_column(
    table: &Table,
    column: &str,
    params: &DuplicateColumnParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let new_name = match &params.new_name {
        Some(name) => checked_name(name)?.to_string(),
        None => format!("{column}_copy"),
    };
    require_absent(table, &new_name)?;

    let columns = insert_after(table.columns(), column, std::slice::from_ref(&new_name));
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            updated.set(new_name.clone(), row.get(column).clone());
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    Ok(TransformOutput::added(table, vec![new_name]))
}
