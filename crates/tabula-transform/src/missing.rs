//! Missing-value filling.

use serde::Deserialize;
use tabula_model::{Table, Value};

use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, map_cells, numeric_values, require_column, value_counts};
use crate::numeric::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    Constant,
    Mean,
    Median,
    /// Most frequent value; ties go to the first one encountered.
    Mode,
    ForwardFill,
    BackwardFill,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillMissingParams {
    pub method: FillMethod,
    #[serde(default)]
    pub value: Value,
}

pub fn fill_missing(
    table: &Table,
    column: &str,
    params: &FillMissingParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = match params.method {
        FillMethod::Constant => {
            if params.value.is_null() {
                return Err(TransformError::invalid("Constant fill requires a value"));
            }
            fill_nulls(table, column, &params.value)
        }
        FillMethod::Mean | FillMethod::Median => {
            let values = numeric_values(table, column);
            if values.is_empty() {
                return Err(TransformError::NoNumericValues(column.to_string()));
            }
            let fill = if params.method == FillMethod::Mean {
                stats::mean(&values)
            } else {
                stats::median(&stats::sorted(&values))
            };
            fill_nulls(table, column, &Value::number(fill))
        }
        FillMethod::Mode => {
            let counts = value_counts(table.values(column));
            let Some(max) = counts.iter().map(|(_, _, n)| *n).max() else {
                return Err(TransformError::invalid(format!(
                    "Column '{column}' has no values to take the mode of"
                )));
            };
            let mode = counts
                .into_iter()
                .find(|(_, _, n)| *n == max)
                .map(|(_, value, _)| value)
                .unwrap_or_default();
            fill_nulls(table, column, &mode)
        }
        FillMethod::ForwardFill => {
            let mut last = Value::Null;
            map_cells(table, column, |cell| {
                if cell.is_null() {
                    last.clone()
                } else {
                    last = cell.clone();
                    cell.clone()
                }
            })
        }
        FillMethod::BackwardFill => {
            let values: Vec<&Value> = table.values(column).collect();
            let mut next = vec![Value::Null; values.len()];
            let mut carry = Value::Null;
            for (i, value) in values.iter().enumerate().rev() {
                if !value.is_null() {
                    carry = (*value).clone();
                }
                next[i] = carry.clone();
            }
            let mut position = 0;
            map_cells(table, column, |_| {
                let value = std::mem::take(&mut next[position]);
                position += 1;
                value
            })
        }
    };
    Ok(TransformOutput::in_place(table))
}

fn fill_nulls(table: &Table, column: &str, fill: &Value) -> Table {
    map_cells(table, column, |cell| {
        if cell.is_null() {
            fill.clone()
        } else {
            cell.clone()
        }
    })
}
