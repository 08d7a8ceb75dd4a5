//! Column profiling.

use std::collections::HashMap;

use polars::prelude::{ChunkAgg, ChunkQuantile, ChunkVar, NamedFrom, Series};
use serde::Serialize;
use tabula_model::{Table, Value};

use crate::error::Result;

/// Dominant cell type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    /// More than one cell type, or lists.
    Mixed,
    /// Every cell is null.
    Empty,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Mixed => "mixed",
            Self::Empty => "empty",
        }
    }

    fn of<'a>(values: impl Iterator<Item = &'a Value>) -> Self {
        let mut kind = Self::Empty;
        for value in values {
            let this = match value {
                Value::Null => continue,
                Value::Number(_) => Self::Numeric,
                Value::Text(_) => Self::Text,
                Value::Bool(_) => Self::Boolean,
                Value::List(_) => return Self::Mixed,
            };
            kind = match kind {
                Self::Empty => this,
                current if current == this => current,
                _ => return Self::Mixed,
            };
        }
        kind
    }
}

/// Summary of the numeric cells in a column.
///
/// `std` is the sample standard deviation and is absent for a single value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopValue {
    pub value: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub name: String,
    pub kind: ColumnKind,
    /// Non-null cells.
    pub count: usize,
    pub null_count: usize,
    /// Distinct non-null values, compared by their text form.
    pub unique_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    /// Most frequent value; ties go to the value seen first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<TopValue>,
}

fn numeric_summary(name: &str, values: &[&Value]) -> Result<Option<NumericSummary>> {
    let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
    if numbers.is_empty() {
        return Ok(None);
    }
    let series = Series::new(name.into(), numbers);
    let ca = series.f64()?;
    Ok(Some(NumericSummary {
        min: ca.min(),
        max: ca.max(),
        mean: ca.mean(),
        median: ca.median(),
        std: ca.std(1).filter(|v| v.is_finite()),
    }))
}

fn top_value(texts: &[String]) -> Option<TopValue> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for text in texts {
        let count = counts.entry(text.as_str()).or_insert(0);
        if *count == 0 {
            order.push(text);
        }
        *count += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for key in order {
        let count = counts[key];
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((key, count));
        }
    }
    best.map(|(value, frequency)| TopValue {
        value: value.to_string(),
        frequency,
    })
}

/// Profiles one column.
pub fn column_summary(table: &Table, column: &str) -> Result<ColumnStats> {
    let present: Vec<&Value> = table.values(column).filter(|v| !v.is_null()).collect();
    let kind = ColumnKind::of(present.iter().copied());
    let texts: Vec<String> = present.iter().map(|v| v.to_text()).collect();
    let unique_count = if texts.is_empty() {
        0
    } else {
        Series::new(column.into(), texts.clone()).n_unique()?
    };
    let numeric = if kind == ColumnKind::Numeric {
        numeric_summary(column, &present)?
    } else {
        None
    };
    Ok(ColumnStats {
        name: column.to_string(),
        kind,
        count: present.len(),
        null_count: table.len() - present.len(),
        unique_count,
        numeric,
        top: top_value(&texts),
    })
}

/// Profiles every column, in column order.
pub fn column_stats(table: &Table) -> Result<Vec<ColumnStats>> {
    table
        .columns()
        .iter()
        .map(|column| column_summary(table, column))
        .collect()
}
