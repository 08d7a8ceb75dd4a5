//! Category relabelling and encoding.
//!
//! Categories are compared by their text form, so `1` and `"1"` are the same
//! category.

use std::collections::BTreeMap;

use serde::Deserialize;
use tabula_model::{Table, Value, parse_f64};

use crate::error::{Result, TransformError};
use crate::frame::{
    TransformOutput, build_pattern, map_cells, require_absent, require_column, value_counts,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoriesParams {
    pub mapping: BTreeMap<String, Value>,
}

pub fn rename_categories(
    table: &Table,
    column: &str,
    params: &RenameCategoriesParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_cells(table, column, |cell| {
        if cell.is_null() {
            return Value::Null;
        }
        params
            .mapping
            .get(&cell.to_text())
            .cloned()
            .unwrap_or_else(|| cell.clone())
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCategoriesParams {
    pub sources: Vec<String>,
    pub target: String,
}

pub fn merge_categories(
    table: &Table,
    column: &str,
    params: &MergeCategoriesParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    if params.sources.is_empty() {
        return Err(TransformError::invalid("At least one source category is required"));
    }
    let table = map_cells(table, column, |cell| {
        if !cell.is_null() && params.sources.contains(&cell.to_text()) {
            Value::text(params.target.as_str())
        } else {
            cell.clone()
        }
    });
    Ok(TransformOutput::in_place(table))
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitRule {
    pub pattern: String,
    pub target: String,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitCategoriesParams {
    pub rules: Vec<SplitRule>,
}

/// Reassigns values by pattern. The first matching rule wins; unmatched
/// values are kept.
pub fn split_categories(
    table: &Table,
    column: &str,
    params: &SplitCategoriesParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let compiled = params
        .rules
        .iter()
        .map(|rule| {
            build_pattern(&rule.pattern, rule.use_regex, rule.case_sensitive)
                .map(|pattern| (pattern, rule.target.as_str()))
        })
        .collect::<Result<Vec<_>>>()?;
    let table = map_cells(table, column, |cell| {
        if cell.is_null() {
            return Value::Null;
        }
        let text = cell.to_text();
        compiled
            .iter()
            .find(|(pattern, _)| pattern.is_match(&text))
            .map_or_else(|| cell.clone(), |(_, target)| Value::text(*target))
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeMethod {
    /// Category index, `-1` for values outside the vocabulary.
    #[default]
    Label,
    /// One 0/1 column per category, replacing the source.
    Onehot,
    /// Category index as bits, most significant first, replacing the source.
    Binary,
    /// A 0/1 list per cell, in place.
    Matrix,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncodeParams {
    pub method: EncodeMethod,
    pub drop_first: bool,
    pub categories: Option<Vec<String>>,
}

/// Distinct non-null categories, sorted numerically when every category is a
/// number and lexicographically otherwise.
pub fn sorted_categories(table: &Table, column: &str) -> Vec<String> {
    let mut keys: Vec<String> = value_counts(table.values(column))
        .into_iter()
        .map(|(key, _, _)| key)
        .collect();
    if keys.iter().all(|k| parse_f64(k).is_some()) {
        keys.sort_by(|a, b| {
            let a = parse_f64(a).unwrap_or_default();
            let b = parse_f64(b).unwrap_or_default();
            a.total_cmp(&b)
        });
    } else {
        keys.sort();
    }
    keys
}

fn bit_width(categories: usize) -> usize {
    let bits = usize::BITS - categories.saturating_sub(1).leading_zeros();
    (bits as usize).max(1)
}

pub fn encode_categorical(
    table: &Table,
    column: &str,
    params: &EncodeParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let categories = match &params.categories {
        Some(fixed) => {
            let mut seen = Vec::with_capacity(fixed.len());
            for category in fixed {
                if !seen.contains(category) {
                    seen.push(category.clone());
                }
            }
            seen
        }
        None => sorted_categories(table, column),
    };
    if categories.is_empty() {
        return Err(TransformError::invalid(format!(
            "Column '{column}' has no categories to encode"
        )));
    }
    let index_of = |cell: &Value| -> Option<usize> {
        if cell.is_null() {
            return None;
        }
        let key = cell.to_text();
        categories.iter().position(|c| *c == key)
    };

    match params.method {
        EncodeMethod::Label => {
            let table = map_cells(table, column, |cell| {
                if cell.is_null() {
                    return Value::Null;
                }
                index_of(cell).map_or(Value::Number(-1.0), |i| Value::Number(i as f64))
            });
            Ok(TransformOutput::in_place(table))
        }
        EncodeMethod::Matrix => {
            let table = map_cells(table, column, |cell| {
                let index = index_of(cell);
                Value::List((0..categories.len()).map(|i| flag(index == Some(i))).collect())
            });
            Ok(TransformOutput::in_place(table))
        }
        EncodeMethod::Onehot => {
            let encoded: Vec<(String, usize)> = categories
                .iter()
                .enumerate()
                .skip(usize::from(params.drop_first))
                .map(|(i, category)| (format!("{column}_{category}"), i))
                .collect();
            replace_with_columns(table, column, &encoded, |cell, i| {
                flag(index_of(cell) == Some(i))
            })
        }
        EncodeMethod::Binary => {
            let bits = bit_width(categories.len());
            let encoded: Vec<(String, usize)> = (0..bits)
                .map(|bit| (format!("{column}_bin_{bit}"), bits - 1 - bit))
                .collect();
            replace_with_columns(table, column, &encoded, |cell, shift| {
                flag(index_of(cell).is_some_and(|i| (i >> shift) & 1 == 1))
            })
        }
    }
}

fn flag(on: bool) -> Value {
    Value::Number(if on { 1.0 } else { 0.0 })
}

/// Replaces `column` with `encoded` columns at the same position. Each new
/// cell is `cell_value(source_cell, key)` for its column's key.
fn replace_with_columns(
    table: &Table,
    column: &str,
    encoded: &[(String, usize)],
    cell_value: impl Fn(&Value, usize) -> Value,
) -> Result<TransformOutput> {
    for (name, _) in encoded {
        if name != column {
            require_absent(table, name)?;
        }
    }
    let names: Vec<String> = encoded.iter().map(|(name, _)| name.clone()).collect();
    let mut columns = Vec::with_capacity(table.columns().len() + names.len());
    for existing in table.columns() {
        if existing == column {
            columns.extend(names.iter().cloned());
        } else {
            columns.push(existing.clone());
        }
    }
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let source = updated.remove(column);
            for (name, key) in encoded {
                updated.set(name.clone(), cell_value(&source, *key));
            }
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    Ok(TransformOutput::added(table, names).with_removed(vec![column.to_string()]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RareMode {
    /// Threshold is an occurrence count.
    #[default]
    Count,
    /// Threshold is a percentage of non-null values.
    Percentage,
}

fn default_other_label() -> String {
    "Other".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRareParams {
    pub threshold: f64,
    #[serde(default)]
    pub mode: RareMode,
    #[serde(default = "default_other_label")]
    pub other_label: String,
}

/// Relabels categories whose frequency is strictly below the threshold.
pub fn group_rare(
    table: &Table,
    column: &str,
    params: &GroupRareParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    if !params.threshold.is_finite() || params.threshold < 0.0 {
        return Err(TransformError::invalid("Threshold must be a non-negative number"));
    }
    let counts = value_counts(table.values(column));
    let total: usize = counts.iter().map(|(_, _, n)| n).sum();
    let rare: Vec<String> = counts
        .into_iter()
        .filter(|(_, _, n)| {
            let frequency = match params.mode {
                RareMode::Count => *n as f64,
                RareMode::Percentage => *n as f64 / total as f64 * 100.0,
            };
            frequency < params.threshold
        })
        .map(|(key, _, _)| key)
        .collect();
    let table = map_cells(table, column, |cell| {
        if !cell.is_null() && rare.contains(&cell.to_text()) {
            Value::text(params.other_label.as_str())
        } else {
            cell.clone()
        }
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultStrategy {
    #[default]
    Constant,
    MostFrequent,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignDefaultParams {
    pub strategy: DefaultStrategy,
    pub value: Value,
}

/// Fills null cells and the empty sentinels `''`, `'null'`, and `'undefined'`.
pub fn assign_default(
    table: &Table,
    column: &str,
    params: &AssignDefaultParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let fill = match params.strategy {
        DefaultStrategy::Constant if params.value.is_null() => {
            return Err(TransformError::invalid("A default value is required"));
        }
        DefaultStrategy::Constant => params.value.clone(),
        DefaultStrategy::MostFrequent => {
            let counts = value_counts(table.values(column).filter(|v| !v.is_empty_sentinel()));
            let max = counts.iter().map(|(_, _, n)| *n).max().unwrap_or(0);
            match counts.into_iter().find(|(_, _, n)| *n == max) {
                Some((_, value, _)) if max > 0 => value,
                _ => {
                    return Err(TransformError::invalid(format!(
                        "Column '{column}' has no values to choose a default from"
                    )));
                }
            }
        }
    };
    let table = map_cells(table, column, |cell| {
        if cell.is_empty_sentinel() {
            fill.clone()
        } else {
            cell.clone()
        }
    });
    Ok(TransformOutput::in_place(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_width_covers_every_index() {
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(2), 1);
        assert_eq!(bit_width(3), 2);
        assert_eq!(bit_width(4), 2);
        assert_eq!(bit_width(5), 3);
    }
}
