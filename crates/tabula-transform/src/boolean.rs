//! Boolean-like columns.
//!
//! A column is read either through canonical tokens (`true/false`, `1/0`,
//! `yes/no`, `y/n`, native booleans, the numbers 1 and 0) or, when it holds
//! at most two other distinct values, through a two-value fallback where the
//! first value encountered means true.

use serde::Deserialize;
use tabula_model::{Table, Value};

use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, map_cells, require_column, value_counts};

const TOKEN_PAIRS: [(&str, &str); 4] = [("true", "false"), ("1", "0"), ("yes", "no"), ("y", "n")];

fn canonical_truth(cell: &Value) -> Option<bool> {
    match cell {
        Value::Bool(b) => Some(*b),
        Value::Number(n) if *n == 1.0 => Some(true),
        Value::Number(n) if *n == 0.0 => Some(false),
        Value::Text(text) => {
            let token = text.trim().to_lowercase();
            TOKEN_PAIRS.iter().find_map(|(t, f)| {
                if token == *t {
                    Some(true)
                } else if token == *f {
                    Some(false)
                } else {
                    None
                }
            })
        }
        _ => None,
    }
}

fn match_case(token: &str, model: &str) -> String {
    let mut letters = model.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return token.to_string();
    }
    if letters.all(char::is_uppercase) {
        return token.to_uppercase();
    }
    if model.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = token.chars();
        return chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
    }
    token.to_string()
}

/// `value` in the representation of the canonical cell `template`.
fn render_like(template: &Value, value: bool) -> Value {
    match template {
        Value::Number(_) => Value::Number(if value { 1.0 } else { 0.0 }),
        Value::Text(text) => {
            let trimmed = text.trim();
            let lower = trimmed.to_lowercase();
            TOKEN_PAIRS
                .iter()
                .find(|(t, f)| lower == *t || lower == *f)
                .map_or(Value::Bool(value), |(t, f)| {
                    Value::Text(match_case(if value { t } else { f }, trimmed))
                })
        }
        _ => Value::Bool(value),
    }
}

/// How a column's values map to booleans.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanReading {
    Canonical,
    /// First and (if present) second distinct non-canonical labels.
    TwoValue {
        truthy: Value,
        falsy: Option<Value>,
    },
}

impl BooleanReading {
    pub fn of(table: &Table, column: &str) -> Result<Self> {
        if table
            .values(column)
            .filter(|v| !v.is_null())
            .all(|v| canonical_truth(v).is_some())
        {
            return Ok(Self::Canonical);
        }
        let mut distinct = value_counts(table.values(column)).into_iter().map(|(_, v, _)| v);
        match (distinct.next(), distinct.next(), distinct.next()) {
            (Some(truthy), falsy, None) => Ok(Self::TwoValue { truthy, falsy }),
            _ => Err(TransformError::invalid(format!(
                "Column '{column}' has more than two distinct values and cannot be read as boolean"
            ))),
        }
    }

    pub fn truth(&self, cell: &Value) -> Option<bool> {
        if cell.is_null() {
            return None;
        }
        match self {
            Self::Canonical => canonical_truth(cell),
            Self::TwoValue { truthy, .. } => Some(cell.to_text() == truthy.to_text()),
        }
    }

    fn render(&self, template: Option<&Value>, value: bool) -> Option<Value> {
        match self {
            Self::Canonical => Some(template.map_or(Value::Bool(value), |t| render_like(t, value))),
            Self::TwoValue { truthy, .. } if value => Some(truthy.clone()),
            Self::TwoValue { falsy, .. } => falsy.clone(),
        }
    }
}

pub fn boolean_to_01(table: &Table, column: &str) -> Result<TransformOutput> {
    require_column(table, column)?;
    let reading = BooleanReading::of(table, column)?;
    let table = map_cells(table, column, |cell| match reading.truth(cell) {
        Some(b) => Value::Number(if b { 1.0 } else { 0.0 }),
        None => Value::Null,
    });
    Ok(TransformOutput::in_place(table))
}

/// Inverts every value, keeping its representation and letter case. With the
/// two-value fallback the labels swap; a lone label is left as is.
pub fn invert_boolean(table: &Table, column: &str) -> Result<TransformOutput> {
    require_column(table, column)?;
    let reading = BooleanReading::of(table, column)?;
    let table = map_cells(table, column, |cell| match (&reading, reading.truth(cell)) {
        (_, None) => cell.clone(),
        (BooleanReading::Canonical, Some(b)) => render_like(cell, !b),
        (BooleanReading::TwoValue { .. }, Some(b)) => {
            reading.render(None, !b).unwrap_or_else(|| cell.clone())
        }
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    True,
    False,
    /// The more frequent value; ties resolve to true.
    Majority,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBooleanParams {
    pub strategy: FillStrategy,
}

pub fn fill_boolean(
    table: &Table,
    column: &str,
    params: &FillBooleanParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let reading = BooleanReading::of(table, column)?;
    let fill = match params.strategy {
        FillStrategy::True => true,
        FillStrategy::False => false,
        FillStrategy::Majority => {
            let (trues, falses) = table
                .values(column)
                .filter_map(|v| reading.truth(v))
                .fold((0usize, 0usize), |(t, f), b| if b { (t + 1, f) } else { (t, f + 1) });
            if trues + falses == 0 {
                return Err(TransformError::invalid(format!(
                    "Column '{column}' has no values to take a majority of"
                )));
            }
            trues >= falses
        }
    };
    let template = table.values(column).find(|v| !v.is_null());
    let Some(value) = reading.render(template, fill) else {
        return Err(TransformError::invalid(format!(
            "Column '{column}' has no label for {fill}"
        )));
    };
    let table = map_cells(table, column, |cell| {
        if cell.is_null() {
            value.clone()
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
    fn inversion_preserves_case() {
        assert_eq!(render_like(&Value::text("TRUE"), false), Value::text("FALSE"));
        assert_eq!(render_like(&Value::text("Yes"), false), Value::text("No"));
        assert_eq!(render_like(&Value::text("y"), false), Value::text("n"));
        assert_eq!(render_like(&Value::text("Y"), false), Value::text("N"));
        assert_eq!(render_like(&Value::text("0"), true), Value::text("1"));
        assert_eq!(render_like(&Value::Number(0.0), true), Value::Number(1.0));
    }

    #[test]
    fn canonical_tokens_ignore_case_and_padding() {
        assert_eq!(canonical_truth(&Value::text(" YES ")), Some(true));
        assert_eq!(canonical_truth(&Value::text("n")), Some(false));
        assert_eq!(canonical_truth(&Value::Number(2.0)), None);
        assert_eq!(canonical_truth(&Value::text("maybe")), None);
    }
}
