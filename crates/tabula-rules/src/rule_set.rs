//! Named rule sets and their application across a table.

use serde::{Deserialize, Serialize};
use tabula_model::{RowId, Table, Value};
use tracing::{debug, warn};

use crate::condition::{EvaluationContext, PatternCache};
use crate::group::{RuleGroup, evaluate_group};
use crate::RuleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Output the raw boolean.
    #[default]
    Boolean,
    /// Output `trueValue` / `falseValue`.
    Custom,
}

/// A reusable predicate with an output mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule: RuleGroup,
    #[serde(default)]
    pub result_type: ResultType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl RuleSet {
    pub fn boolean(name: impl Into<String>, rule: RuleGroup) -> Self {
        Self {
            name: name.into(),
            description: None,
            rule,
            result_type: ResultType::Boolean,
            true_value: None,
            false_value: None,
            default_value: None,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        rule: RuleGroup,
        true_value: impl Into<Value>,
        false_value: impl Into<Value>,
    ) -> Self {
        Self {
            result_type: ResultType::Custom,
            true_value: Some(true_value.into()),
            false_value: Some(false_value.into()),
            ..Self::boolean(name, rule)
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Value written when evaluation fails.
    pub fn fallback_value(&self) -> Value {
        self.default_value.clone().unwrap_or(Value::Bool(false))
    }

    fn output_for(&self, matched: bool) -> Value {
        match self.result_type {
            ResultType::Boolean => Value::Bool(matched),
            ResultType::Custom if matched => {
                self.true_value.clone().unwrap_or(Value::Bool(true))
            }
            ResultType::Custom => self.false_value.clone().unwrap_or(Value::Bool(false)),
        }
    }
}

/// Output of evaluating a rule set against one row.
///
/// When `error` is set, `value` is the rule set's fallback value.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetOutcome {
    pub value: Value,
    pub error: Option<RuleError>,
}


pub fn evaluate_rule_set(rule_set: &RuleSet, ctx: &EvaluationContext<'_>) -> RuleSetOutcome {
    match evaluate_group(&rule_set.rule, ctx) {
        Ok(matched) => RuleSetOutcome {
            value: rule_set.output_for(matched),
            error: None,
        },
        Err(error) => RuleSetOutcome {
            value: rule_set.fallback_value(),
            error: Some(error),
        },
    }
}

/// A row whose evaluation failed and received the fallback value.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub index: usize,
    pub row_id: RowId,
    pub error: RuleError,
}

#[derive(Debug, Clone)]
pub struct RuleApplication {
    pub table: Table,
    pub failed_rows: Vec<RowFailure>,
    /// True when the target column did not exist before.
    pub created_column: bool,
}

/// Evaluates `rule_set` for every row and writes the output to `target_column`.
///
/// A failing row receives the fallback value and is reported in
/// `failed_rows`; it never aborts the pass. A new target column is appended
/// after the existing columns.
pub fn apply_rule_set_to_dataset(
    table: &Table,
    rule_set: &RuleSet,
    target_column: &str,
) -> Result<RuleApplication, RuleError> {
    let columns = table.columns();
    let mut failed_rows = Vec::new();
    let mut rows = Vec::with_capacity(table.len());
    let patterns = PatternCache::new();

    for (index, row) in table.rows().iter().enumerate() {
        let ctx = EvaluationContext::new(row, columns).with_patterns(&patterns);
        let outcome = evaluate_rule_set(rule_set, &ctx);
        if let Some(error) = outcome.error {
            debug!(rule_set = %rule_set.name, row = index, %error, "rule evaluation failed");
            failed_rows.push(RowFailure {
                index,
                row_id: row.id,
                error,
            });
        }
        let mut updated = row.clone();
        updated.set(target_column, outcome.value);
        rows.push(updated);
    }

    if !failed_rows.is_empty() {
        warn!(
            rule_set = %rule_set.name,
            failed = failed_rows.len(),
            rows = table.len(),
            "rows fell back to the rule set default value"
        );
    }

    let created_column = !table.has_column(target_column);
    let mut new_columns = columns.to_vec();
    if created_column {
        new_columns.push(target_column.to_string());
    }
    let table = table.with_data(new_columns, rows)?;

    Ok(RuleApplication {
        table,
        failed_rows,
        created_column,
    })
}

/// Parses a serialized (JSON) rule set.
pub fn parse_rule_set(text: &str) -> Result<RuleSet, RuleError> {
    serde_json::from_str(text).map_err(|err| RuleError::Parse(err.to_string()))
}
