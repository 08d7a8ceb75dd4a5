//! Rule-based value mapping.

use serde::Deserialize;
use tabula_model::Table;
use tabula_rules::{RuleSet, apply_rule_set_to_dataset, parse_rule_set, validate_rule_set};
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, require_column};

/// A rule set given either serialized or inline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleSetSource {
    Serialized(String),
    Inline(Box<RuleSet>),
}

impl RuleSetSource {
    pub fn resolve(&self) -> Result<RuleSet> {
        match self {
            Self::Serialized(text) => Ok(parse_rule_set(text)?),
            Self::Inline(rule_set) => Ok((**rule_set).clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedMappingParams {
    pub rule_set: RuleSetSource,
    /// Column receiving the output. Defaults to the source column.
    #[serde(default)]
    pub target_column: Option<String>,
}

/// Parses, validates, and applies a rule set. Rows that fail evaluation
/// receive the rule set's default value.
pub fn advanced_mapping(
    table: &Table,
    column: &str,
    params: &AdvancedMappingParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let rule_set = params.rule_set.resolve()?;
    let violations = validate_rule_set(&rule_set, table.columns());
    if !violations.is_empty() {
        return Err(TransformError::invalid(format!(
            "Invalid rule set: {}",
            violations.join("; ")
        )));
    }

    let target = params.target_column.as_deref().unwrap_or(column);
    let applied = apply_rule_set_to_dataset(table, &rule_set, target)?;
    debug!(
        rule_set = %rule_set.name,
        target,
        failed = applied.failed_rows.len(),
        "applied rule mapping"
    );
    let new_columns = if applied.created_column {
        vec![target.to_string()]
    } else {
        Vec::new()
    };
    Ok(TransformOutput::added(applied.table, new_columns))
}
