//! Static rule set validation.

use tabula_model::Value;

use crate::condition::{Operator, RuleCondition, compile_pattern};
use crate::group::{LogicalOperator, RuleGroup, RuleNode};
use crate::RuleSet;

/// Checks a rule set against a column list without evaluating it.
///
/// Returns every violation found; an empty list means the rule set is valid.
pub fn validate_rule_set(rule_set: &RuleSet, columns: &[String]) -> Vec<String> {
    let mut violations = Vec::new();
    if rule_set.name.trim().is_empty() {
        violations.push("Rule set name is required".to_string());
    }
    validate_group(&rule_set.rule, columns, &mut violations);
    violations
}

fn validate_group(group: &RuleGroup, columns: &[String], violations: &mut Vec<String>) {
    if group.conditions.is_empty() {
        violations.push("Rule group must contain at least one condition".to_string());
    }
    if group.logical_operator == LogicalOperator::Not && group.conditions.len() > 1 {
        violations.push(format!(
            "NOT group must contain exactly one condition, found {}",
            group.conditions.len()
        ));
    }
    for child in &group.conditions {
        match child {
            RuleNode::Condition(condition) => validate_condition(condition, columns, violations),
            RuleNode::Group(nested) => validate_group(nested, columns, violations),
        }
    }
}

fn validate_condition(condition: &RuleCondition, columns: &[String], violations: &mut Vec<String>) {
    let column = &condition.column_name;
    if !columns.iter().any(|col| col == column) {
        violations.push(format!("Column '{column}' does not exist"));
    }
    match &condition.operator {
        Operator::Between if condition.second_value.is_none() => violations.push(format!(
            "Condition on '{column}' uses 'between' without a second value"
        )),
        Operator::In if !matches!(condition.value, Value::List(_)) => violations.push(format!(
            "Condition on '{column}' uses 'in' without an array value"
        )),
        Operator::Matches => {
            if let Err(err) =
                compile_pattern(&condition.value.to_text(), condition.is_case_sensitive())
            {
                violations.push(format!("Condition on '{column}': {err}"));
            }
        }
        Operator::Other(name) => {
            violations.push(format!("Condition on '{column}' uses unknown operator '{name}'"));
        }
        _ => {}
    }
}
