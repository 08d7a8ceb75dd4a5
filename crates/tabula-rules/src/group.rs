//! Boolean trees of conditions.

use serde::{Deserialize, Serialize};

use crate::condition::{EvaluationContext, RuleCondition, evaluate_condition};
use crate::RuleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
    #[serde(rename = "NOT", alias = "not")]
    Not,
}

/// A group child: either a nested group or a single condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleNode {
    Group(RuleGroup),
    Condition(RuleCondition),
}

impl From<RuleCondition> for RuleNode {
    fn from(value: RuleCondition) -> Self {
        Self::Condition(value)
    }
}

impl From<RuleGroup> for RuleNode {
    fn from(value: RuleGroup) -> Self {
        Self::Group(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    pub logical_operator: LogicalOperator,
    pub conditions: Vec<RuleNode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negate: bool,
}

impl RuleGroup {
    pub fn new(logical_operator: LogicalOperator, conditions: Vec<RuleNode>) -> Self {
        Self {
            logical_operator,
            conditions,
            negate: false,
        }
    }

    pub fn and(conditions: Vec<RuleNode>) -> Self {
        Self::new(LogicalOperator::And, conditions)
    }

    pub fn or(conditions: Vec<RuleNode>) -> Self {
        Self::new(LogicalOperator::Or, conditions)
    }

    pub fn not(condition: RuleNode) -> Self {
        Self::new(LogicalOperator::Not, vec![condition])
    }

    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}

/// Evaluates a group.
///
/// Every child is evaluated in order and the first error aborts the group;
/// there are no partial results. `negate` is applied after the logical
/// operator has combined the children.
pub fn evaluate_group(group: &RuleGroup, ctx: &EvaluationContext<'_>) -> Result<bool, RuleError> {
    if group.conditions.is_empty() {
        return Err(RuleError::EmptyGroup);
    }
    if group.logical_operator == LogicalOperator::Not && group.conditions.len() != 1 {
        return Err(RuleError::NotArity(group.conditions.len()));
    }

    let mut results = Vec::with_capacity(group.conditions.len());
    for child in &group.conditions {
        results.push(evaluate_node(child, ctx)?);
    }

    let combined = match group.logical_operator {
        LogicalOperator::And => results.iter().all(|r| *r),
        LogicalOperator::Or => results.iter().any(|r| *r),
        LogicalOperator::Not => !results[0],
    };
    Ok(combined != group.negate)
}

fn evaluate_node(node: &RuleNode, ctx: &EvaluationContext<'_>) -> Result<bool, RuleError> {
    match node {
        RuleNode::Condition(condition) => evaluate_condition(condition, ctx),
        RuleNode::Group(group) => evaluate_group(group, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operator;
    use tabula_model::{Row, RowId};

    fn fixture() -> (Row, Vec<String>) {
        let row = Row::new(RowId::new(0)).with("age", 30).with("city", "Oslo");
        (row, vec!["age".to_string(), "city".to_string()])
    }

    fn adult() -> RuleNode {
        RuleCondition::new("age", Operator::GreaterOrEqual, 18).into()
    }

    fn in_bergen() -> RuleNode {
        RuleCondition::new("city", Operator::Equal, "Bergen").into()
    }

    #[test]
    fn and_or_combine_children() {
        let (row, cols) = fixture();
        let ctx = EvaluationContext::new(&row, &cols);
        assert_eq!(evaluate_group(&RuleGroup::and(vec![adult(), in_bergen()]), &ctx), Ok(false));
        assert_eq!(evaluate_group(&RuleGroup::or(vec![adult(), in_bergen()]), &ctx), Ok(true));
    }

    #[test]
    fn negate_applies_after_combination() {
        let (row, cols) = fixture();
        let ctx = EvaluationContext::new(&row, &cols);
        let group = RuleGroup::or(vec![adult(), in_bergen()]).negated();
        assert_eq!(evaluate_group(&group, &ctx), Ok(false));
        let not = RuleGroup::not(in_bergen()).negated();
        assert_eq!(evaluate_group(&not, &ctx), Ok(false));
    }

    #[test]
    fn nested_groups_evaluate_recursively() {
        let (row, cols) = fixture();
        let ctx = EvaluationContext::new(&row, &cols);
        let inner = RuleGroup::not(in_bergen());
        let outer = RuleGroup::and(vec![adult(), inner.into()]);
        assert_eq!(evaluate_group(&outer, &ctx), Ok(true));
    }

    #[test]
    fn child_error_aborts_group() {
        let (row, cols) = fixture();
        let ctx = EvaluationContext::new(&row, &cols);
        let missing: RuleNode = RuleCondition::new("salary", Operator::GreaterThan, 1).into();
        let group = RuleGroup::or(vec![adult(), missing]);
        assert_eq!(
            evaluate_group(&group, &ctx),
            Err(RuleError::ColumnNotFound("salary".to_string()))
        );
    }

    #[test]
    fn empty_group_is_an_error() {
        let (row, cols) = fixture();
        let ctx = EvaluationContext::new(&row, &cols);
        assert_eq!(
            evaluate_group(&RuleGroup::and(vec![]), &ctx),
            Err(RuleError::EmptyGroup)
        );
    }
}
