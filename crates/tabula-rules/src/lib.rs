//! Rule evaluation for Tabula tables.
//!
//! - **condition**: a single typed comparison against one row value
//! - **group**: AND/OR/NOT trees of conditions
//! - **rule_set**: named rules with typed outputs, applied across a table
//! - **validate**: static checks that report every violation at once

pub mod condition;
pub mod error;
pub mod group;
pub mod rule_set;
pub mod validate;

pub use condition::{
    EvaluationContext, Operator, PatternCache, RuleCondition, evaluate_condition,
};
pub use error::RuleError;
pub use group::{LogicalOperator, RuleGroup, RuleNode, evaluate_group};
pub use rule_set::{
    ResultType, RowFailure, RuleApplication, RuleSet, RuleSetOutcome, apply_rule_set_to_dataset,
    evaluate_rule_set, parse_rule_set,
};
pub use validate::validate_rule_set;
