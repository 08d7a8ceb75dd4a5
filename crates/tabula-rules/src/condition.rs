//! Single-condition evaluation.
//!
//! # Coercion
//!
//! - Ordering operators need both sides to coerce to finite numbers; when
//!   either side does not, the condition is *not satisfied* (no error).
//! - `==`, `!=` and `in` compare numerically when both sides coerce, and
//!   fall back to string comparison otherwise.
//! - String operators compare the text form of both sides, lower-casing
//!   both when `caseSensitive` is false.
//! - `between` is inclusive at both ends: numeric first, then dates.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tabula_model::{Row, Value, parse_datetime};

use crate::RuleError;

/// Comparison operator, serialized by its wire symbol.
///
/// Unrecognised symbols are kept as [`Operator::Other`] so evaluation can
/// report them instead of failing the whole rule set at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    NotEqual,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    In,
    Between,
    IsEmpty,
    IsNotEmpty,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Matches => "matches",
            Self::In => "in",
            Self::Between => "between",
            Self::IsEmpty => "isEmpty",
            Self::IsNotEmpty => "isNotEmpty",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(value: String) -> Self {
        match value.as_str() {
            ">" => Self::GreaterThan,
            "<" => Self::LessThan,
            ">=" => Self::GreaterOrEqual,
            "<=" => Self::LessOrEqual,
            "==" | "=" => Self::Equal,
            "!=" => Self::NotEqual,
            "contains" => Self::Contains,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "matches" => Self::Matches,
            "in" => Self::In,
            "between" => Self::Between,
            "isEmpty" => Self::IsEmpty,
            "isNotEmpty" => Self::IsNotEmpty,
            _ => Self::Other(value),
        }
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One comparison of a row's column value against a fixed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub column_name: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

impl RuleCondition {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column_name: column.into(),
            operator,
            value: value.into(),
            second_value: None,
            case_sensitive: None,
        }
    }

    #[must_use]
    pub fn with_second_value(mut self, value: impl Into<Value>) -> Self {
        self.second_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = Some(false);
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive.unwrap_or(true)
    }
}

/// Compiled `matches` patterns, keyed by source and case sensitivity.
///
/// Compile failures are cached as well and reported on every lookup.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RefCell<HashMap<(String, bool), Result<Regex, RuleError>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_match(
        &self,
        pattern: &str,
        case_sensitive: bool,
        haystack: &str,
    ) -> Result<bool, RuleError> {
        let mut compiled = self.compiled.borrow_mut();
        let entry = compiled
            .entry((pattern.to_string(), case_sensitive))
            .or_insert_with(|| compile_pattern(pattern, case_sensitive));
        match entry {
            Ok(regex) => Ok(regex.is_match(haystack)),
            Err(err) => Err(err.clone()),
        }
    }

    /// Number of distinct patterns seen.
    pub fn len(&self) -> usize {
        self.compiled.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.borrow().is_empty()
    }
}

/// The row being evaluated and the table's column list.
///
/// Without a [`PatternCache`], `matches` compiles its pattern on each call.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub row: &'a Row,
    pub columns: &'a [String],
    pub patterns: Option<&'a PatternCache>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(row: &'a Row, columns: &'a [String]) -> Self {
        Self {
            row,
            columns,
            patterns: None,
        }
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: &'a PatternCache) -> Self {
        self.patterns = Some(patterns);
        self
    }
}

/// Evaluates one condition against the context row.
pub fn evaluate_condition(
    condition: &RuleCondition,
    ctx: &EvaluationContext<'_>,
) -> Result<bool, RuleError> {
    if !ctx.columns.iter().any(|col| col == &condition.column_name) {
        return Err(RuleError::ColumnNotFound(condition.column_name.clone()));
    }
    let cell = ctx.row.get(&condition.column_name);
    let case_sensitive = condition.is_case_sensitive();
    let value = &condition.value;

    match &condition.operator {
        Operator::GreaterThan => Ok(compare_numeric(cell, value, |a, b| a > b)),
        Operator::LessThan => Ok(compare_numeric(cell, value, |a, b| a < b)),
        Operator::GreaterOrEqual => Ok(compare_numeric(cell, value, |a, b| a >= b)),
        Operator::LessOrEqual => Ok(compare_numeric(cell, value, |a, b| a <= b)),
        Operator::Equal => Ok(loose_equals(cell, value, case_sensitive)),
        Operator::NotEqual => Ok(!loose_equals(cell, value, case_sensitive)),
        Operator::Contains => Ok(compare_text(cell, value, case_sensitive, |h, n| {
            h.contains(n)
        })),
        Operator::StartsWith => Ok(compare_text(cell, value, case_sensitive, |h, n| {
            h.starts_with(n)
        })),
        Operator::EndsWith => Ok(compare_text(cell, value, case_sensitive, |h, n| {
            h.ends_with(n)
        })),
        Operator::Matches => {
            let pattern = value.to_text();
            let haystack = cell.to_text();
            match ctx.patterns {
                Some(cache) => cache.is_match(&pattern, case_sensitive, &haystack),
                None => Ok(compile_pattern(&pattern, case_sensitive)?.is_match(&haystack)),
            }
        }
        Operator::In => {
            let Value::List(items) = value else {
                return Err(RuleError::InRequiresList);
            };
            Ok(items
                .iter()
                .any(|item| loose_equals(cell, item, case_sensitive)))
        }
        Operator::Between => {
            let Some(upper) = &condition.second_value else {
                return Err(RuleError::MissingSecondValue);
            };
            Ok(in_range(cell, value, upper))
        }
        Operator::IsEmpty => Ok(cell.is_blank()),
        Operator::IsNotEmpty => Ok(!cell.is_blank()),
        Operator::Other(name) => Err(RuleError::UnknownOperator(name.clone())),
    }
}

/// Compiles a `matches` pattern, case-insensitive when requested.
pub(crate) fn compile_pattern(pattern: &str, case_sensitive: bool) -> Result<Regex, RuleError> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|err| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}

fn compare_numeric(cell: &Value, value: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (cell.as_number(), value.as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Numeric equality when both sides coerce, string equality otherwise.
pub fn loose_equals(cell: &Value, value: &Value, case_sensitive: bool) -> bool {
    if let (Some(a), Some(b)) = (cell.as_number(), value.as_number()) {
        return a == b;
    }
    let left = cell.to_text();
    let right = value.to_text();
    if case_sensitive {
        left == right
    } else {
        left.to_lowercase() == right.to_lowercase()
    }
}

fn compare_text(
    cell: &Value,
    value: &Value,
    case_sensitive: bool,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    let haystack = cell.to_text();
    let needle = value.to_text();
    if case_sensitive {
        test(&haystack, &needle)
    } else {
        test(&haystack.to_lowercase(), &needle.to_lowercase())
    }
}

fn in_range(cell: &Value, lower: &Value, upper: &Value) -> bool {
    if let (Some(v), Some(lo), Some(hi)) = (cell.as_number(), lower.as_number(), upper.as_number())
    {
        return lo <= v && v <= hi;
    }
    let parse = |value: &Value| parse_datetime(&value.to_text()).map(|parsed| parsed.value);
    match (parse(cell), parse(lower), parse(upper)) {
        (Some(v), Some(lo), Some(hi)) => lo <= v && v <= hi,
        _ => false,
    }
}
