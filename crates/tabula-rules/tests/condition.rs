//! Tests for single-condition evaluation.

use tabula_model::{Row, RowId, Value};
use tabula_rules::{
    EvaluationContext, Operator, PatternCache, RuleCondition, RuleError, evaluate_condition,
};

fn columns() -> Vec<String> {
    ["score", "name", "visit"].iter().map(ToString::to_string).collect()
}

fn row(score: impl Into<Value>, name: &str, visit: &str) -> Row {
    Row::new(RowId::new(1))
        .with("score", score)
        .with("name", name)
        .with("visit", visit)
}

fn eval(condition: &RuleCondition, row: &Row) -> Result<bool, RuleError> {
    let cols = columns();
    evaluate_condition(condition, &EvaluationContext::new(row, &cols))
}

#[test]
fn test_missing_column_is_an_error() {
    let cond = RuleCondition::new("weight", Operator::GreaterThan, 1);
    assert_eq!(
        eval(&cond, &row(1, "a", "")),
        Err(RuleError::ColumnNotFound("weight".to_string()))
    );
}

#[test]
fn test_ordering_with_non_numeric_side_is_false_not_error() {
    let cond = RuleCondition::new("score", Operator::GreaterThan, 10);
    assert_eq!(eval(&cond, &row("n/a", "a", "")), Ok(false));
    assert_eq!(eval(&cond, &row(Value::Null, "a", "")), Ok(false));

    let cond = RuleCondition::new("score", Operator::LessOrEqual, "ten");
    assert_eq!(eval(&cond, &row(3, "a", "")), Ok(false));
}

#[test]
fn test_equality_prefers_numeric_comparison() {
    let cond = RuleCondition::new("score", Operator::Equal, "10.0");
    assert_eq!(eval(&cond, &row(10, "a", "")), Ok(true));

    let cond = RuleCondition::new("name", Operator::Equal, "ALICE");
    assert_eq!(eval(&cond, &row(1, "alice", "")), Ok(false));
    assert_eq!(eval(&cond.clone().case_insensitive(), &row(1, "alice", "")), Ok(true));

    let cond = RuleCondition::new("name", Operator::NotEqual, "bob");
    assert_eq!(eval(&cond, &row(1, "alice", "")), Ok(true));
}

#[test]
fn test_string_operators_honor_case_flag() {
    let r = row(1, "Dr. Smith", "");
    let starts = RuleCondition::new("name", Operator::StartsWith, "dr.");
    assert_eq!(eval(&starts, &r), Ok(false));
    assert_eq!(eval(&starts.case_insensitive(), &r), Ok(true));

    let ends = RuleCondition::new("name", Operator::EndsWith, "Smith");
    assert_eq!(eval(&ends, &r), Ok(true));

    let contains = RuleCondition::new("score", Operator::Contains, "1");
    assert_eq!(eval(&contains, &row(21, "x", "")), Ok(true));
}

#[test]
fn test_matches_compiles_pattern_and_reports_invalid_regex() {
    let cond = RuleCondition::new("name", Operator::Matches, "^a.*e$").case_insensitive();
    assert_eq!(eval(&cond, &row(1, "ALICE", "")), Ok(true));

    let bad = RuleCondition::new("name", Operator::Matches, "(unclosed");
    assert!(matches!(
        eval(&bad, &row(1, "x", "")),
        Err(RuleError::InvalidPattern { .. })
    ));
}

#[test]
fn test_pattern_cache_compiles_each_pattern_once() {
    let cols = columns();
    let patterns = PatternCache::new();
    let cond = RuleCondition::new("name", Operator::Matches, "^b");
    let rows = [row(1, "bob", ""), row(2, "ann", ""), row(3, "bea", "")];
    let matched: Vec<bool> = rows
        .iter()
        .map(|r| {
            let ctx = EvaluationContext::new(r, &cols).with_patterns(&patterns);
            evaluate_condition(&cond, &ctx).unwrap()
        })
        .collect();
    assert_eq!(matched, vec![true, false, true]);
    assert_eq!(patterns.len(), 1);

    let insensitive = RuleCondition::new("name", Operator::Matches, "^b").case_insensitive();
    let ctx = EvaluationContext::new(&rows[0], &cols).with_patterns(&patterns);
    assert_eq!(evaluate_condition(&insensitive, &ctx), Ok(true));
    assert_eq!(patterns.len(), 2);

    let bad = RuleCondition::new("name", Operator::Matches, "(unclosed");
    for r in &rows {
        let ctx = EvaluationContext::new(r, &cols).with_patterns(&patterns);
        assert!(matches!(
            evaluate_condition(&bad, &ctx),
            Err(RuleError::InvalidPattern { .. })
        ));
    }
    assert_eq!(patterns.len(), 3);
}

#[test]
fn test_in_requires_an_array() {
    let cond = RuleCondition::new("name", Operator::In, "alice");
    assert_eq!(eval(&cond, &row(1, "alice", "")), Err(RuleError::InRequiresList));
}

#[test]
fn test_between_is_inclusive_numeric_then_date() {
    let cond = RuleCondition::new("score", Operator::Between, 10).with_second_value(20);
    assert_eq!(eval(&cond, &row(10, "a", "")), Ok(true));
    assert_eq!(eval(&cond, &row(20, "a", "")), Ok(true));
    assert_eq!(eval(&cond, &row(21, "a", "")), Ok(false));

    let dates = RuleCondition::new("visit", Operator::Between, "2024-01-01")
        .with_second_value("2024-06-30");
    assert_eq!(eval(&dates, &row(1, "a", "2024-03-15")), Ok(true));
    assert_eq!(eval(&dates, &row(1, "a", "07/01/2024")), Ok(false));
    assert_eq!(eval(&dates, &row(1, "a", "soon")), Ok(false));
}

#[test]
fn test_between_without_second_value_is_an_error() {
    let cond = RuleCondition::new("score", Operator::Between, 10);
    assert_eq!(eval(&cond, &row(10, "a", "")), Err(RuleError::MissingSecondValue));
}

#[test]
fn test_unknown_operator_is_an_error() {
    let cond = RuleCondition::new("score", Operator::from("~=".to_string()), 1);
    assert_eq!(
        eval(&cond, &row(1, "a", "")),
        Err(RuleError::UnknownOperator("~=".to_string()))
    );
}

#[test]
fn test_emptiness_operators() {
    let empty = RuleCondition::new("visit", Operator::IsEmpty, Value::Null);
    assert_eq!(eval(&empty, &row(1, "a", "  ")), Ok(true));
    let not_empty = RuleCondition::new("visit", Operator::IsNotEmpty, Value::Null);
    assert_eq!(eval(&not_empty, &row(1, "a", "x")), Ok(true));
}
