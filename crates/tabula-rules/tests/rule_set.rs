//! Tests for rule sets, dataset application, and validation.

use tabula_model::{DatasetId, Row, RowId, Table, Value};
use tabula_rules::{
    EvaluationContext, LogicalOperator, Operator, RuleCondition, RuleError, RuleGroup, RuleNode,
    RuleSet, apply_rule_set_to_dataset, evaluate_group, evaluate_rule_set, parse_rule_set,
    validate_rule_set,
};

fn ages(values: &[Value]) -> Table {
    Table::from_records(
        DatasetId::new("people").unwrap(),
        vec!["age".to_string()],
        values.iter().cloned().map(|v| vec![v]).collect(),
    )
    .unwrap()
}

fn adult_rule() -> RuleSet {
    let rule = RuleGroup::and(vec![
        RuleCondition::new("age", Operator::GreaterOrEqual, 18).into(),
    ]);
    RuleSet::custom("adult", rule, "adult", "minor")
}

#[test]
fn test_adult_minor_mapping_end_to_end() {
    let table = ages(&[17.into(), 25.into(), 40.into()]);
    let applied = apply_rule_set_to_dataset(&table, &adult_rule(), "status").unwrap();

    assert!(applied.created_column);
    assert!(applied.failed_rows.is_empty());
    assert_eq!(applied.table.columns(), ["age", "status"]);
    let statuses: Vec<_> = applied.table.values("status").cloned().collect();
    assert_eq!(
        statuses,
        vec![Value::text("minor"), Value::text("adult"), Value::text("adult")]
    );
    let ages: Vec<_> = applied.table.values("age").cloned().collect();
    assert_eq!(ages, vec![Value::Number(17.0), Value::Number(25.0), Value::Number(40.0)]);
}

#[test]
fn test_not_group_with_two_children_is_an_error() {
    let row = Row::new(RowId::new(0)).with("age", 30);
    let cols = vec!["age".to_string()];
    let c1: RuleNode = RuleCondition::new("age", Operator::GreaterThan, 1).into();
    let c2: RuleNode = RuleCondition::new("age", Operator::LessThan, 100).into();
    let group = RuleGroup::new(LogicalOperator::Not, vec![c1, c2]);
    assert_eq!(
        evaluate_group(&group, &EvaluationContext::new(&row, &cols)),
        Err(RuleError::NotArity(2))
    );
}

#[test]
fn test_custom_values_default_to_booleans() {
    let row = Row::new(RowId::new(0)).with("age", 30);
    let cols = vec!["age".to_string()];
    let mut rule_set = adult_rule();
    rule_set.true_value = None;
    let outcome = evaluate_rule_set(&rule_set, &EvaluationContext::new(&row, &cols));
    assert_eq!(outcome.value, Value::Bool(true));
    assert!(outcome.error.is_none());
}

#[test]
fn test_evaluation_error_yields_default_and_surfaces_error() {
    let row = Row::new(RowId::new(0)).with("age", 30);
    let cols = vec!["age".to_string()];
    let rule = RuleGroup::and(vec![RuleCondition::new("height", Operator::GreaterThan, 1).into()]);

    let outcome = evaluate_rule_set(
        &RuleSet::boolean("tall", rule.clone()),
        &EvaluationContext::new(&row, &cols),
    );
    assert_eq!(outcome.value, Value::Bool(false));
    assert_eq!(outcome.error, Some(RuleError::ColumnNotFound("height".to_string())));

    let outcome = evaluate_rule_set(
        &RuleSet::boolean("tall", rule).with_default("unknown"),
        &EvaluationContext::new(&row, &cols),
    );
    assert_eq!(outcome.value, Value::text("unknown"));
}

#[test]
fn test_failing_rows_receive_default_without_aborting() {
    let table = ages(&[12.into(), 70.into()]);
    let rule = RuleGroup::and(vec![RuleCondition::new("income", Operator::GreaterThan, 1).into()]);
    let rule_set = RuleSet::custom("rich", rule, "yes", "no").with_default("check");
    let applied = apply_rule_set_to_dataset(&table, &rule_set, "rich").unwrap();

    assert_eq!(applied.failed_rows.len(), 2);
    assert_eq!(applied.failed_rows[1].index, 1);
    assert_eq!(
        applied.failed_rows[0].error,
        RuleError::ColumnNotFound("income".to_string())
    );
    let values: Vec<_> = applied.table.values("rich").cloned().collect();
    assert_eq!(values, vec![Value::text("check"), Value::text("check")]);
}

#[test]
fn test_existing_target_column_is_overwritten_in_place() {
    let table = ages(&["12".into(), "old".into(), 70.into()]);
    let rule = RuleGroup::and(vec![
        RuleCondition::new("age", Operator::Matches, "^[0-9]+$").into(),
        RuleCondition::new("age", Operator::GreaterThan, 65).into(),
    ]);
    let rule_set = RuleSet::custom("senior", rule, "yes", "no");
    let applied = apply_rule_set_to_dataset(&table, &rule_set, "age").unwrap();

    assert!(!applied.created_column);
    assert_eq!(applied.table.columns(), ["age"]);
    let values: Vec<_> = applied.table.values("age").cloned().collect();
    assert_eq!(values, vec![Value::text("no"), Value::text("no"), Value::text("yes")]);
}

#[test]
fn test_parses_serialized_rule_set() {
    let json = r#"{
        "name": "status",
        "rule": {
            "logicalOperator": "OR",
            "conditions": [
                {"columnName": "age", "operator": "<", "value": 13},
                {
                    "logicalOperator": "NOT",
                    "conditions": [{
                        "columnName": "age",
                        "operator": "between",
                        "value": 13,
                        "secondValue": 64
                    }]
                }
            ]
        },
        "resultType": "custom",
        "trueValue": "discount",
        "falseValue": "full"
    }"#;
    let rule_set = parse_rule_set(json).unwrap();
    let table = ages(&[10.into(), 30.into(), 70.into()]);
    let applied = apply_rule_set_to_dataset(&table, &rule_set, "fare").unwrap();
    let fares: Vec<_> = applied.table.values("fare").cloned().collect();
    assert_eq!(
        fares,
        vec![Value::text("discount"), Value::text("full"), Value::text("discount")]
    );
}

#[test]
fn test_malformed_rule_set_is_a_parse_error() {
    assert!(matches!(parse_rule_set("{\"name\": 1}"), Err(RuleError::Parse(_))));
}

#[test]
fn test_validation_reports_every_violation() {
    let rule = RuleGroup::and(vec![
        RuleCondition::new("height", Operator::GreaterThan, 1).into(),
        RuleCondition::new("age", Operator::Between, 1).into(),
        RuleCondition::new("age", Operator::In, "adult").into(),
        RuleGroup::new(
            LogicalOperator::Not,
            vec![
                RuleCondition::new("age", Operator::Equal, 1).into(),
                RuleCondition::new("age", Operator::Equal, 2).into(),
            ],
        )
        .into(),
    ]);
    let violations = validate_rule_set(&RuleSet::boolean("check", rule), &["age".to_string()]);
    assert_eq!(
        violations,
        vec![
            "Column 'height' does not exist".to_string(),
            "Condition on 'age' uses 'between' without a second value".to_string(),
            "Condition on 'age' uses 'in' without an array value".to_string(),
            "NOT group must contain exactly one condition, found 2".to_string(),
        ]
    );
}

#[test]
fn test_valid_rule_set_has_no_violations() {
    assert!(validate_rule_set(&adult_rule(), &["age".to_string()]).is_empty());
}
