//! Tests for numeric transforms: rounding, arithmetic, math, normalization,
//! binning, and validation.

use serde_json::json;
use tabula_model::{DatasetId, Operation, Table, Value};
use tabula_transform::numeric::binning::{BinMethod, BinParams, bin_column};
use tabula_transform::numeric::normalize::{NormalizeMethod, NormalizeParams, normalize_column};
use tabula_transform::numeric::{MathOp, MathParams, math_transform_column};
use tabula_transform::{TransformError, dispatch};

fn column(values: Vec<Value>) -> Table {
    Table::from_records(
        DatasetId::new("numbers").unwrap(),
        vec!["x".to_string()],
        values.into_iter().map(|v| vec![v]).collect(),
    )
    .unwrap()
}

fn values(table: &Table) -> Vec<Value> {
    table.values("x").cloned().collect()
}

fn numeric_op(params: serde_json::Value) -> Operation {
    Operation::new("numeric_transform", "x").with_parameters(params)
}

// =========================================================================
// Rounding and arithmetic
// =========================================================================

#[test]
fn test_banker_rounding_goes_to_even() {
    let table = column(vec![2.5.into(), 3.5.into(), "x".into(), Value::Null]);
    let op = numeric_op(json!({"transformType": "round", "method": "banker", "decimals": 0}));
    let result = dispatch(&table, &op);
    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        values(&result.data.unwrap()),
        vec![Value::Number(2.0), Value::Number(4.0), Value::text("x"), Value::Null]
    );
}

#[test]
fn test_rounding_rejects_excess_precision() {
    let table = column(vec![1.0.into()]);
    let op = numeric_op(json!({"transformType": "round", "decimals": 16}));
    let result = dispatch(&table, &op);
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Decimals must be between 0 and 15"));
}

#[test]
fn test_rounding_keeps_values_too_large_to_scale() {
    let table = column(vec![1e300.into(), 1.25.into()]);
    let op = numeric_op(json!({"transformType": "round", "method": "nearest", "decimals": 15}));
    let result = dispatch(&table, &op);
    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        values(&result.data.unwrap()),
        vec![Value::Number(1e300), Value::Number(1.25)]
    );
}

#[test]
fn test_divide_by_zero_is_rejected() {
    let table = column(vec![4.0.into(), 8.0.into()]);
    let op = numeric_op(json!({"transformType": "arithmetic", "operation": "divide", "value": 0}));
    let result = dispatch(&table, &op);
    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(result.error.as_deref(), Some("Cannot divide by zero"));
}

#[test]
fn test_arithmetic_coerces_numeric_text() {
    let table = column(vec![1.0.into(), "2".into(), "abc".into()]);
    let op = numeric_op(json!({
        "transformType": "arithmetic",
        "operation": "multiply",
        "value": 3
    }));
    let result = dispatch(&table, &op);
    assert_eq!(
        values(&result.data.unwrap()),
        vec![Value::Number(3.0), Value::Number(6.0), Value::text("abc")]
    );
}

// =========================================================================
// Math functions
// =========================================================================

#[test]
fn test_log_rejects_non_positive_values_without_changes() {
    let table = column(vec![10.0.into(), 0.0.into(), 5.0.into()]);
    let before = values(&table);
    let params = MathParams {
        operation: MathOp::Log,
        exponent: 2.0,
    };
    let err = math_transform_column(&table, "x", &params).unwrap_err();
    assert_eq!(err, TransformError::NonPositiveLog { operation: "log" });
    assert_eq!(
        err.to_string(),
        "Cannot apply log to values less than or equal to zero"
    );
    assert_eq!(values(&table), before);
}

#[test]
fn test_sqrt_rejects_negative_values() {
    let table = column(vec![4.0.into(), (-1.0).into()]);
    let op = numeric_op(json!({"transformType": "math", "operation": "sqrt"}));
    let result = dispatch(&table, &op);
    assert_eq!(result.error.as_deref(), Some("Cannot apply sqrt to negative values"));
}

#[test]
fn test_overflowing_results_become_null() {
    let table = column(vec![1000.0.into(), 0.0.into()]);
    let op = numeric_op(json!({"transformType": "math", "operation": "exp"}));
    let result = dispatch(&table, &op);
    assert_eq!(values(&result.data.unwrap()), vec![Value::Null, Value::Number(1.0)]);
}

#[test]
fn test_power_uses_exponent() {
    let table = column(vec![2.0.into(), 3.0.into()]);
    let op = numeric_op(json!({"transformType": "math", "operation": "power", "exponent": 3}));
    let result = dispatch(&table, &op);
    assert_eq!(values(&result.data.unwrap()), vec![Value::Number(8.0), Value::Number(27.0)]);
}

// =========================================================================
// Normalization
// =========================================================================

#[test]
fn test_minmax_scales_to_unit_range() {
    let table = column(vec![0.0.into(), 5.0.into(), 10.0.into(), Value::Null]);
    let out = normalize_column(&table, "x", &NormalizeParams::default()).unwrap();
    assert_eq!(
        values(&out.table),
        vec![Value::Number(0.0), Value::Number(0.5), Value::Number(1.0), Value::Null]
    );
}

#[test]
fn test_minmax_neg11_uses_symmetric_range() {
    let table = column(vec![0.0.into(), 5.0.into(), 10.0.into()]);
    let params = NormalizeParams {
        method: NormalizeMethod::MinMaxNeg11,
        ..NormalizeParams::default()
    };
    let out = normalize_column(&table, "x", &params).unwrap();
    assert_eq!(
        values(&out.table),
        vec![Value::Number(-1.0), Value::Number(0.0), Value::Number(1.0)]
    );
}

#[test]
fn test_zscore_uses_population_std() {
    let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let table = column(data.iter().map(|v| Value::Number(*v)).collect());
    let params = NormalizeParams {
        method: NormalizeMethod::Zscore,
        ..NormalizeParams::default()
    };
    let out = normalize_column(&table, "x", &params).unwrap();
    assert_eq!(out.table.values("x").next(), Some(&Value::Number(-1.5)));
    assert_eq!(out.table.values("x").last(), Some(&Value::Number(2.0)));
}

#[test]
fn test_robust_scaling_uses_median_and_iqr() {
    let table = column(vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()]);
    let params = NormalizeParams {
        method: NormalizeMethod::Robust,
        ..NormalizeParams::default()
    };
    let out = normalize_column(&table, "x", &params).unwrap();
    assert_eq!(out.table.values("x").last(), Some(&Value::Number(1.0)));
}

#[test]
fn test_constant_column_cannot_be_normalized() {
    let table = column(vec![3.0.into(), 3.0.into()]);
    let err = normalize_column(&table, "x", &NormalizeParams::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot normalize column 'x': all values are identical"
    );

    let params = NormalizeParams {
        method: NormalizeMethod::Zscore,
        ..NormalizeParams::default()
    };
    let err = normalize_column(&table, "x", &params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot normalize column 'x': standard deviation is zero"
    );
}

#[test]
fn test_normalize_requires_numeric_values() {
    let table = column(vec!["a".into(), Value::Null]);
    let err = normalize_column(&table, "x", &NormalizeParams::default()).unwrap_err();
    assert_eq!(err, TransformError::NoNumericValues("x".to_string()));
}

#[test]
fn test_custom_range_must_be_ordered() {
    let table = column(vec![1.0.into(), 2.0.into()]);
    let op = numeric_op(json!({
        "transformType": "normalize",
        "method": "custom",
        "customMin": 5,
        "customMax": 5
    }));
    let result = dispatch(&table, &op);
    assert!(!result.success);
}

// =========================================================================
// Binning
// =========================================================================

#[test]
fn test_equal_width_bins_label_every_value() {
    let table = column(vec![
        0.0.into(),
        5.0.into(),
        10.0.into(),
        Value::Null,
        "n/a".into(),
    ]);
    let params = BinParams {
        method: BinMethod::EqualWidth,
        bins: 2,
        labels: None,
    };
    let out = bin_column(&table, "x", &params).unwrap();
    let rendered: Vec<String> = out
        .table
        .values("x")
        .map(|v| match v {
            Value::Null => "<null>".to_string(),
            other => other.to_text(),
        })
        .collect();
    insta::assert_snapshot!(
        rendered.join(" | "),
        @"0.00 - 5.00 | 5.00 - 10.00 | 5.00 - 10.00 | <null> | N/A"
    );
}

fn one_to_eight() -> Table {
    column((1..=8).map(|v| Value::Number(f64::from(v))).collect())
}

fn bin_labels(method: BinMethod, bins: usize) -> Vec<Value> {
    let params = BinParams {
        method,
        bins,
        labels: None,
    };
    values(&bin_column(&one_to_eight(), "x", &params).unwrap().table)
}

#[test]
fn test_quantile_bins_interpolate_edges() {
    let expected = ["1.00 - 2.75", "2.75 - 4.50", "4.50 - 6.25", "6.25 - 8.00"];
    let expected: Vec<Value> = expected
        .iter()
        .flat_map(|label| [Value::text(*label), Value::text(*label)])
        .collect();
    assert_eq!(bin_labels(BinMethod::Quantile, 4), expected);
}

#[test]
fn test_equal_freq_bins_start_at_sorted_positions() {
    let expected = ["1.00 - 3.00", "3.00 - 5.00", "5.00 - 7.00", "7.00 - 8.00"];
    let expected: Vec<Value> = expected
        .iter()
        .flat_map(|label| [Value::text(*label), Value::text(*label)])
        .collect();
    assert_eq!(bin_labels(BinMethod::EqualFreq, 4), expected);
}

#[test]
fn test_binning_requires_numeric_values() {
    let table = column(vec!["a".into(), Value::Null]);
    let err = bin_column(&table, "x", &BinParams::default()).unwrap_err();
    assert_eq!(err, TransformError::NoNumericValues("x".to_string()));

    let op = numeric_op(json!({"transformType": "bin", "method": "quantile", "bins": 3}));
    let result = dispatch(&table, &op);
    assert_eq!(
        result.error.as_deref(),
        Some("Column 'x' contains no numeric values")
    );
}

#[test]
fn test_custom_bin_labels_must_match_count() {
    let table = column(vec![1.0.into(), 2.0.into()]);
    let op = numeric_op(json!({
        "transformType": "bin",
        "bins": 3,
        "labels": ["low", "high"]
    }));
    let result = dispatch(&table, &op);
    assert_eq!(result.error.as_deref(), Some("Expected 3 bin labels, got 2"));
}

#[test]
fn test_custom_bin_labels_are_used() {
    let table = column(vec![1.0.into(), 9.0.into()]);
    let op = numeric_op(json!({
        "transformType": "bin",
        "bins": 2,
        "labels": ["low", "high"]
    }));
    let result = dispatch(&table, &op);
    assert_eq!(
        values(&result.data.unwrap()),
        vec![Value::text("low"), Value::text("high")]
    );
}

// =========================================================================
// Validation and conversion
// =========================================================================

#[test]
fn test_clamp_limits_values() {
    let table = column(vec![(-5.0).into(), 5.0.into(), 15.0.into()]);
    let op = numeric_op(json!({
        "transformType": "validate",
        "action": "clamp",
        "clampMin": 0,
        "clampMax": 10
    }));
    let result = dispatch(&table, &op);
    assert_eq!(
        values(&result.data.unwrap()),
        vec![Value::Number(0.0), Value::Number(5.0), Value::Number(10.0)]
    );
}

#[test]
fn test_clamp_bounds_must_be_ordered() {
    let table = column(vec![1.0.into()]);
    let op = numeric_op(json!({
        "transformType": "validate",
        "action": "clamp",
        "clampMin": 10,
        "clampMax": 0
    }));
    assert!(!dispatch(&table, &op).success);
}

#[test]
fn test_remove_negatives_nulls_out_cells() {
    let table = column(vec![(-1.0).into(), 2.0.into()]);
    let op = numeric_op(json!({"transformType": "validate", "action": "remove_negatives"}));
    let result = dispatch(&table, &op);
    let data = result.data.unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(values(&data), vec![Value::Null, Value::Number(2.0)]);
}

#[test]
fn test_integers_only_floors() {
    let table = column(vec![2.7.into(), (-2.5).into(), 3.0.into()]);
    let op = numeric_op(json!({"transformType": "validate", "action": "integers_only"}));
    let result = dispatch(&table, &op);
    assert_eq!(
        values(&result.data.unwrap()),
        vec![Value::Number(2.0), Value::Number(-3.0), Value::Number(3.0)]
    );
}

#[test]
fn test_convert_to_number_and_text() {
    let table = column(vec!["12".into(), "abc".into(), 3.0.into()]);
    let op = numeric_op(json!({"transformType": "convert", "target": "number"}));
    assert_eq!(
        values(&dispatch(&table, &op).data.unwrap()),
        vec![Value::Number(12.0), Value::Null, Value::Number(3.0)]
    );

    let op = numeric_op(json!({"transformType": "convert", "target": "text"}));
    assert_eq!(
        values(&dispatch(&table, &op).data.unwrap()),
        vec![Value::text("12"), Value::text("abc"), Value::text("3")]
    );
}
