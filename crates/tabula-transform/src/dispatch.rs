//! Operation dispatch.
//!
//! [`dispatch`] is the boundary the editor calls: it never panics and never
//! returns an error, only a [`TransformResult`] with `success: false`.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tabula_model::{Operation, Table, TransformResult};
use tracing::{debug, warn};

use crate::error::{Result, TransformError};
use crate::frame::TransformOutput;
use crate::operation::{NumericTransform, Transform};
use crate::{boolean, categorical, columns, datetime, mapping, missing, numeric, text};

/// Every accepted operation type.
pub const OPERATION_TYPES: &[&str] = &[
    "numeric_transform",
    "fill_missing",
    "rename_column",
    "delete_column",
    "duplicate_column",
    "trim",
    "change_case",
    "find_replace",
    "split_column",
    "concatenate",
    "extract_substring",
    "pad_text",
    "remove_characters",
    "rename_categories",
    "merge_categories",
    "split_categories",
    "encode_categorical",
    "group_rare",
    "assign_default",
    "boolean_to_01",
    "invert_boolean",
    "fill_boolean",
    "datetime_format",
    "datetime_extract",
    "datetime_arithmetic",
    "datetime_truncate",
    "datetime_timezone",
    "datetime_combine",
    "datetime_split",
    "advanced_mapping",
];

/// Accepted `transformType` values of `numeric_transform`.
pub const NUMERIC_TRANSFORM_TYPES: &[&str] = &[
    "round",
    "arithmetic",
    "math",
    "normalize",
    "bin",
    "validate",
    "convert",
];

fn params<T: DeserializeOwned>(kind: &str, bag: &JsonValue) -> Result<T> {
    serde_json::from_value(bag.clone()).map_err(|err| TransformError::InvalidParameters {
        operation: kind.to_string(),
        message: err.to_string(),
    })
}

fn parse_numeric(bag: &JsonValue) -> Result<NumericTransform> {
    let kind = "numeric_transform";
    let sub = match bag.get("transformType") {
        Some(JsonValue::String(sub)) => sub.as_str(),
        Some(_) => {
            return Err(TransformError::InvalidParameters {
                operation: kind.to_string(),
                message: "transformType must be a string".to_string(),
            });
        }
        None => {
            return Err(TransformError::InvalidParameters {
                operation: kind.to_string(),
                message: "missing field `transformType`".to_string(),
            });
        }
    };
    Ok(match sub {
        "round" => NumericTransform::Round(params(kind, bag)?),
        "arithmetic" => NumericTransform::Arithmetic(params(kind, bag)?),
        "math" => NumericTransform::Math(params(kind, bag)?),
        "normalize" => NumericTransform::Normalize(params(kind, bag)?),
        "bin" => NumericTransform::Bin(params(kind, bag)?),
        "validate" => NumericTransform::Validate(params(kind, bag)?),
        "convert" => NumericTransform::Convert(params(kind, bag)?),
        other => return Err(TransformError::UnknownOperation(other.to_string())),
    })
}

/// Parses an operation type and its parameter bag. A `null` bag is read as
/// an empty object.
pub fn parse_transform(kind: &str, parameters: &JsonValue) -> Result<Transform> {
    let empty = JsonValue::Object(serde_json::Map::new());
    let bag = if parameters.is_null() { &empty } else { parameters };
    Ok(match kind {
        "numeric_transform" => Transform::Numeric(parse_numeric(bag)?),
        "fill_missing" => Transform::FillMissing(params(kind, bag)?),
        "rename_column" => Transform::RenameColumn(params(kind, bag)?),
        "delete_column" => Transform::DeleteColumn,
        "duplicate_column" => Transform::DuplicateColumn(params(kind, bag)?),
        "trim" => Transform::Trim(params(kind, bag)?),
        "change_case" => Transform::ChangeCase(params(kind, bag)?),
        "find_replace" => Transform::FindReplace(params(kind, bag)?),
        "split_column" => Transform::SplitColumn(params(kind, bag)?),
        "concatenate" => Transform::Concatenate(params(kind, bag)?),
        "extract_substring" => Transform::ExtractSubstring(params(kind, bag)?),
        "pad_text" => Transform::PadText(params(kind, bag)?),
        "remove_characters" => Transform::RemoveCharacters(params(kind, bag)?),
        "rename_categories" => Transform::RenameCategories(params(kind, bag)?),
        "merge_categories" => Transform::MergeCategories(params(kind, bag)?),
        "split_categories" => Transform::SplitCategories(params(kind, bag)?),
        "encode_categorical" => Transform::EncodeCategorical(params(kind, bag)?),
        "group_rare" => Transform::GroupRare(params(kind, bag)?),
        "assign_default" => Transform::AssignDefault(params(kind, bag)?),
        "boolean_to_01" => Transform::BooleanTo01,
        "invert_boolean" => Transform::InvertBoolean,
        "fill_boolean" => Transform::FillBoolean(params(kind, bag)?),
        "datetime_format" => Transform::DatetimeFormat(params(kind, bag)?),
        "datetime_extract" => Transform::DatetimeExtract(params(kind, bag)?),
        "datetime_arithmetic" => Transform::DatetimeArithmetic(params(kind, bag)?),
        "datetime_truncate" => Transform::DatetimeTruncate(params(kind, bag)?),
        "datetime_timezone" => Transform::DatetimeTimezone(params(kind, bag)?),
        "datetime_combine" => Transform::DatetimeCombine(params(kind, bag)?),
        "datetime_split" => Transform::DatetimeSplit,
        "advanced_mapping" => Transform::AdvancedMapping(params(kind, bag)?),
        other => return Err(TransformError::UnknownOperation(other.to_string())),
    })
}

fn execute_numeric(
    table: &Table,
    column: &str,
    transform: &NumericTransform,
) -> Result<TransformOutput> {
    match transform {
        NumericTransform::Round(p) => numeric::round_column(table, column, p),
        NumericTransform::Arithmetic(p) => numeric::arithmetic_column(table, column, p),
        NumericTransform::Math(p) => numeric::math_transform_column(table, column, p),
        NumericTransform::Normalize(p) => numeric::normalize::normalize_column(table, column, p),
        NumericTransform::Bin(p) => numeric::binning::bin_column(table, column, p),
        NumericTransform::Validate(p) => numeric::validate_column(table, column, p),
        NumericTransform::Convert(p) => numeric::convert_column(table, column, p),
    }
}

/// Runs a parsed transform against `column`.
pub fn execute(table: &Table, column: &str, transform: &Transform) -> Result<TransformOutput> {
    match transform {
        Transform::Numeric(t) => execute_numeric(table, column, t),
        Transform::FillMissing(p) => missing::fill_missing(table, column, p),
        Transform::RenameColumn(p) => columns::rename_column(table, column, p),
        Transform::DeleteColumn => columns::delete_column(table, column),
        Transform::DuplicateColumn(p) => columns::duplicate_column(table, column, p),
        Transform::Trim(p) => text::trim_whitespace(table, column, p),
        Transform::ChangeCase(p) => text::change_case(table, column, p),
        Transform::FindReplace(p) => text::find_replace(table, column, p),
        Transform::SplitColumn(p) => text::split_column(table, column, p),
        Transform::Concatenate(p) => text::concatenate(table, column, p),
        Transform::ExtractSubstring(p) => text::extract_substring(table, column, p),
        Transform::PadText(p) => text::pad_text(table, column, p),
        Transform::RemoveCharacters(p) => text::remove_characters(table, column, p),
        Transform::RenameCategories(p) => categorical::rename_categories(table, column, p),
        Transform::MergeCategories(p) => categorical::merge_categories(table, column, p),
        Transform::SplitCategories(p) => categorical::split_categories(table, column, p),
        Transform::EncodeCategorical(p) => categorical::encode_categorical(table, column, p),
        Transform::GroupRare(p) => categorical::group_rare(table, column, p),
        Transform::AssignDefault(p) => categorical::assign_default(table, column, p),
        Transform::BooleanTo01 => boolean::boolean_to_01(table, column),
        Transform::InvertBoolean => boolean::invert_boolean(table, column),
        Transform::FillBoolean(p) => boolean::fill_boolean(table, column, p),
        Transform::DatetimeFormat(p) => datetime::datetime_format(table, column, p),
        Transform::DatetimeExtract(p) => datetime::datetime_extract(table, column, p),
        Transform::DatetimeArithmetic(p) => datetime::datetime_arithmetic(table, column, p),
        Transform::DatetimeTruncate(p) => datetime::datetime_truncate(table, column, p),
        Transform::DatetimeTimezone(p) => datetime::datetime_timezone(table, column, p),
        Transform::DatetimeCombine(p) => datetime::datetime_combine(table, column, p),
        Transform::DatetimeSplit => datetime::datetime_split(table, column),
        Transform::AdvancedMapping(p) => mapping::advanced_mapping(table, column, p),
    }
}

/// Parses and runs `operation` against `table`.
pub fn try_dispatch(table: &Table, operation: &Operation) -> Result<TransformOutput> {
    let transform = parse_transform(&operation.kind, &operation.parameters)?;
    let output = execute(table, &operation.column_name, &transform)?;
    if !transform.is_structural() && output.table.columns() != table.columns() {
        warn!(
            operation = %operation.kind,
            "non-structural operation changed the column layout"
        );
    }
    Ok(output)
}

/// Applies `operation` to `table`, reporting failures in the result.
pub fn dispatch(table: &Table, operation: &Operation) -> TransformResult {
    debug!(
        operation = %operation.kind,
        column = %operation.column_name,
        dataset = %table.id(),
        rows = table.len(),
        "dispatching operation"
    );
    match try_dispatch(table, operation) {
        Ok(output) => {
            debug!(
                operation = %operation.kind,
                new_columns = output.new_columns.len(),
                removed_columns = output.removed_columns.len(),
                "operation succeeded"
            );
            TransformResult::succeeded(output.table, output.new_columns, output.removed_columns)
        }
        Err(error) => {
            debug!(operation = %operation.kind, %error, "operation failed");
            TransformResult::failed(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_listed_type_parses_with_minimal_parameters() {
        for kind in ["delete_column", "boolean_to_01", "invert_boolean", "datetime_split", "trim"] {
            assert!(OPERATION_TYPES.contains(&kind));
            assert_eq!(parse_transform(kind, &JsonValue::Null).map(|t| t.kind()), Ok(kind));
        }
    }

    #[test]
    fn listed_types_are_all_known() {
        for kind in OPERATION_TYPES {
            let err = parse_transform(kind, &json!({}));
            assert!(
                !matches!(err, Err(TransformError::UnknownOperation(_))),
                "{kind} is listed but not parsed"
            );
        }
        for sub in NUMERIC_TRANSFORM_TYPES {
            let err = parse_transform("numeric_transform", &json!({ "transformType": sub }));
            assert!(
                !matches!(err, Err(TransformError::UnknownOperation(_))),
                "{sub} is listed but not parsed"
            );
        }
    }

    #[test]
    fn unknown_numeric_sub_type_names_the_sub_type() {
        let err = parse_transform("numeric_transform", &json!({ "transformType": "warp" }));
        assert_eq!(err, Err(TransformError::UnknownOperation("warp".to_string())));
    }
}
