//! Numeric column transforms.
//!
//! Cells that do not coerce to a finite number pass through unchanged. The
//! arithmetic and math transforms check the whole column before touching any
//! row, so they either transform every value or fail without a partial result.

pub mod binning;
pub mod normalize;
pub(crate) mod stats;

use serde::Deserialize;
use tabula_model::{Table, Value};

use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, map_cells, map_numeric, numeric_values, require_column};

/// Largest supported rounding precision.
pub const MAX_DECIMALS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundMethod {
    /// Half away from zero.
    #[default]
    Nearest,
    Ceil,
    Floor,
    /// Half to even.
    Banker,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundParams {
    pub method: RoundMethod,
    pub decimals: u32,
}

/// Rounds `value` at `decimals` places by scaling, rounding, and unscaling.
///
/// Values too large to scale already have no digits past `decimals` and are
/// returned as they are.
pub fn round_value(value: f64, method: RoundMethod, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = match method {
        RoundMethod::Nearest => scaled.round(),
        RoundMethod::Ceil => scaled.ceil(),
        RoundMethod::Floor => scaled.floor(),
        RoundMethod::Banker => scaled.round_ties_even(),
    };
    rounded / factor
}

pub fn round_column(table: &Table, column: &str, params: &RoundParams) -> Result<TransformOutput> {
    require_column(table, column)?;
    if params.decimals > MAX_DECIMALS {
        return Err(TransformError::invalid(format!(
            "Decimals must be between 0 and {MAX_DECIMALS}"
        )));
    }
    let table = map_numeric(table, column, |_, v| {
        Value::number(round_value(v, params.method, params.decimals))
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    Multiply,
    Divide,
    Add,
    Subtract,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticParams {
    pub operation: ArithmeticOp,
    pub value: f64,
}

pub fn arithmetic_column(
    table: &Table,
    column: &str,
    params: &ArithmeticParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    if params.operation == ArithmeticOp::Divide && params.value == 0.0 {
        return Err(TransformError::DivideByZero);
    }
    let operand = params.value;
    let table = map_numeric(table, column, |_, v| {
        Value::number(match params.operation {
            ArithmeticOp::Multiply => v * operand,
            ArithmeticOp::Divide => v / operand,
            ArithmeticOp::Add => v + operand,
            ArithmeticOp::Subtract => v - operand,
        })
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOp {
    Abs,
    Log,
    Log10,
    Log2,
    Exp,
    Sqrt,
    Square,
    Power,
}

impl MathOp {
    fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Log2 => "log2",
            Self::Exp => "exp",
            Self::Sqrt => "sqrt",
            Self::Square => "square",
            Self::Power => "power",
        }
    }

    fn apply(self, v: f64, exponent: f64) -> f64 {
        match self {
            Self::Abs => v.abs(),
            Self::Log => v.ln(),
            Self::Log10 => v.log10(),
            Self::Log2 => v.log2(),
            Self::Exp => v.exp(),
            Self::Sqrt => v.sqrt(),
            Self::Square => v * v,
            Self::Power => v.powf(exponent),
        }
    }
}

fn default_exponent() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathParams {
    pub operation: MathOp,
    #[serde(default = "default_exponent")]
    pub exponent: f64,
}

/// Applies a math function after validating every numeric value in the column.
///
/// Results that are not finite (overflowing `exp`, fractional powers of
/// negative numbers) become `Null`.
pub fn math_transform_column(
    table: &Table,
    column: &str,
    params: &MathParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let values = numeric_values(table, column);
    match params.operation {
        MathOp::Log | MathOp::Log10 | MathOp::Log2 if values.iter().any(|v| *v <= 0.0) => {
            return Err(TransformError::NonPositiveLog {
                operation: params.operation.name(),
            });
        }
        MathOp::Sqrt if values.iter().any(|v| *v < 0.0) => {
            return Err(TransformError::NegativeSqrt);
        }
        _ => {}
    }
    let table = map_numeric(table, column, |_, v| {
        Value::number(params.operation.apply(v, params.exponent))
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidateAction {
    RemoveNegatives,
    PositiveOnly,
    RemoveZeros,
    IntegersOnly,
    Clamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateParams {
    pub action: ValidateAction,
    #[serde(default)]
    pub clamp_min: Option<f64>,
    #[serde(default)]
    pub clamp_max: Option<f64>,
}

/// Enforces a value constraint. Rows are never dropped: the `remove_*`
/// actions null out offending cells instead.
pub fn validate_column(
    table: &Table,
    column: &str,
    params: &ValidateParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let min = params.clamp_min.unwrap_or(f64::NEG_INFINITY);
    let max = params.clamp_max.unwrap_or(f64::INFINITY);
    if params.action == ValidateAction::Clamp && min > max {
        return Err(TransformError::invalid(format!(
            "Clamp minimum {min} is greater than maximum {max}"
        )));
    }
    let table = map_numeric(table, column, |cell, v| match params.action {
        ValidateAction::RemoveNegatives if v < 0.0 => Value::Null,
        ValidateAction::PositiveOnly if v <= 0.0 => Value::Null,
        ValidateAction::RemoveZeros if v == 0.0 => Value::Null,
        ValidateAction::IntegersOnly if v.fract() != 0.0 => Value::number(v.floor()),
        ValidateAction::Clamp => Value::number(v.clamp(min, max)),
        _ => cell.clone(),
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvertTarget {
    Number,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertParams {
    pub target: ConvertTarget,
}

/// Converts cells to numbers (non-coercible cells become `Null`) or to text.
pub fn convert_column(
    table: &Table,
    column: &str,
    params: &ConvertParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_cells(table, column, |cell| match (params.target, cell) {
        (_, Value::Null) => Value::Null,
        (ConvertTarget::Number, _) => cell.as_number().map_or(Value::Null, Value::Number),
        (ConvertTarget::Text, Value::Text(_)) => cell.clone(),
        (ConvertTarget::Text, _) => Value::Text(cell.to_text()),
    });
    Ok(TransformOutput::in_place(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banker_rounds_half_to_even() {
        assert_eq!(round_value(2.5, RoundMethod::Banker, 0), 2.0);
        assert_eq!(round_value(3.5, RoundMethod::Banker, 0), 4.0);
        assert_eq!(round_value(0.125, RoundMethod::Banker, 2), 0.12);
        assert_eq!(round_value(-2.5, RoundMethod::Banker, 0), -2.0);
    }

    #[test]
    fn nearest_rounds_half_away_from_zero() {
        assert_eq!(round_value(2.5, RoundMethod::Nearest, 0), 3.0);
        assert_eq!(round_value(-2.5, RoundMethod::Nearest, 0), -3.0);
        assert_eq!(round_value(1.234, RoundMethod::Nearest, 2), 1.23);
    }

    #[test]
    fn ceil_and_floor_respect_decimals() {
        assert_eq!(round_value(1.231, RoundMethod::Ceil, 2), 1.24);
        assert_eq!(round_value(1.239, RoundMethod::Floor, 2), 1.23);
        assert_eq!(round_value(-1e300, RoundMethod::Floor, 15), -1e300);
    }
}
