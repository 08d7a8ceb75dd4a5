//! Column scaling.

use serde::Deserialize;
use tabula_model::{Table, Value};

use super::stats::{mean, median, quantile, sorted, std_dev};
use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, map_numeric, numeric_values, require_column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMethod {
    /// Scale to `[0, 1]`.
    #[default]
    #[serde(rename = "minmax_01")]
    MinMax01,
    /// Scale to `[-1, 1]`.
    #[serde(rename = "minmax_neg11")]
    MinMaxNeg11,
    /// Scale to `[customMin, customMax]`.
    Custom,
    Zscore,
    /// Median-centred, scaled by the interquartile range.
    Robust,
}

fn default_custom_max() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeParams {
    #[serde(default)]
    pub method: NormalizeMethod,
    #[serde(default)]
    pub custom_min: f64,
    #[serde(default = "default_custom_max")]
    pub custom_max: f64,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            method: NormalizeMethod::default(),
            custom_min: 0.0,
            custom_max: default_custom_max(),
        }
    }
}

pub fn normalize_column(
    table: &Table,
    column: &str,
    params: &NormalizeParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let values = numeric_values(table, column);
    if values.is_empty() {
        return Err(TransformError::NoNumericValues(column.to_string()));
    }
    let constant = |reason| TransformError::ConstantColumn {
        column: column.to_string(),
        reason,
    };

    let ordered = sorted(&values);
    let (lo, hi) = (ordered[0], ordered[ordered.len() - 1]);
    let range = hi - lo;

    // Each method reduces to `target_lo + (v - center) / scale * span`.
    let (center, scale, target_lo, span) = match params.method {
        NormalizeMethod::MinMax01 | NormalizeMethod::MinMaxNeg11 | NormalizeMethod::Custom => {
            if range == 0.0 {
                return Err(constant("all values are identical"));
            }
            let (target_lo, target_hi) = match params.method {
                NormalizeMethod::MinMax01 => (0.0, 1.0),
                NormalizeMethod::MinMaxNeg11 => (-1.0, 1.0),
                _ => (params.custom_min, params.custom_max),
            };
            if target_lo >= target_hi {
                return Err(TransformError::invalid(format!(
                    "Custom minimum {target_lo} must be less than maximum {target_hi}"
                )));
            }
            (lo, range, target_lo, target_hi - target_lo)
        }
        NormalizeMethod::Zscore => {
            let std = std_dev(&values);
            if std == 0.0 {
                return Err(constant("standard deviation is zero"));
            }
            (mean(&values), std, 0.0, 1.0)
        }
        NormalizeMethod::Robust => {
            let iqr = quantile(&ordered, 0.75) - quantile(&ordered, 0.25);
            if iqr == 0.0 {
                return Err(constant("interquartile range is zero"));
            }
            (median(&ordered), iqr, 0.0, 1.0)
        }
    };

    let table = map_numeric(table, column, |_, v| {
        Value::number(target_lo + (v - center) / scale * span)
    });
    Ok(TransformOutput::in_place(table))
}
