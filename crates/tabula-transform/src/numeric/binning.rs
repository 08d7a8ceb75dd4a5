//! Discretization of numeric columns into labelled bins.

use serde::Deserialize;
use tabula_model::{Table, Value};

use super::stats::{quantile, sorted};
use crate::error::{Result, TransformError};
use crate::frame::{TransformOutput, map_cells, numeric_values, require_column};

/// Label written for values that fall outside every bin.
pub const OUT_OF_RANGE_LABEL: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinMethod {
    #[default]
    EqualWidth,
    EqualFreq,
    Quantile,
}

fn default_bins() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinParams {
    #[serde(default)]
    pub method: BinMethod,
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl Default for BinParams {
    fn default() -> Self {
        Self {
            method: BinMethod::default(),
            bins: default_bins(),
            labels: None,
        }
    }
}

/// `bins + 1` ascending edges. `values` must be non-empty and `bins` at
/// least 1.
pub(crate) fn bin_edges(values: &[f64], method: BinMethod, bins: usize) -> Vec<f64> {
    let ordered = sorted(values);
    let lo = ordered[0];
    let hi = ordered[ordered.len() - 1];
    match method {
        BinMethod::EqualWidth => {
            let width = (hi - lo) / bins as f64;
            (0..=bins)
                .map(|i| if i == bins { hi } else { lo + width * i as f64 })
                .collect()
        }
        BinMethod::EqualFreq => {
            let mut edges: Vec<f64> = (0..bins)
                .map(|i| ordered[i * ordered.len() / bins])
                .collect();
            edges.push(hi);
            edges
        }
        BinMethod::Quantile => (0..=bins)
            .map(|i| quantile(&ordered, i as f64 / bins as f64))
            .collect(),
    }
}

fn edge_label(lo: f64, hi: f64) -> String {
    format!("{lo:.2} - {hi:.2}")
}

fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let last = edges.len() - 2;
    edges.windows(2).enumerate().find_map(|(i, pair)| {
        let (lo, hi) = (pair[0], pair[1]);
        (v >= lo && (v < hi || (i == last && v <= hi))).then_some(i)
    })
}

pub fn bin_column(table: &Table, column: &str, params: &BinParams) -> Result<TransformOutput> {
    require_column(table, column)?;
    if params.bins == 0 {
        return Err(TransformError::invalid("Number of bins must be at least 1"));
    }
    if let Some(labels) = &params.labels
        && labels.len() != params.bins
    {
        return Err(TransformError::invalid(format!(
            "Expected {} bin labels, got {}",
            params.bins,
            labels.len()
        )));
    }
    let values = numeric_values(table, column);
    if values.is_empty() {
        return Err(TransformError::NoNumericValues(column.to_string()));
    }

    let edges = bin_edges(&values, params.method, params.bins);
    let labels: Vec<String> = match &params.labels {
        Some(labels) => labels.clone(),
        None => edges.windows(2).map(|pair| edge_label(pair[0], pair[1])).collect(),
    };

    let table = map_cells(table, column, |cell| {
        if cell.is_null() {
            return Value::Null;
        }
        let label = cell
            .as_number()
            .and_then(|v| bin_index(&edges, v))
            .map_or(OUT_OF_RANGE_LABEL, |i| labels[i].as_str());
        Value::text(label)
    });
    Ok(TransformOutput::in_place(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_width_edges_end_at_max() {
        let edges = bin_edges(&[0.0, 10.0, 3.0], BinMethod::EqualWidth, 4);
        assert_eq!(edges, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn maximum_falls_in_last_bin() {
        let edges = vec![0.0, 5.0, 10.0];
        assert_eq!(bin_index(&edges, 10.0), Some(1));
        assert_eq!(bin_index(&edges, 5.0), Some(1));
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 10.5), None);
    }

    #[test]
    fn equal_freq_uses_sorted_positions() {
        let edges = bin_edges(&[1.0, 2.0, 3.0, 4.0], BinMethod::EqualFreq, 2);
        assert_eq!(edges, vec![1.0, 3.0, 4.0]);
    }
}
