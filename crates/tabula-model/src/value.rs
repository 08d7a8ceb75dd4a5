//! Dynamically typed cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Serialized untagged, so JSON `null`, booleans, numbers, strings, and arrays
/// map directly onto the variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Builds a number cell, mapping non-finite results to `Null`.
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(value)
        } else {
            Self::Null
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for `Null` and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// True for `Null` and the textual empty sentinels `''`, `'null'`, `'undefined'`.
    pub fn is_empty_sentinel(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case("null")
                    || trimmed.eq_ignore_ascii_case("undefined")
            }
            _ => false,
        }
    }

    /// Coerces to a finite number.
    ///
    /// Numbers and numeric text coerce; booleans, lists, blank text and nulls do not.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Text(text) => parse_f64(text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// String coercion used by text comparisons and exports.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(v) => format_number(*v),
            Self::Text(text) => text.clone(),
            Self::List(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Parses a string as a finite f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a number in its shortest round-trip form (`2`, `2.5`, `-0.125`).
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_coerces() {
        assert_eq!(Value::text(" 4.5 ").as_number(), Some(4.5));
        assert_eq!(Value::text("abc").as_number(), None);
        assert_eq!(Value::text("").as_number(), None);
        assert_eq!(Value::text("NaN").as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Value::Number(2.0).to_text(), "2");
        assert_eq!(Value::Number(-0.0).to_text(), "0");
        assert_eq!(Value::Number(2.5).to_text(), "2.5");
    }

    #[test]
    fn sentinels_count_as_empty() {
        assert!(Value::text("undefined").is_empty_sentinel());
        assert!(Value::text(" NULL ").is_empty_sentinel());
        assert!(!Value::text("none").is_empty_sentinel());
        assert!(!Value::Number(0.0).is_empty_sentinel());
    }

    #[test]
    fn deserializes_untagged_json() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 3, "x", [1, "a"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Number(3.0),
                Value::text("x"),
                Value::List(vec![Value::Number(1.0), Value::text("a")]),
            ]
        );
    }
}
