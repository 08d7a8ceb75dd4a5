//! Operation descriptors and transform results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Table;

/// One transform invocation as sent by a caller.
///
/// `kind` serializes as `type` and must be one of the dispatcher's operation
/// names. `parameters` is validated by the transform it routes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub column_name: String,
    #[serde(default = "empty_parameters")]
    pub parameters: serde_json::Value,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

fn empty_parameters() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Operation {
    pub fn new(kind: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            kind: kind.into(),
            column_name: column_name.into(),
            parameters: empty_parameters(),
            timestamp: Utc::now(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Human-readable label, falling back to `<type> on <column>`.
    pub fn label(&self) -> String {
        if self.description.trim().is_empty() {
            format!("{} on {}", self.kind, self.column_name)
        } else {
            self.description.clone()
        }
    }
}

/// Outcome of dispatching an operation.
///
/// On failure `data` is `None` and the caller's table is unchanged. On
/// success `data` is the complete replacement table and the column deltas
/// describe how its column set differs from the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub new_columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed_columns: Vec<String>,
}

impl TransformResult {
    pub fn succeeded(data: Table, new_columns: Vec<String>, removed_columns: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            new_columns,
            removed_columns,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            new_columns: Vec::new(),
            removed_columns: Vec::new(),
        }
    }
}
