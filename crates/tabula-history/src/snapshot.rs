//! Recorded table states.

use serde::Serialize;
use tabula_model::{DatasetId, Operation, Row, Table};

/// A frozen table state.
///
/// Snapshots wrap a [`Table`], whose rows and columns are reference counted,
/// so taking one never deep-copies the data and nothing can mutate it later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub data: Table,
}

impl Snapshot {
    pub fn new(data: Table) -> Self {
        Self { data }
    }

    pub fn dataset_id(&self) -> &DatasetId {
        self.data.id()
    }

    pub fn rows(&self) -> &[Row] {
        self.data.rows()
    }

    pub fn column_names(&self) -> &[String] {
        self.data.columns()
    }
}

impl From<Table> for Snapshot {
    fn from(data: Table) -> Self {
        Self::new(data)
    }
}

/// One history entry: an operation with the table before and after it ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnOperation {
    pub operation: Operation,
    pub before_snapshot: Snapshot,
    pub after_snapshot: Snapshot,
}
