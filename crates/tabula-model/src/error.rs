use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid dataset id: '{0}'")]
    InvalidDatasetId(String),
    #[error("column names must not be empty")]
    EmptyColumnName,
    #[error("duplicate column name: '{0}'")]
    DuplicateColumn(String),
    #[error("row {row} has {found} values but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
