//! Error types for CSV ingestion and export.

use std::path::PathBuf;

use tabula_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading or writing CSV.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    #[error("failed to parse CSV {origin}: {message}")]
    CsvParse { origin: String, message: String },

    /// No header row.
    #[error("CSV input is empty: {origin}")]
    EmptyCsv { origin: String },

    #[error("column {position} of {origin} has an empty header")]
    EmptyHeader { origin: String, position: usize },

    #[error("duplicate header '{header}' in {origin}")]
    DuplicateHeader { origin: String, header: String },

    #[error("line {line} of {origin} has {found} fields but the header has {expected}")]
    RowWidth {
        origin: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The csv reader and writer only accept single-byte delimiters.
    #[error("delimiter '{0}' is not a single ASCII character")]
    UnsupportedDelimiter(char),

    #[error("failed to write CSV: {message}")]
    CsvWrite { message: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/file.csv");
    }
}
