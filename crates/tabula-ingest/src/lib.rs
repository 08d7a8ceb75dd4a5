//! CSV ingestion and export for Tabula tables.

pub mod error;
pub mod options;
pub mod reader;
pub mod writer;

pub use error::{IngestError, Result};
pub use options::{DEFAULT_DATASET_ID, IngestOptions};
pub use reader::{read_csv_str, read_csv_table};
pub use writer::{write_csv_string, write_csv_table};
