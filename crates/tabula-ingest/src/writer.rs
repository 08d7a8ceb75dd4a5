//! CSV export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tabula_model::Table;

use crate::error::{IngestError, Result};

fn write_error(err: impl std::fmt::Display) -> IngestError {
    IngestError::CsvWrite {
        message: err.to_string(),
    }
}

fn write_table<W: Write>(table: &Table, output: W) -> Result<W> {
    let mut writer = WriterBuilder::new().from_writer(output);
    writer.write_record(table.columns()).map_err(write_error)?;
    for row in table.rows() {
        let cells = table.columns().iter().map(|column| row.get(column).to_text());
        writer.write_record(cells).map_err(write_error)?;
    }
    writer.into_inner().map_err(write_error)
}

/// Renders a table as CSV: header in column order, nulls as empty cells,
/// lists as JSON arrays.
pub fn write_csv_string(table: &Table) -> Result<String> {
    let bytes = write_table(table, Vec::new())?;
    String::from_utf8(bytes).map_err(write_error)
}

pub fn write_csv_table(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = write_table(table, file)?;
    file.flush().map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
