//! CSV reading into typed tables.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tabula_model::{DatasetId, Table, Value, parse_f64};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::options::{DEFAULT_DATASET_ID, IngestOptions};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Types one cell: blank is `Null`, finite numbers are `Number`, anything
/// else stays `Text`.
fn parse_cell(raw: &str, keep_text: bool) -> Value {
    let cell = normalize_cell(raw);
    if cell.is_empty() {
        return Value::Null;
    }
    if !keep_text && let Some(number) = parse_f64(cell) {
        return Value::Number(number);
    }
    Value::text(cell)
}

pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IngestError::UnsupportedDelimiter(delimiter))
}

fn dataset_id(options: &IngestOptions, fallback: Option<&str>) -> Result<DatasetId> {
    let name = options
        .dataset_id
        .as_deref()
        .or(fallback)
        .unwrap_or(DEFAULT_DATASET_ID);
    Ok(DatasetId::new(name)?)
}

fn read_table<R: Read>(
    input: R,
    origin: &str,
    id: DatasetId,
    options: &IngestOptions,
) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter_byte(options.delimiter)?)
        .from_reader(input);
    let parse_error = |err: csv::Error| IngestError::CsvParse {
        origin: origin.to_string(),
        message: err.to_string(),
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            origin: origin.to_string(),
        });
    }
    let mut seen = BTreeSet::new();
    for (idx, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(IngestError::EmptyHeader {
                origin: origin.to_string(),
                position: idx + 1,
            });
        }
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateHeader {
                origin: origin.to_string(),
                header: header.clone(),
            });
        }
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        if record.iter().all(|cell| normalize_cell(cell).is_empty()) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(IngestError::RowWidth {
                origin: origin.to_string(),
                line: record.position().map_or(0, csv::Position::line),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut values: Vec<Value> = record
            .iter()
            .map(|cell| parse_cell(cell, options.keep_text))
            .collect();
        values.resize(headers.len(), Value::Null);
        records.push(values);
    }

    debug!(
        origin,
        dataset = %id,
        columns = headers.len(),
        rows = records.len(),
        "loaded csv"
    );
    Ok(Table::from_records(id, headers, records)?)
}

/// Reads a CSV file with a header row into a table.
///
/// Short rows are padded with nulls and blank rows are skipped. The dataset
/// id comes from the options or, failing that, the file stem.
pub fn read_csv_table(path: &Path, options: &IngestOptions) -> Result<Table> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let stem = path.file_stem().and_then(|stem| stem.to_str());
    let id = dataset_id(options, stem)?;
    read_table(file, &path.display().to_string(), id, options)
}

/// Reads CSV text already in memory.
pub fn read_csv_str(contents: &str, options: &IngestOptions) -> Result<Table> {
    let id = dataset_id(options, None)?;
    read_table(contents.as_bytes(), "<memory>", id, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_collapse_whitespace_and_bom() {
        assert_eq!(normalize_header("\u{feff} Unit   Price "), "Unit Price");
    }

    #[test]
    fn cells_are_typed() {
        assert_eq!(parse_cell("  ", false), Value::Null);
        assert_eq!(parse_cell(" 4.5 ", false), Value::Number(4.5));
        assert_eq!(parse_cell("4.5", true), Value::text("4.5"));
        assert_eq!(parse_cell("NaN", false), Value::text("NaN"));
    }

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert!(matches!(
            delimiter_byte('→'),
            Err(IngestError::UnsupportedDelimiter('→'))
        ));
    }
}
