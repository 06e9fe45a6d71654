//! CSV file reading.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

use crate::table::CsvTable;

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn builder(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.delimiter(delimiter).has_headers(true).flexible(true);
    builder
}

/// Read a delimited file with a single header row.
///
/// Cells are kept verbatim and every data row is kept, even when all of its
/// cells are blank; only empty lines are ignored. Cells beyond the header
/// width are dropped with a warning.
pub fn read_csv_table(path: &Path, delimiter: u8) -> Result<CsvTable> {
    let reader = builder(delimiter)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    read_table(reader, path)
}

/// Parse delimited text held in memory.
pub fn parse_csv_str(contents: &str, delimiter: u8) -> Result<CsvTable> {
    let reader = builder(delimiter).from_reader(contents.as_bytes());
    read_table(reader, Path::new("<memory>"))
}

fn read_table<R: Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<CsvTable> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::csv(path, e))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(IngestError::MissingHeader {
            path: path.to_path_buf(),
        });
    }
    let mut seen = BTreeSet::new();
    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: header.clone(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() > headers.len() {
            warn!(
                path = %path.display(),
                line,
                cells = record.len(),
                columns = headers.len(),
                "row has more cells than columns; extra cells dropped"
            );
        }
        rows.push(
            record
                .iter()
                .take(headers.len())
                .map(str::to_string)
                .collect(),
        );
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read csv table"
    );
    Ok(CsvTable::new(headers, rows))
}
