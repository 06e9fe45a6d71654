//! Data ingestion for campsite exports.
//!
//! - **BOM normalization**: make sure the data file starts with a UTF-8 BOM,
//!   transcoding Windows-1252 exports on the way
//! - **CSV loading**: read a delimited file into a [`CsvTable`] of raw cells
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use campinfo_ingest::{ensure_utf8_bom, read_csv_table};
//!
//! let path = Path::new("daten/plaetze.csv");
//! ensure_utf8_bom(path)?;
//! let table = read_csv_table(path, b';')?;
//! for record in table.records() {
//!     println!("{}", record.value("Name"));
//! }
//! ```

mod bom;
mod error;
mod reader;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Encoding ===
pub use bom::{BomStatus, UTF8_BOM, ensure_utf8_bom, with_utf8_bom};

// === CSV Reading ===
pub use reader::{parse_csv_str, read_csv_table};
pub use table::{CsvTable, Record};
