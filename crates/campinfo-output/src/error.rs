//! Error types for output writing.

use std::path::PathBuf;

use campinfo_xml::XmlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output path exists and is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] XmlError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
