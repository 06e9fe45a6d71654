//! Error types for template loading and XML serialization.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    /// Template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Markup is not well-formed.
    #[error("malformed XML at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// Closing tag without a matching opening tag.
    #[error("unexpected closing tag </{name}> at byte {position}")]
    UnexpectedEnd { name: String, position: u64 },

    /// Element still open when the input ended.
    #[error("element <{name}> is never closed")]
    Unclosed { name: String },

    /// Input contains no element at all.
    #[error("document has no root element")]
    MissingRoot,

    /// A second top-level element follows the root.
    #[error("second root element <{name}> at byte {position}")]
    MultipleRoots { name: String, position: u64 },

    /// Character data outside of the root element.
    #[error("text outside the root element at byte {position}")]
    TextOutsideRoot { position: u64 },

    #[error("failed to write XML: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to write XML: {0}")]
    Encode(#[from] quick_xml::Error),
}

impl XmlError {
    pub(crate) fn parse(position: u64, message: impl ToString) -> Self {
        Self::Parse {
            position,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, XmlError>;
