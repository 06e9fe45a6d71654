//! Error types for the row transformation.

use thiserror::Error;

/// Why a rating image name did not yield a two-digit code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingIssue {
    #[error("file name has no underscore before the rating code")]
    MissingUnderscore,

    #[error("file name ends before the two rating digits at position {start}")]
    TooShort { start: usize },

    #[error("expected two digits, found '{found}'")]
    NotDigits { found: String },
}

/// Errors that fail a row.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A rating cell names an image, but its file name carries no usable code.
    #[error("row {row}: column '{column}' has malformed rating image '{value}': {issue}")]
    RatingFormat {
        row: usize,
        column: String,
        value: String,
        #[source]
        issue: RatingIssue,
    },

    /// A column has no element in the template (strict mode only).
    #[error("row {row}: column '{column}' has no element in the template")]
    UnrecognizedColumn { row: usize, column: String },
}

impl TransformError {
    /// 1-based row number the error was raised for.
    pub fn row(&self) -> usize {
        match self {
            Self::RatingFormat { row, .. } | Self::UnrecognizedColumn { row, .. } => *row,
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
