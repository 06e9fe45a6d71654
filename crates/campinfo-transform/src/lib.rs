//! Row-to-document transformation for campsite data exports.
//!
//! A [`Converter`] takes a parsed [`Template`](campinfo_xml::Template) and a
//! [`CsvTable`](campinfo_ingest::CsvTable) and yields one populated document
//! per record:
//!
//! - the [`Classifier`] picks a rule per column (rating, multi-choice,
//!   nested image, direct image, text with value, plain text),
//! - the [`PathResolver`] prefixes image references with the images root and
//!   the per-row folder,
//! - a [`ConversionObserver`] receives progress callbacks, so the core stays
//!   free of console output.
//!
//! # Example
//!
//! ```ignore
//! use campinfo_transform::{Converter, ConverterSettings};
//!
//! let converter = Converter::new(template, ConverterSettings::default());
//! for document in converter.documents(&table) {
//!     let document = document?;
//!     // serialize and write
//! }
//! ```

mod classify;
mod converter;
mod error;
mod observer;
mod paths;
mod rating;

// Classification
pub use classify::{
    Classifier, Companion, Disposition, HREF_SUFFIX, RuleKind, SkipReason, VALUE_SUFFIX,
};

// Conversion
pub use converter::{
    CHOICE_SEPARATOR, Converter, ConverterSettings, Documents, GRAPHIC_SUFFIX, TAB_MARKER,
};

// Error types
pub use error::{RatingIssue, Result, TransformError};

// Progress reporting
pub use observer::{ConversionObserver, NoopObserver};

// Image references
pub use paths::{ImageMatcher, PathResolver};
pub use rating::format_rating;
