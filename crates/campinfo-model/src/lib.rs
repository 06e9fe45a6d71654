pub mod error;
pub mod options;
pub mod rules;

pub use error::{ModelError, Result};
pub use options::{ConverterOptions, DEFAULT_DELIMITER, DEFAULT_FOLDER_COLUMN, ImagesRoot};
pub use rules::{DEFAULT_IMAGE_EXTENSIONS, RatingCodeRule, RuleSet, Strictness};
