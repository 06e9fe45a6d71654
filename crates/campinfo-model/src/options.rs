//! Run options for a CSV-to-XML conversion.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ModelError, Result};

/// Column that carries the per-row image subfolder unless overridden.
pub const DEFAULT_FOLDER_COLUMN: &str = "Pfad";

/// Field delimiter of the exported data files.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Root location for all referenced images, stored in URI form.
///
/// Accepts anything [`Url`] parses with a real scheme (`file:///C:/Bilder/`,
/// `https://cdn.example/img`) as well as absolute filesystem paths, which are
/// converted to `file://` URLs. The stored form is unescaped, so spaces and
/// umlauts reach the generated hrefs as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagesRoot(String);

impl ImagesRoot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The root with trailing separators removed, ready for path joining.
    pub fn as_prefix(&self) -> &str {
        self.0.trim_end_matches('/')
    }
}

impl FromStr for ImagesRoot {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid_root(raw, "value is empty"));
        }
        // Single-letter schemes are Windows drive letters, not URLs.
        let url = match Url::parse(trimmed) {
            Ok(url) if url.scheme().len() > 1 => url,
            _ => Url::from_directory_path(Path::new(trimmed))
                .map_err(|()| invalid_root(raw, "expected a URL or an absolute path"))?,
        };
        let unescaped = percent_decode_str(url.as_str())
            .decode_utf8()
            .map_err(|_| invalid_root(raw, "escaped bytes are not valid UTF-8"))?;
        Ok(Self(unescaped.into_owned()))
    }
}

impl TryFrom<String> for ImagesRoot {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ImagesRoot> for String {
    fn from(root: ImagesRoot) -> Self {
        root.0
    }
}

impl fmt::Display for ImagesRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn invalid_root(value: &str, reason: &str) -> ModelError {
    ModelError::InvalidImagesRoot {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Everything a conversion run needs to locate its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterOptions {
    /// XML file used as the template for every row.
    pub template_file: PathBuf,
    /// CSV file containing the rows.
    pub data_file: PathBuf,
    /// Root for all included images.
    pub images_root: ImagesRoot,
    /// Column holding a relative folder for row-specific pictures.
    pub folder_column: String,
    /// CSV field delimiter.
    pub delimiter: u8,
}

impl ConverterOptions {
    pub fn new(
        template_file: impl Into<PathBuf>,
        data_file: impl Into<PathBuf>,
        images_root: ImagesRoot,
    ) -> Self {
        Self {
            template_file: template_file.into(),
            data_file: data_file.into(),
            images_root,
            folder_column: DEFAULT_FOLDER_COLUMN.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    #[must_use]
    pub fn with_folder_column(mut self, column: impl Into<String>) -> Self {
        self.folder_column = column.into();
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
