//! Column rule configuration.
//!
//! A [`RuleSet`] names the columns that get special treatment during the
//! row transformation and the conventions used to recognise image values.
//! Every field has a default, so a rules file only lists what it overrides:
//!
//! ```toml
//! rating_prefix = "RatingAvg"
//! multi_choice_columns = ["SwimmingPoolOutdoor", "Ski"]
//! strictness = "error"
//!
//! [rating_code]
//! kind = "offset"
//! offset = 7
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Image file extensions recognised out of the box.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[
    ".ai", ".eps", ".jpeg", ".jpg", ".pdf", ".png", ".psd", ".tif", ".tiff",
];

/// Where the two rating digits sit inside an image file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatingCodeRule {
    /// The two characters following the last underscore (`balken_43.ai`).
    #[default]
    LastUnderscore,
    /// The two characters at a fixed character offset in the file name.
    Offset { offset: usize },
}

/// How to treat CSV columns that have no element in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Log the column and keep going.
    #[default]
    Warn,
    /// Fail the row.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleSet {
    /// Prefix of the per-category rating columns.
    pub rating_prefix: String,
    /// Rating column that is rendered like any other column.
    pub overall_rating_column: String,
    pub rating_code: RatingCodeRule,
    /// Put a tab marker in front of the formatted rating value.
    pub rating_tab_prefix: bool,
    /// Columns whose `Value` companion lists several choices split by `/`.
    pub multi_choice_columns: Vec<String>,
    /// Case-insensitive suffixes that mark a cell as an image reference.
    pub image_extensions: Vec<String>,
    /// Image names that get a tab marker after the label text.
    pub sentinel_images: Vec<String>,
    /// Columns without a template element that are expected and not reported.
    pub ignored_columns: Vec<String>,
    /// Column used to label rows in progress output.
    pub label_column: String,
    pub strictness: Strictness,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rating_prefix: "RatingAvg".to_string(),
            overall_rating_column: "RatingAvgOverall".to_string(),
            rating_code: RatingCodeRule::default(),
            rating_tab_prefix: true,
            multi_choice_columns: vec![
                "SwimmingPoolOutdoor".to_string(),
                "Ski".to_string(),
                "Restaurant".to_string(),
            ],
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            sentinel_images: vec!["Yes.ai".to_string(), "No.ai".to_string()],
            ignored_columns: vec!["Premium".to_string()],
            label_column: "Name".to_string(),
            strictness: Strictness::default(),
        }
    }
}

impl RuleSet {
    /// Parse a TOML rules document on top of the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let rules: Self = toml::from_str(source)?;
        rules.validate()?;
        Ok(rules)
    }

    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    #[must_use]
    pub fn with_rating_code(mut self, rule: RatingCodeRule) -> Self {
        self.rating_code = rule;
        self
    }

    #[must_use]
    pub fn with_rating_tab_prefix(mut self, enable: bool) -> Self {
        self.rating_tab_prefix = enable;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rating_prefix.is_empty() {
            return Err(invalid("rating_prefix must not be empty"));
        }
        if self.image_extensions.is_empty() {
            return Err(invalid("image_extensions must list at least one extension"));
        }
        if let Some(ext) = self
            .image_extensions
            .iter()
            .find(|ext| ext.len() < 2 || !ext.starts_with('.'))
        {
            return Err(invalid(format!(
                "image extension '{ext}' must start with '.' and name a suffix"
            )));
        }
        Ok(())
    }

    pub fn is_rating_column(&self, column: &str) -> bool {
        column.starts_with(&self.rating_prefix) && column != self.overall_rating_column
    }

    pub fn is_multi_choice(&self, column: &str) -> bool {
        self.multi_choice_columns.iter().any(|name| name == column)
    }

    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignored_columns.iter().any(|name| name == column)
    }

    pub fn is_sentinel_image(&self, href: &str) -> bool {
        self.sentinel_images.iter().any(|name| href.ends_with(name.as_str()))
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidRules {
        message: message.into(),
    }
}
