//! Column classification.
//!
//! Decides, for one column of one record, which rule fills the matching
//! template element. Columns without an element are sorted into expected
//! companions and unrecognized names.

use std::fmt;

use campinfo_ingest::Record;
use campinfo_model::RuleSet;

use crate::paths::ImageMatcher;

/// Suffix of the companion column holding a value or image for `<Base>`.
pub const VALUE_SUFFIX: &str = "Value";
/// Suffix of link columns exported next to `<Base>`; recognized, never read.
pub const HREF_SUFFIX: &str = "Href";

/// Kind of column that is expected to have no template element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Companion {
    Href,
    Value,
    Folder,
    Ignored,
}

impl Companion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Href => "href",
            Self::Value => "value",
            Self::Folder => "folder",
            Self::Ignored => "ignored",
        }
    }
}

/// Why a column did not touch the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    Companion(Companion),
    Unrecognized,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Companion(companion) => write!(f, "{} column", companion.as_str()),
            Self::Unrecognized => f.write_str("not found in template"),
        }
    }
}

/// The rule applied to a template element, with the cells it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition<'a> {
    /// Rating bar image: graphic child plus the formatted score.
    Rating { image: &'a str },
    /// Label followed by `/`-separated choices, each text or image.
    MultiChoice {
        text: &'a str,
        /// The `<Base>Value` cell, `None` when that column does not exist.
        choices: Option<&'a str>,
    },
    /// Label text plus a child element pointing at an image.
    Nested { text: &'a str, href: &'a str },
    /// Image reference set as `href` on the element itself.
    DirectImage { image: &'a str },
    /// Label, tab marker, then the companion value.
    TextWithValue { text: &'a str, value: &'a str },
    Text { text: &'a str },
}

impl Disposition<'_> {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Rating { .. } => RuleKind::Rating,
            Self::MultiChoice { .. } => RuleKind::MultiChoice,
            Self::Nested { .. } => RuleKind::Nested,
            Self::DirectImage { .. } => RuleKind::DirectImage,
            Self::TextWithValue { .. } => RuleKind::TextWithValue,
            Self::Text { .. } => RuleKind::Text,
        }
    }
}

/// Field-less mirror of [`Disposition`] for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Rating,
    MultiChoice,
    Nested,
    DirectImage,
    TextWithValue,
    Text,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Rating,
        RuleKind::MultiChoice,
        RuleKind::Nested,
        RuleKind::DirectImage,
        RuleKind::TextWithValue,
        RuleKind::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::MultiChoice => "multi-choice",
            Self::Nested => "nested",
            Self::DirectImage => "image",
            Self::TextWithValue => "text+value",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    images: ImageMatcher,
    folder_column: String,
}

impl Classifier {
    pub fn new(rules: RuleSet, folder_column: impl Into<String>) -> Self {
        Self {
            images: ImageMatcher::from_rules(&rules),
            rules,
            folder_column: folder_column.into(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn images(&self) -> &ImageMatcher {
        &self.images
    }

    pub fn folder_column(&self) -> &str {
        &self.folder_column
    }

    /// Classify a column that has no element in the template.
    pub fn skip_reason(&self, column: &str) -> SkipReason {
        if column.ends_with(HREF_SUFFIX) {
            SkipReason::Companion(Companion::Href)
        } else if column.ends_with(VALUE_SUFFIX) {
            SkipReason::Companion(Companion::Value)
        } else if column == self.folder_column {
            SkipReason::Companion(Companion::Folder)
        } else if self.rules.is_ignored(column) {
            SkipReason::Companion(Companion::Ignored)
        } else {
            SkipReason::Unrecognized
        }
    }

    /// Choose the rule for a column whose element exists in the template.
    pub fn classify<'a>(&self, column: &str, record: Record<'a>) -> Disposition<'a> {
        let text = record.value(column);
        let value = record.get(&format!("{column}{VALUE_SUFFIX}"));

        if self.rules.is_rating_column(column) && self.images.is_image(text) {
            return Disposition::Rating { image: text };
        }
        if self.rules.is_multi_choice(column) {
            return Disposition::MultiChoice {
                text,
                choices: value,
            };
        }

        if let Some(href) = value.filter(|value| self.images.is_image(value)) {
            return Disposition::Nested { text, href };
        }
        if self.images.is_image(text) {
            return Disposition::DirectImage { image: text };
        }
        match value {
            Some(value) if !value.is_empty() => Disposition::TextWithValue { text, value },
            _ => Disposition::Text { text },
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RuleSet::default(), campinfo_model::DEFAULT_FOLDER_COLUMN)
    }
}
