//! Image detection and image path resolution.

use campinfo_model::RuleSet;

/// Recognises image references by file extension, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMatcher {
    extensions: Vec<String>,
}

impl ImageMatcher {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_rules(rules: &RuleSet) -> Self {
        Self::new(&rules.image_extensions)
    }

    pub fn is_image(&self, value: &str) -> bool {
        let value = value.as_bytes();
        self.extensions.iter().any(|ext| {
            let ext = ext.as_bytes();
            value.len() >= ext.len() && value[value.len() - ext.len()..].eq_ignore_ascii_case(ext)
        })
    }
}

impl Default for ImageMatcher {
    fn default() -> Self {
        Self::from_rules(&RuleSet::default())
    }
}

/// Builds image references below the configured images root.
///
/// The root, an optional per-row folder and the cell value are joined with a
/// single `/`; empty segments are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    prefix: String,
}

impl PathResolver {
    pub fn new(root: impl AsRef<str>) -> Self {
        Self {
            prefix: root.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn resolve(&self, raw: &str, folder: Option<&str>) -> String {
        let segments = [
            self.prefix.as_str(),
            folder.unwrap_or_default(),
            raw.trim_start_matches('/'),
        ];
        segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/")
    }
}
