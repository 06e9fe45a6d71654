//! Immutable template store.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, XmlError};
use crate::node::Document;
use crate::parse::parse_document;

/// Where template markup comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Inline markup.
    Markup(String),
    /// Path to a template file.
    File(PathBuf),
}

impl TemplateSource {
    /// Treat values starting with `<` as markup and everything else as a path.
    pub fn detect(value: &str) -> Self {
        if value.trim_start_matches('\u{feff}').trim_start().starts_with('<') {
            Self::Markup(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl From<&Path> for TemplateSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<PathBuf> for TemplateSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// A parsed template that hands out independent copies.
///
/// The template itself is never exposed mutably; every row works on the
/// [`Document`] returned by [`Template::fresh_copy`].
#[derive(Debug, Clone)]
pub struct Template {
    document: Document,
}

impl Template {
    pub fn load(source: TemplateSource) -> Result<Self> {
        match source {
            TemplateSource::Markup(markup) => Self::from_markup(&markup),
            TemplateSource::File(path) => Self::from_file(&path),
        }
    }

    pub fn from_markup(markup: &str) -> Result<Self> {
        let document = parse_document(markup)?;
        debug!(root = document.root().name(), "parsed template");
        Ok(Self { document })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let markup = fs::read_to_string(path).map_err(|source| XmlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_markup(&markup)
    }

    /// Deep copy for one row.
    pub fn fresh_copy(&self) -> Document {
        self.document.clone()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn contains_element(&self, name: &str) -> bool {
        self.document.contains(name)
    }
}

impl FromStr for Template {
    type Err = XmlError;

    fn from_str(markup: &str) -> Result<Self> {
        Self::from_markup(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Root>
<cell><Spalte /></cell>
</Root>"#;

    #[test]
    fn detect_distinguishes_markup_from_paths() {
        assert!(matches!(
            TemplateSource::detect(TEMPLATE),
            TemplateSource::Markup(_)
        ));
        assert_eq!(
            TemplateSource::detect("vorlagen/platz.xml"),
            TemplateSource::File(PathBuf::from("vorlagen/platz.xml"))
        );
    }

    #[test]
    fn fresh_copies_are_independent() {
        let template: Template = TEMPLATE.parse().unwrap();
        let mut first = template.fresh_copy();
        first.find_mut("Spalte").unwrap().set_text("Wert");
        let second = template.fresh_copy();
        assert_eq!(second.find("Spalte").unwrap().text(), "");
        assert_eq!(template.document().find("Spalte").unwrap().text(), "");
        assert_ne!(first, second);
    }

    #[test]
    fn load_reads_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vorlage.xml");
        fs::write(&path, TEMPLATE).unwrap();
        let template = Template::load(TemplateSource::from(path.as_path())).unwrap();
        assert!(template.contains_element("Spalte"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Template::from_file(Path::new("/nonexistent/vorlage.xml")).unwrap_err();
        assert!(matches!(err, XmlError::Io { .. }));
    }

    #[test]
    fn malformed_markup_is_a_parse_error() {
        assert!(Template::from_markup("<Root><cell></Root>").is_err());
    }
}
