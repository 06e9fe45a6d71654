//! Numbered output files.

use std::fs;
use std::path::{Path, PathBuf};

use campinfo_xml::Document;
use tracing::debug;

use crate::error::{OutputError, Result};
use crate::render::render_document;

/// Writes rendered documents as `1.xml`, `2.xml`, ... into one directory.
#[derive(Debug)]
pub struct OutputWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl OutputWriter {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(OutputError::NotADirectory { path: dir });
        }
        fs::create_dir_all(&dir).map_err(|source| OutputError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the next document will be written to.
    pub fn next_path(&self) -> PathBuf {
        self.dir.join(format!("{}.xml", self.written.len() + 1))
    }

    /// Render and write `document`, returning the file path.
    pub fn write(&mut self, document: &Document) -> Result<PathBuf> {
        let path = self.next_path();
        let rendered = render_document(document)?;
        fs::write(&path, rendered).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote document");
        self.written.push(path.clone());
        Ok(path)
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}
