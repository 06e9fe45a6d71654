//! UTF-8 byte order mark normalization.
//!
//! Data exports are handed to tools that only detect UTF-8 when the file
//! starts with a BOM, so the data file is rewritten in place if it lacks one.
//! Files that are not valid UTF-8 are assumed to be Windows-1252 exports and
//! are transcoded on the way.

use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::{info, warn};

use crate::error::{IngestError, Result};

/// The UTF-8 byte order mark.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// What [`ensure_utf8_bom`] did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomStatus {
    /// File already started with a BOM; untouched.
    Present,
    /// BOM was prepended to valid UTF-8 content.
    Added,
    /// Content was decoded from `encoding` and rewritten as UTF-8 with BOM.
    Transcoded { encoding: &'static str },
}

impl BomStatus {
    pub fn rewritten(self) -> bool {
        !matches!(self, BomStatus::Present)
    }
}

/// Ensure `path` starts with the UTF-8 BOM, rewriting the file if needed.
pub fn ensure_utf8_bom(path: &Path) -> Result<BomStatus> {
    let bytes = fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let Some((contents, status)) = with_utf8_bom(&bytes) else {
        return Ok(BomStatus::Present);
    };
    fs::write(path, contents).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    match status {
        BomStatus::Transcoded { encoding } => warn!(
            path = %path.display(),
            encoding,
            "data file was not UTF-8; transcoded and added BOM"
        ),
        _ => info!(path = %path.display(), "added UTF-8 BOM to data file"),
    }
    Ok(status)
}

/// The BOM-prefixed UTF-8 form of `bytes`, or `None` if it already has one.
pub fn with_utf8_bom(bytes: &[u8]) -> Option<(Vec<u8>, BomStatus)> {
    if bytes.starts_with(&UTF8_BOM) {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len() + UTF8_BOM.len());
    out.extend_from_slice(&UTF8_BOM);
    let status = if std::str::from_utf8(bytes).is_ok() {
        out.extend_from_slice(bytes);
        BomStatus::Added
    } else {
        let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        out.extend_from_slice(decoded.as_bytes());
        BomStatus::Transcoded {
            encoding: WINDOWS_1252.name(),
        }
    };
    Some((out, status))
}
