//! Destination directory naming.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\W_]+").expect("valid unsafe-run regex"));

/// File stem of `path` with every run of non-word characters or underscores
/// replaced by a single `-`.
pub fn safe_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    UNSAFE_RUN.replace_all(&stem, "-").into_owned()
}

/// `<root>/xml_<template>_<data>` for the given input files.
pub fn destination_dir(root: &Path, template: &Path, data: &Path) -> PathBuf {
    root.join(format!("xml_{}_{}", safe_name(template), safe_name(data)))
}
