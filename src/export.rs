//! Plain-text export of a generated document.

use crate::document::GeneratedDocument;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File name for a document of the given sub-type, e.g. `Service_Agreement.txt`.
pub fn export_file_name(sub_type: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    let stem = whitespace.replace_all(sub_type.trim(), "_");
    let stem = stem.replace(['/', '\\'], "-");
    let stem = if stem.is_empty() || stem.chars().all(|ch| ch == '.') {
        "document".to_string()
    } else {
        stem
    };
    format!("{stem}.txt")
}

/// Write the generated text into `dir`, returning the file path.
pub fn export_document(dir: &Path, document: &GeneratedDocument) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create export dir {}", dir.display()))?;
    let path = dir.join(export_file_name(document.request().sub_type()));
    fs::write(&path, document.text()).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = document.text().len(), "exported document");
    Ok(path)
}
