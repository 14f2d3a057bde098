//! Plain-text loader.

use log::error;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::text::normalize_text;

/// A blank-line separator: two newlines with optional whitespace between.
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n+").expect("valid paragraph break regex"));

/// Load paragraphs from a UTF-8 text file.
pub fn load_paragraphs_from_txt(path: &Path) -> Vec<String> {
    if !path.exists() {
        error!("File not found: {}", path.display());
        return Vec::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => split_paragraphs(&content),
        Err(e) => {
            error!("Failed to read text file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Split text on blank lines and normalize each paragraph, dropping empty
/// ones.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(content)
        .map(normalize_text)
        .filter(|p| !p.is_empty())
        .collect()
}
