//! Document loaders.
//!
//! Each loader turns one file into an ordered list of normalized, non-empty
//! paragraphs. Loaders never fail: a missing or unreadable file is logged and
//! yields no paragraphs, which callers treat as "nothing to process".

pub(crate) mod docx;
mod plain;

use std::ffi::OsStr;
use std::path::Path;

pub use docx::load_paragraphs_from_docx;
pub use plain::load_paragraphs_from_txt;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// UTF-8 plain text, paragraphs separated by blank lines
    PlainText,
    /// Office Open XML word-processor document
    Docx,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(OsStr::to_str)?;
        if ext.eq_ignore_ascii_case("txt") {
            Some(Self::PlainText)
        } else if ext.eq_ignore_ascii_case("docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    /// Load paragraphs from `path` with the loader for this format.
    pub fn load_paragraphs(self, path: &Path) -> Vec<String> {
        match self {
            Self::PlainText => load_paragraphs_from_txt(path),
            Self::Docx => load_paragraphs_from_docx(path),
        }
    }
}

/// Whether `path` has a supported extension.
pub fn is_supported(path: &Path) -> bool {
    DocumentFormat::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/b.txt")),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("b.DOCX")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("b.pdf")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("chapter1.TXT")));
        assert!(!is_supported(Path::new("notes.doc")));
    }
}
