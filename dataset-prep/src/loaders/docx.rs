//! Word-processor (.docx) loader.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml`.
//! Only `w:p` elements that are direct children of `w:body` are paragraphs.
//! Table cells, text boxes and alternate-content fallbacks are skipped, so
//! each body paragraph appears once, in document order.

use anyhow::{Context, Result};
use log::error;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::text::normalize_text;

const DOCUMENT_PART: &str = "word/document.xml";

/// Load paragraphs from a .docx file.
pub fn load_paragraphs_from_docx(path: &Path) -> Vec<String> {
    if !path.exists() {
        error!("File not found: {}", path.display());
        return Vec::new();
    }

    match read_docx_paragraphs(path) {
        Ok(paragraphs) => paragraphs
            .iter()
            .map(|p| normalize_text(p))
            .filter(|p| !p.is_empty())
            .collect(),
        Err(e) => {
            error!("Failed to read .docx file {}: {:#}", path.display(), e);
            Vec::new()
        }
    }
}

/// Raw paragraph texts in document order.
fn read_docx_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).context("Failed to open file")?;
    let mut archive = zip::ZipArchive::new(file).context("Not a zip archive")?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .with_context(|| format!("Missing {}", DOCUMENT_PART))?
        .read_to_string(&mut xml)
        .with_context(|| format!("Failed to read {}", DOCUMENT_PART))?;

    parse_document_xml(&xml)
}

/// Extract body paragraph texts from `document.xml`.
///
/// A paragraph's text is the concatenation of its own `w:t` runs. Tabs and
/// line breaks become whitespace. Text from paragraphs nested inside it
/// (text boxes) is left out.
fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut current: Option<String> = None;
    let mut nested = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"body" if body_depth.is_none() => body_depth = Some(depth),
                    b"p" if current.is_some() => nested += 1,
                    b"p" if is_body_child(body_depth, depth) => current = Some(String::new()),
                    b"t" => in_text = nested == 0 && current.is_some(),
                    name if nested == 0 => push_whitespace(current.as_mut(), name),
                    _ => {}
                }
            }
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" if current.is_none() && is_body_child(body_depth, depth + 1) => {
                    paragraphs.push(String::new())
                }
                name if nested == 0 => push_whitespace(current.as_mut(), name),
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if nested > 0 => nested -= 1,
                    b"p" => {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Whether an element at `depth` sits directly under `w:body`.
fn is_body_child(body_depth: Option<usize>, depth: usize) -> bool {
    body_depth.is_some_and(|body| depth == body + 1)
}

/// `w:tab` and `w:br`/`w:cr` separate words inside a run.
fn push_whitespace(current: Option<&mut String>, element: &[u8]) {
    let Some(current) = current else {
        return;
    };
    match element {
        b"tab" => current.push('\t'),
        b"br" | b"cr" => current.push('\n'),
        _ => {}
    }
}
