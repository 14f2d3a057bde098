//! Russian sentence boundary model.
//!
//! Candidate boundaries come from Unicode sentence segmentation (UAX #29).
//! A candidate is rejected when the text before it ends in a known
//! abbreviation (`г.`, `т.д.`, `г-н.`) or in initials (`М.`, `М.Ю.`), in which case
//! the fragment is glued onto the next one. Abbreviations that double as
//! words or sentence endings (`им.`, `рис.`, `км.`) only glue when the
//! next fragment starts with a lowercase letter or a digit.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

use crate::nlp::SentenceModel;

/// Abbreviation list compiled into the binary.
const BUILTIN_ABBREVIATIONS: &str = include_str!("../../resources/abbreviations_ru.txt");

/// Sentence splitter tuned for Russian prose.
#[derive(Debug, Clone)]
pub struct RussianSentenceModel {
    abbreviations: HashSet<String>,
    /// Only abbreviations before a lowercase letter or a digit
    ambiguous: HashSet<String>,
}

impl Default for RussianSentenceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RussianSentenceModel {
    /// Create a model with the built-in abbreviation list.
    pub fn new() -> Self {
        let mut model = Self {
            abbreviations: HashSet::new(),
            ambiguous: HashSet::new(),
        };
        model.extend(BUILTIN_ABBREVIATIONS);
        model
    }

    /// Create a model with the built-in list plus the entries in `path`.
    /// A missing or unreadable file is an error.
    pub fn with_abbreviations_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read abbreviations file: {}", path.display())
        })?;

        let mut model = Self::new();
        model.extend(&content);
        Ok(model)
    }

    fn extend(&mut self, list: &str) {
        for (entry, ambiguous) in parse_abbreviations(list) {
            if ambiguous {
                self.ambiguous.insert(entry);
            } else {
                self.abbreviations.insert(entry);
            }
        }
    }

    /// Number of known abbreviations.
    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len() + self.ambiguous.len()
    }

    /// Whether `fragment` ends in an abbreviation or initials, meaning the
    /// boundary between it and `next` is not a real sentence end.
    fn ends_with_abbreviation(&self, fragment: &str, next: Option<&str>) -> bool {
        let trimmed = fragment.trim_end();
        if !trimmed.ends_with('.') {
            return false;
        }

        let Some(token) = trimmed.split_whitespace().last() else {
            return false;
        };
        let token = token.trim_start_matches(|c: char| !c.is_alphanumeric());

        if is_initials(token) {
            return true;
        }

        let body = token.trim_end_matches('.').to_lowercase();
        if body.is_empty() {
            return false;
        }
        self.abbreviations.contains(&body)
            || (self.ambiguous.contains(&body) && next.is_some_and(continues_sentence))
    }
}

impl SentenceModel for RussianSentenceModel {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let mut sentences = Vec::new();
        let mut pending = String::new();

        let segments: Vec<&str> = text.split_sentence_bounds().collect();
        for (i, segment) in segments.iter().enumerate() {
            pending.push_str(segment);

            if self.ends_with_abbreviation(&pending, segments.get(i + 1).copied()) {
                continue;
            }

            let sentence = pending.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            pending.clear();
        }

        let rest = pending.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }

        Ok(sentences)
    }

    fn name(&self) -> &'static str {
        "russian-uax29"
    }
}

/// Parse an abbreviation list: one entry per line, `#` comments, blank lines
/// ignored, trailing period optional. A leading `~` marks an ambiguous entry.
fn parse_abbreviations(content: &str) -> impl Iterator<Item = (String, bool)> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let (line, ambiguous) = match line.strip_prefix('~') {
                Some(rest) => (rest.trim_start(), true),
                None => (line, false),
            };
            (line.trim_end_matches('.').to_lowercase(), ambiguous)
        })
        .filter(|(entry, _)| !entry.is_empty())
}

/// The next fragment starts with a lowercase letter or a digit.
fn continues_sentence(next: &str) -> bool {
    next.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_lowercase() || c.is_numeric())
}

/// `М.` or `М.Ю.`: one or more single uppercase letters, each followed by a
/// period.
fn is_initials(token: &str) -> bool {
    if !token.ends_with('.') {
        return false;
    }

    let mut parts = token.split('.').filter(|p| !p.is_empty()).peekable();
    if parts.peek().is_none() {
        return false;
    }

    parts.all(|part| {
        let mut chars = part.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
    })
}
