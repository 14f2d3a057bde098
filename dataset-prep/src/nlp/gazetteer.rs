//! Dictionary-based entity model.
//!
//! The gazetteer is a TOML file mapping a tag to the surface forms it
//! covers:
//!
//! ```toml
//! PER = ["Иван Грозный", "Петр Первый"]
//! LOC = ["Казань", "Санкт-Петербург"]
//! ORG = ["Академия наук"]
//! ```
//!
//! Matching is case-sensitive, whole-word and non-overlapping; at any
//! position the longest entry wins.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use super::EntityModel;
use crate::record::{EntitySpan, EntityType};

pub struct GazetteerModel {
    pattern: Regex,
    types: HashMap<String, EntityType>,
}

impl GazetteerModel {
    /// Load a gazetteer file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid gazetteer: {}", path.display()))
    }

    /// Parse gazetteer TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> = toml::from_str(content)?;

        let mut types = HashMap::new();
        for (tag, names) in &table {
            let entity_type = EntityType::from_tag(tag);
            for name in names {
                let name = name.trim();
                if !name.is_empty() {
                    types
                        .entry(name.to_string())
                        .or_insert_with(|| entity_type.clone());
                }
            }
        }

        if types.is_empty() {
            bail!("gazetteer has no entries");
        }

        let mut names: Vec<&String> = types.keys().collect();
        // Longest first so the alternation prefers the longest entry at a position
        names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let alternation = names
            .iter()
            .map(|name| word_pattern(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).context("Failed to compile gazetteer")?;

        Ok(Self { pattern, types })
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.types.len()
    }
}

/// Escaped entry with word boundaries on the sides that start or end with a
/// word character.
fn word_pattern(name: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();
    if name.chars().next().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(name));
    if name.chars().last().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

impl EntityModel for GazetteerModel {
    fn tag(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let mut spans = Vec::new();
        let mut chars_before = 0;
        let mut last_byte = 0;

        for m in self.pattern.find_iter(text) {
            let Some(entity_type) = self.types.get(m.as_str()) else {
                continue;
            };

            chars_before += text[last_byte..m.start()].chars().count();
            let len = m.as_str().chars().count();
            spans.push(EntitySpan {
                text: m.as_str().to_string(),
                entity_type: entity_type.clone(),
                start_char: chars_before,
                end_char: chars_before + len,
            });
            chars_before += len;
            last_byte = m.end();
        }

        Ok(spans)
    }

    fn name(&self) -> &'static str {
        "gazetteer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAZETTEER: &str = r#"
PER = ["Иван Грозный", "Иван", "Петр Первый"]
LOC = ["Казань", "Санкт-Петербург"]
EVENT = ["Смута"]
"#;

    #[test]
    fn test_tags_with_char_offsets() {
        let model = GazetteerModel::from_toml(GAZETTEER).unwrap();
        let spans = model
            .tag("Иван Грозный взял Казань в 1552 году.")
            .unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Иван Грозный");
        assert_eq!(spans[0].entity_type, EntityType::Person);
        assert_eq!((spans[0].start_char, spans[0].end_char), (0, 12));
        assert_eq!(spans[1].text, "Казань");
        assert_eq!(spans[1].entity_type, EntityType::Location);
        assert_eq!((spans[1].start_char, spans[1].end_char), (18, 24));
    }

    #[test]
    fn test_whole_words_only() {
        let model = GazetteerModel::from_toml(GAZETTEER).unwrap();
        assert!(model.tag("Ивановы пришли.").unwrap().is_empty());
        assert_eq!(model.tag("Пришел Иван.").unwrap()[0].text, "Иван");
    }

    #[test]
    fn test_custom_tag() {
        let model = GazetteerModel::from_toml(GAZETTEER).unwrap();
        let spans = model.tag("Началась Смута.").unwrap();
        assert_eq!(spans[0].entity_type, EntityType::Other("EVENT".to_string()));
    }

    #[test]
    fn test_empty_gazetteer_is_error() {
        assert!(GazetteerModel::from_toml("PER = []").is_err());
        assert!(GazetteerModel::from_toml("PER = 5").is_err());
    }
}
