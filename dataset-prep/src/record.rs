//! Output record types. Field order here is the field order in the JSONL.

use serde::{Deserialize, Serialize};

use crate::dialogue::DialogueInfo;

/// Semantic tag of an entity span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "PER")]
    Person,
    #[serde(rename = "LOC")]
    Location,
    #[serde(rename = "ORG")]
    Organization,
    /// Any other tag the entity model supplies, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl EntityType {
    /// Map an extractor tag to a type. `PER`/`LOC`/`ORG` (any case) map to
    /// the known variants, everything else is kept as-is.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_uppercase().as_str() {
            "PER" | "PERSON" => Self::Person,
            "LOC" | "LOCATION" => Self::Location,
            "ORG" | "ORGANIZATION" => Self::Organization,
            _ => Self::Other(tag.to_string()),
        }
    }
}

/// A tagged substring of a sentence. Offsets count characters, not bytes,
/// and `end_char` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub start_char: usize,
    pub end_char: usize,
}

/// One sentence of a paragraph with its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub sentence_index_in_paragraph: usize,
    pub text: String,
    pub entities: Vec<EntitySpan>,
    pub dialogue_info: DialogueInfo,
}

/// The unit written to the JSONL output: one per non-empty paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    pub id: String,
    pub source_file: String,
    pub category: String,
    pub paragraph_index: usize,
    pub paragraph_text: String,
    pub sentences: Vec<SentenceRecord>,
}

impl ParagraphRecord {
    /// Record id: `{file_stem}_paragraph_{index}`.
    pub fn make_id(file_stem: &str, paragraph_index: usize) -> String {
        format!("{}_paragraph_{}", file_stem, paragraph_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::DialogueCue;

    #[test]
    fn test_entity_type_from_tag() {
        assert_eq!(EntityType::from_tag("PER"), EntityType::Person);
        assert_eq!(EntityType::from_tag("loc"), EntityType::Location);
        assert_eq!(EntityType::from_tag("ORG"), EntityType::Organization);
        assert_eq!(
            EntityType::from_tag("EVENT"),
            EntityType::Other("EVENT".to_string())
        );
    }

    #[test]
    fn test_entity_span_serialization() {
        let span = EntitySpan {
            text: "Казань".to_string(),
            entity_type: EntityType::Location,
            start_char: 18,
            end_char: 24,
        };
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(
            json,
            r#"{"text":"Казань","type":"LOC","start_char":18,"end_char":24}"#
        );

        let other = EntitySpan {
            entity_type: EntityType::Other("EVENT".to_string()),
            ..span
        };
        let json = serde_json::to_string(&other).unwrap();
        assert!(json.contains(r#""type":"EVENT""#));
    }

    #[test]
    fn test_paragraph_record_layout() {
        let record = ParagraphRecord {
            id: ParagraphRecord::make_id("chapter1", 0),
            source_file: "chapter1.txt".to_string(),
            category: "book1".to_string(),
            paragraph_index: 0,
            paragraph_text: "– Добрый день.".to_string(),
            sentences: vec![SentenceRecord {
                sentence_index_in_paragraph: 0,
                text: "– Добрый день.".to_string(),
                entities: Vec::new(),
                dialogue_info: DialogueInfo::dialogue(DialogueCue::DashStart, None),
            }],
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"id":"chapter1_paragraph_0","source_file":"chapter1.txt","category":"book1","#,
                r#""paragraph_index":0,"paragraph_text":"– Добрый день.","sentences":[{"#,
                r#""sentence_index_in_paragraph":0,"text":"– Добрый день.","entities":[],"#,
                r#""dialogue_info":{"is_dialogue":true,"speaker":null,"dialogue_cue":"dash_start"}}]}"#
            )
        );
    }
}
