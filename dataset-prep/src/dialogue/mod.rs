//! Dialogue detection for single sentences.
//!
//! A sentence is run through an ordered list of cue rules and the first rule
//! that fires decides the result. The order is fixed:
//!
//! 1. [`DialogueCue::AuthorWordsAfter`]: `«Привет!», – сказал он.`
//! 2. [`DialogueCue::AuthorWordsBefore`]: `Иван сказал: «Пойдем гулять».`
//! 3. [`DialogueCue::DashStart`]: `– Добрый день.`
//! 4. [`DialogueCue::QuotedSpeech`]: `«Просто проходил мимо.»`
//!
//! Earlier rules are more specific and preempt later ones; a sentence such as
//! `«Привет!», – сказал он.` also satisfies rule 4 but is reported as rule 1.
//! This is a punctuation heuristic; ambiguous sentences can be misclassified.

mod rules;

use serde::{Deserialize, Serialize};

pub use rules::{AuthorWordsAfter, AuthorWordsBefore, CueRule, DashStart, QuotedSpeech};

/// The textual pattern that triggered a dialogue classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueCue {
    AuthorWordsAfter,
    AuthorWordsBefore,
    DashStart,
    QuotedSpeech,
}

/// Dialogue annotation of one sentence.
///
/// `dialogue_cue` is `None` (JSON `null`) when no rule matched.
/// `speaker` is only ever set together with `is_dialogue`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueInfo {
    pub is_dialogue: bool,
    pub speaker: Option<String>,
    pub dialogue_cue: Option<DialogueCue>,
}

impl DialogueInfo {
    /// A sentence that is not dialogue.
    pub fn none() -> Self {
        Self::default()
    }

    /// A dialogue sentence detected by `cue`.
    pub fn dialogue(cue: DialogueCue, speaker: Option<String>) -> Self {
        Self {
            is_dialogue: true,
            speaker,
            dialogue_cue: Some(cue),
        }
    }
}

/// Evaluates cue rules in precedence order.
pub struct DialogueClassifier {
    rules: Vec<Box<dyn CueRule>>,
}

impl Default for DialogueClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueClassifier {
    /// Classifier with the standard rule order.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(AuthorWordsAfter),
                Box::new(AuthorWordsBefore),
                Box::new(DashStart),
                Box::new(QuotedSpeech),
            ],
        }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn CueRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Classify one sentence.
    pub fn classify(&self, sentence: &str) -> DialogueInfo {
        for rule in &self.rules {
            if let Some(detection) = rule.detect(sentence) {
                return DialogueInfo::dialogue(rule.cue(), detection.speaker);
            }
        }
        DialogueInfo::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(sentence: &str) -> DialogueInfo {
        DialogueClassifier::new().classify(sentence)
    }

    #[test]
    fn test_rule_order() {
        let cues: Vec<DialogueCue> = DialogueClassifier::new().rules().map(|r| r.cue()).collect();
        assert_eq!(
            cues,
            vec![
                DialogueCue::AuthorWordsAfter,
                DialogueCue::AuthorWordsBefore,
                DialogueCue::DashStart,
                DialogueCue::QuotedSpeech,
            ]
        );
    }

    #[test]
    fn test_author_words_after() {
        let info = classify("«Привет!», – сказал он.");
        assert!(info.is_dialogue);
        assert_eq!(info.dialogue_cue, Some(DialogueCue::AuthorWordsAfter));
        assert_eq!(info.speaker, None);
    }

    #[test]
    fn test_author_words_after_preempts_quoted_speech() {
        let sentence = "«Привет, как у тебя дела сегодня?», – он.";
        assert!(QuotedSpeech.matches(sentence));

        let info = classify(sentence);
        assert_eq!(info.dialogue_cue, Some(DialogueCue::AuthorWordsAfter));
    }

    #[test]
    fn test_author_words_after_with_speaker() {
        let info = classify("«Пойдем», – согласилась Маша");
        assert_eq!(info.dialogue_cue, Some(DialogueCue::AuthorWordsAfter));
        assert_eq!(info.speaker.as_deref(), Some("Маша"));
    }

    #[test]
    fn test_author_words_after_long_clause_has_no_speaker() {
        let info = classify("«Привет! Как дела?», – спросил Иван.");
        assert_eq!(info.dialogue_cue, Some(DialogueCue::AuthorWordsAfter));
        assert_eq!(info.speaker, None);
    }

    #[test]
    fn test_author_words_before() {
        let info = classify("Он ответил: «Все отлично!»");
        assert!(info.is_dialogue);
        assert_eq!(info.dialogue_cue, Some(DialogueCue::AuthorWordsBefore));
        assert_eq!(info.speaker.as_deref(), Some("Он ответил"));
    }

    #[test]
    fn test_author_words_before_capital_start() {
        let info = classify("Иван: Пойдем гулять.");
        assert_eq!(info.dialogue_cue, Some(DialogueCue::AuthorWordsBefore));
        assert_eq!(info.speaker.as_deref(), Some("Иван"));
    }

    #[test]
    fn test_dash_start() {
        let info = classify("– Добрый день.");
        assert!(info.is_dialogue);
        assert_eq!(info.dialogue_cue, Some(DialogueCue::DashStart));
        assert_eq!(info.speaker, None);
    }

    #[test]
    fn test_dash_start_with_leading_space_and_em_dash() {
        let info = classify("  —А ты кто?");
        assert_eq!(info.dialogue_cue, Some(DialogueCue::DashStart));
    }

    #[test]
    fn test_quoted_speech() {
        let info = classify("«Просто проходил мимо.»");
        assert!(info.is_dialogue);
        assert_eq!(info.dialogue_cue, Some(DialogueCue::QuotedSpeech));
        assert_eq!(info.speaker, None);
    }

    #[test]
    fn test_quote_inside_narration_is_not_dialogue() {
        let info = classify("В книге было написано «жили-были», и это все.");
        assert!(!info.is_dialogue);
    }

    #[test]
    fn test_plain_sentence() {
        let info = classify("Это обычное предложение без диалога.");
        assert!(!info.is_dialogue);
        assert_eq!(info.dialogue_cue, None);
        assert_eq!(info.speaker, None);
    }

    #[test]
    fn test_serialization_of_non_dialogue() {
        let json = serde_json::to_string(&DialogueInfo::none()).unwrap();
        assert_eq!(
            json,
            r#"{"is_dialogue":false,"speaker":null,"dialogue_cue":null}"#
        );
    }

    #[test]
    fn test_speaker_implies_dialogue() {
        let sentences = [
            "«Пойдем», – согласилась Маша",
            "Иван сказал: «Пойдем гулять».",
            "– Ну что ж, – вздохнул он, – придется идти.",
            "Просто текст.",
        ];
        for sentence in sentences {
            let info = classify(sentence);
            if info.speaker.is_some() {
                assert!(info.is_dialogue, "speaker without dialogue: {}", sentence);
            }
        }
    }
}
