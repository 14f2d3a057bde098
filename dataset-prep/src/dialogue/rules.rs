//! Individual dialogue cue rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::DialogueCue;

/// Quoted span in guillemets or straight double quotes.
static QUOTED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(«[^»]+»|"[^"]+")"#).expect("valid quoted span regex"));

/// Dash, optional spaces, capital letter at the start of the sentence.
static DASH_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-–—]\s*([А-ЯЁA-Z])").expect("valid dash start regex"));

/// Quote closed by `» " ! ? ,`, then a dash and the author's words.
static AUTHOR_AFTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([«"].+[»"!?,])\s*[-–—]\s*([а-яё\s\w]+[.?!]?)"#)
        .expect("valid author-after regex")
});

/// Lead-in clause and colon, then a quote or a capital letter.
static AUTHOR_BEFORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([\w\s.\-]+?):\s*([«"].+[»"]|[А-ЯЁA-Z])"#).expect("valid author-before regex")
});

/// Capitalized Russian word, used to pull a name out of the author's words.
static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[А-ЯЁ][а-яё]+\b").expect("valid capitalized word regex"));

/// The author's words after a quote are only mined for a speaker when they
/// are at most this many words long.
const MAX_SPEAKER_CLAUSE_WORDS: usize = 3;

/// Text outside quotes must be shorter than this share of the sentence for
/// the sentence to count as pure quoted speech.
const MAX_RESIDUAL_RATIO: f64 = 0.3;

/// What a matching rule found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Detection {
    pub speaker: Option<String>,
}

/// A single dialogue cue rule.
pub trait CueRule: Send + Sync {
    /// The cue this rule reports.
    fn cue(&self) -> DialogueCue;

    /// Return a detection when the sentence matches this rule.
    fn detect(&self, sentence: &str) -> Option<Detection>;

    /// Whether the sentence matches this rule.
    fn matches(&self, sentence: &str) -> bool {
        self.detect(sentence).is_some()
    }
}

/// `«Привет!», – сказал Иван`
pub struct AuthorWordsAfter;

impl CueRule for AuthorWordsAfter {
    fn cue(&self) -> DialogueCue {
        DialogueCue::AuthorWordsAfter
    }

    fn detect(&self, sentence: &str) -> Option<Detection> {
        let caps = AUTHOR_AFTER.captures(sentence)?;
        let author_words = caps.get(2).map_or("", |m| m.as_str()).trim();
        Some(Detection {
            speaker: speaker_from_author_words(author_words),
        })
    }
}

/// Pull a name out of a short trailing clause such as `согласилась Маша`.
///
/// Clauses longer than three words or containing sentence punctuation are
/// treated as full sentences and yield nothing.
fn speaker_from_author_words(author_words: &str) -> Option<String> {
    if author_words.split_whitespace().count() > MAX_SPEAKER_CLAUSE_WORDS
        || author_words.contains(['?', '!', '.'])
    {
        return None;
    }

    let names: Vec<&str> = CAPITALIZED_WORD
        .find_iter(author_words)
        .map(|m| m.as_str())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(" "))
    }
}

/// `Иван: «Привет!»`
pub struct AuthorWordsBefore;

impl CueRule for AuthorWordsBefore {
    fn cue(&self) -> DialogueCue {
        DialogueCue::AuthorWordsBefore
    }

    fn detect(&self, sentence: &str) -> Option<Detection> {
        let caps = AUTHOR_BEFORE.captures(sentence)?;
        let lead_in = caps.get(1).map_or("", |m| m.as_str());
        Some(Detection {
            speaker: Some(lead_in.trim().trim_end_matches(':').to_string()),
        })
    }
}

/// `– Добрый день.`
pub struct DashStart;

impl CueRule for DashStart {
    fn cue(&self) -> DialogueCue {
        DialogueCue::DashStart
    }

    fn detect(&self, sentence: &str) -> Option<Detection> {
        DASH_START
            .is_match(sentence)
            .then(Detection::default)
    }
}

/// `«Просто проходил мимо.»`
pub struct QuotedSpeech;

impl CueRule for QuotedSpeech {
    fn cue(&self) -> DialogueCue {
        DialogueCue::QuotedSpeech
    }

    fn detect(&self, sentence: &str) -> Option<Detection> {
        if !QUOTED_SPAN.is_match(sentence) {
            return None;
        }

        let dequoted: String = sentence
            .chars()
            .filter(|c| !matches!(c, '«' | '»' | '"'))
            .collect();
        let dequoted_len = dequoted.trim().chars().count();

        let residual = QUOTED_SPAN.replace_all(sentence, "");
        let residual_len = residual.trim().chars().count();

        let mostly_quoted =
            residual_len == 0 || (residual_len as f64) < dequoted_len as f64 * MAX_RESIDUAL_RATIO;

        mostly_quoted.then(Detection::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_after_requires_dash() {
        assert!(!AuthorWordsAfter.matches("«Привет!», сказал он."));
        assert!(AuthorWordsAfter.matches("«Привет!», – сказал он."));
        assert!(AuthorWordsAfter.matches("\"Привет!\" - сказал он."));
        assert!(AuthorWordsAfter.matches("«Привет?» — сказал он."));
    }

    #[test]
    fn test_speaker_from_author_words() {
        assert_eq!(
            speaker_from_author_words("согласилась Маша"),
            Some("Маша".to_string())
        );
        assert_eq!(
            speaker_from_author_words("сказала Анна Петровна"),
            Some("Анна Петровна".to_string())
        );
        assert_eq!(speaker_from_author_words("сказал он"), None);
        assert_eq!(speaker_from_author_words("спросил Иван."), None);
        assert_eq!(speaker_from_author_words("тихо сказал ему Иван"), None);
    }

    #[test]
    fn test_author_before_speaker_is_verbatim() {
        let detection = AuthorWordsBefore
            .detect("Маша подумала: «Какая хорошая погода!»")
            .unwrap();
        assert_eq!(detection.speaker.as_deref(), Some("Маша подумала"));
    }

    #[test]
    fn test_author_before_anchored_at_start() {
        assert!(!AuthorWordsBefore.matches("«Цитата»: Вот так."));
        assert!(!AuthorWordsBefore.matches("Он сказал: тихо"));
    }

    #[test]
    fn test_dash_start_needs_capital() {
        assert!(DashStart.matches("- Привет"));
        assert!(DashStart.matches("–Hello"));
        assert!(!DashStart.matches("– привет"));
        assert!(!DashStart.matches("Привет – пока"));
    }

    #[test]
    fn test_quoted_speech_threshold() {
        assert!(QuotedSpeech.matches("«Полностью цитата»"));
        assert!(QuotedSpeech.matches("\"Просто цитата\""));
        // "он." is well under 30% of the quote length
        assert!(QuotedSpeech.matches("«Привет, как у тебя дела сегодня?» он."));
        assert!(!QuotedSpeech.matches(
            "Предложение с цитатой: В книге было написано «жили-были». Это не диалог."
        ));
        assert!(!QuotedSpeech.matches("Без кавычек."));
    }
}
