//! English sentence model backed by the seams library (dialog-aware).

use anyhow::{Result, anyhow};
use seams::sentence_detector::dialog_detector::SentenceDetectorDialog;

use crate::nlp::SentenceModel;

/// Sentence splitter for English text.
pub struct SeamsSentenceModel {
    detector: SentenceDetectorDialog,
}

impl SeamsSentenceModel {
    /// Initialize the seams detector. Failure here is a startup error.
    pub fn new() -> Result<Self> {
        let detector = SentenceDetectorDialog::new()
            .map_err(|e| anyhow!("Failed to initialize seams sentence detector: {:?}", e))?;
        Ok(Self { detector })
    }
}

impl SentenceModel for SeamsSentenceModel {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let sentences = self
            .detector
            .detect_sentences_borrowed(text)
            .map_err(|e| anyhow!("seams sentence detection failed: {:?}", e))?;

        Ok(sentences
            .iter()
            .map(|s| s.normalize().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }

    fn name(&self) -> &'static str {
        "seams-english"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_into_sentences() {
        let model = SeamsSentenceModel::new().unwrap();
        let sentences = model.split("First sentence. Second sentence.").unwrap();
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("First"));
        assert!(sentences[1].contains("Second"));
    }
}
