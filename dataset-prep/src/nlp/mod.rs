//! NLP capability provider.
//!
//! Sentence segmentation and entity extraction are backed by models that are
//! loaded once at startup and handed to the converter as [`NlpModels`].
//! A sentence model is mandatory: if it cannot be loaded, [`NlpModels::load`]
//! fails. An entity model is optional: if it cannot be loaded, extraction
//! degrades to returning no entities.

mod gazetteer;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;

use crate::record::EntitySpan;
use crate::text::{RussianSentenceModel, SeamsSentenceModel};

pub use gazetteer::GazetteerModel;

/// Splits a block of text into sentences.
pub trait SentenceModel: Send + Sync {
    /// Split `text` into trimmed, non-empty sentences.
    fn split(&self, text: &str) -> Result<Vec<String>>;

    /// Model name for logging.
    fn name(&self) -> &'static str;
}

/// Tags named entities in a sentence.
pub trait EntityModel: Send + Sync {
    /// Tagged spans in order of position, offsets in characters.
    fn tag(&self, text: &str) -> Result<Vec<EntitySpan>>;

    /// Model name for logging.
    fn name(&self) -> &'static str;
}

/// Language of the sentence boundary model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Russian,
    English,
}

/// Where to find model resources.
#[derive(Debug, Clone, Default)]
pub struct NlpOptions {
    pub language: Language,
    /// Extra abbreviations for the Russian model, one per line.
    pub abbreviations_file: Option<PathBuf>,
    /// Entity gazetteer (TOML).
    pub gazetteer_file: Option<PathBuf>,
}

/// Loaded NLP models shared by every file in a run.
pub struct NlpModels {
    sentences: Box<dyn SentenceModel>,
    entities: Option<Box<dyn EntityModel>>,
}

impl NlpModels {
    /// Load the models described by `options`.
    ///
    /// Errors only when the sentence model cannot be loaded.
    pub fn load(options: &NlpOptions) -> Result<Self> {
        let sentences: Box<dyn SentenceModel> = match options.language {
            Language::Russian => {
                let model = match &options.abbreviations_file {
                    Some(path) => RussianSentenceModel::with_abbreviations_file(path)
                        .context("Sentence segmentation resources are missing")?,
                    None => RussianSentenceModel::new(),
                };
                debug!("Known abbreviations: {}", model.abbreviation_count());
                Box::new(model)
            }
            Language::English => Box::new(SeamsSentenceModel::new()?),
        };
        info!("Sentence model loaded: {}", sentences.name());

        let entities: Option<Box<dyn EntityModel>> = match &options.gazetteer_file {
            Some(path) => match GazetteerModel::load(path) {
                Ok(model) => {
                    info!(
                        "Entity model loaded: {} ({} entries)",
                        model.name(),
                        model.len()
                    );
                    Some(Box::new(model))
                }
                Err(e) => {
                    warn!("Entity model unavailable, entities will be empty: {:#}", e);
                    None
                }
            },
            None => {
                warn!("No entity gazetteer configured, entities will be empty");
                None
            }
        };

        Ok(Self {
            sentences,
            entities,
        })
    }

    /// Build from already constructed models.
    pub fn new(sentences: Box<dyn SentenceModel>, entities: Option<Box<dyn EntityModel>>) -> Self {
        Self {
            sentences,
            entities,
        }
    }

    /// Whether entity extraction is available.
    pub fn has_entity_model(&self) -> bool {
        self.entities.is_some()
    }

    /// Split a paragraph into sentences.
    ///
    /// If the model fails, the whole trimmed paragraph is returned as a
    /// single sentence so no text is lost.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        match self.sentences.split(text) {
            Ok(sentences) => sentences
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(e) => {
                warn!("Sentence splitting failed, keeping paragraph whole: {:#}", e);
                vec![trimmed.to_string()]
            }
        }
    }

    /// Tag entities in one sentence. Empty when no model is loaded, the
    /// input is empty or the model fails.
    pub fn extract_entities(&self, text: &str) -> Vec<EntitySpan> {
        let Some(model) = &self.entities else {
            return Vec::new();
        };
        if text.is_empty() {
            return Vec::new();
        }

        match model.tag(text) {
            Ok(spans) => spans,
            Err(e) => {
                debug!("Entity tagging failed: {:#}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub models for tests.

    use super::*;
    use anyhow::bail;

    /// Splits on `|`; fails on text containing `FAIL`.
    pub struct PipeSplitter;

    impl SentenceModel for PipeSplitter {
        fn split(&self, text: &str) -> Result<Vec<String>> {
            if text.contains("FAIL") {
                bail!("stub failure");
            }
            Ok(text.split('|').map(str::to_string).collect())
        }

        fn name(&self) -> &'static str {
            "pipe"
        }
    }

    /// Always fails.
    pub struct BrokenEntities;

    impl EntityModel for BrokenEntities {
        fn tag(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            bail!("model crashed")
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }
}
