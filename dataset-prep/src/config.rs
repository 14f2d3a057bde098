//! dataset-prep configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::nlp::{Language, NlpOptions};

const DEFAULT_INPUT_DIR: &str = "input_texts";
const DEFAULT_OUTPUT_DIR: &str = "processed_data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory with .docx/.txt sources
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory for the generated .jsonl files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Descend into subdirectories of the input directory
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Sentence model language
    #[serde(default)]
    pub language: Language,

    /// Extra abbreviations for the Russian sentence model, one per line
    #[serde(default)]
    pub abbreviations_file: Option<PathBuf>,

    /// Entity gazetteer (TOML)
    #[serde(default)]
    pub gazetteer_file: Option<PathBuf>,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_recursive() -> bool {
    true
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            recursive: default_recursive(),
            language: Language::default(),
            abbreviations_file: None,
            gazetteer_file: None,
        }
    }
}

impl DatasetConfig {
    /// Get the config file path: ~/.config/dream-team/dataset-prep.toml
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".config")
            .join("dream-team");
        Ok(config_dir.join("dataset-prep.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: DatasetConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn nlp_options(&self) -> NlpOptions {
        NlpOptions {
            language: self.language,
            abbreviations_file: self.abbreviations_file.clone(),
            gazetteer_file: self.gazetteer_file.clone(),
        }
    }
}
