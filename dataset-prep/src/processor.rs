//! File-to-records conversion: one input document to one `.jsonl` file.

use anyhow::{Context, Result, anyhow, bail};
use log::{error, info, warn};
use std::ffi::OsStr;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::dialogue::DialogueClassifier;
use crate::loaders::DocumentFormat;
use crate::nlp::NlpModels;
use crate::record::{ParagraphRecord, SentenceRecord};

/// Category used when a file's directory cannot be expressed relative to
/// the input root.
pub const UNKNOWN_CATEGORY: &str = "unknown_category";

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Records were written to `path`.
    Written { path: PathBuf, paragraphs: usize },
    /// The document had no paragraphs; nothing was written.
    Empty,
}

/// Converts documents to annotated JSONL using shared models.
pub struct FileConverter<'a> {
    models: &'a NlpModels,
    classifier: &'a DialogueClassifier,
}

impl<'a> FileConverter<'a> {
    pub fn new(models: &'a NlpModels, classifier: &'a DialogueClassifier) -> Self {
        Self { models, classifier }
    }

    /// Convert one file, logging the outcome. Returns `true` on success,
    /// including the empty-document case. Errors never escape.
    pub fn process(&self, input: &Path, output_dir: &Path, input_root: &Path) -> bool {
        match self.convert(input, output_dir, input_root) {
            Ok(ConversionOutcome::Written { path, paragraphs }) => {
                info!(
                    "Processed '{}' ({} paragraphs) -> '{}'",
                    input.display(),
                    paragraphs,
                    path.display()
                );
                true
            }
            Ok(ConversionOutcome::Empty) => {
                info!(
                    "No paragraphs extracted or file is empty: {}",
                    input.display()
                );
                true
            }
            Err(e) => {
                error!("Failed to process '{}': {:#}", input.display(), e);
                false
            }
        }
    }

    /// Convert one file.
    ///
    /// The output is `<output_dir>/<stem>.jsonl`; `output_dir` must exist.
    /// All records are assembled before anything is written, and the file is
    /// replaced atomically, so a failed conversion leaves no partial output.
    pub fn convert(
        &self,
        input: &Path,
        output_dir: &Path,
        input_root: &Path,
    ) -> Result<ConversionOutcome> {
        if !input.exists() {
            bail!("File not found: {}", input.display());
        }

        let format = DocumentFormat::from_path(input).ok_or_else(|| {
            anyhow!(
                "Unsupported file format: {} (supported: .docx, .txt)",
                input.display()
            )
        })?;

        let file_name = input
            .file_name()
            .and_then(OsStr::to_str)
            .context("Invalid file name")?;
        let file_stem = input
            .file_stem()
            .and_then(OsStr::to_str)
            .context("Invalid file name")?;

        let paragraphs = format.load_paragraphs(input);
        if paragraphs.is_empty() {
            return Ok(ConversionOutcome::Empty);
        }

        let category = category_for(input, input_root);
        let records = self.build_records(file_stem, file_name, &category, &paragraphs);

        let output_path = output_dir.join(format!("{}.jsonl", file_stem));
        write_jsonl(&output_path, &records)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        Ok(ConversionOutcome::Written {
            path: output_path,
            paragraphs: records.len(),
        })
    }

    /// Build one record per non-empty paragraph.
    pub fn build_records(
        &self,
        file_stem: &str,
        file_name: &str,
        category: &str,
        paragraphs: &[String],
    ) -> Vec<ParagraphRecord> {
        paragraphs
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(paragraph_index, text)| ParagraphRecord {
                id: ParagraphRecord::make_id(file_stem, paragraph_index),
                source_file: file_name.to_string(),
                category: category.to_string(),
                paragraph_index,
                paragraph_text: text.clone(),
                sentences: self.annotate_sentences(text),
            })
            .collect()
    }

    fn annotate_sentences(&self, paragraph: &str) -> Vec<SentenceRecord> {
        self.models
            .split_sentences(paragraph)
            .into_iter()
            .enumerate()
            .map(|(index, text)| SentenceRecord {
                sentence_index_in_paragraph: index,
                entities: self.models.extract_entities(&text),
                dialogue_info: self.classifier.classify(&text),
                text,
            })
            .collect()
    }
}

/// Category of a file: its directory relative to `input_root`, with `/`
/// separators. Files directly in the root get `""`.
pub fn category_for(input: &Path, input_root: &Path) -> String {
    let parent = input.parent().unwrap_or(Path::new(""));

    let relative = parent.strip_prefix(input_root).map(Path::to_path_buf).or_else(|_| {
        let parent = parent.canonicalize()?;
        let root = input_root.canonicalize()?;
        parent
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|e| std::io::Error::other(e.to_string()))
    });

    match relative {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(e) => {
            warn!(
                "Could not determine category for {} relative to {}: {}",
                input.display(),
                input_root.display(),
                e
            );
            UNKNOWN_CATEGORY.to_string()
        }
    }
}

/// Write one JSON object per line through a temporary file in the target
/// directory, then move it over `path`.
fn write_jsonl(path: &Path, records: &[ParagraphRecord]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        for record in records {
            serde_json::to_writer(&mut writer, record).context("Failed to serialize record")?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }

    tmp.persist(path)
        .map_err(|e| anyhow!("Failed to move output into place: {}", e.error))?;
    Ok(())
}
