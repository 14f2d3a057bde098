//! Batch runner: discover input documents and convert each one, mirroring the
//! input directory tree under the output root.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::dialogue::DialogueClassifier;
use crate::loaders::is_supported;
use crate::nlp::NlpModels;
use crate::processor::FileConverter;

/// Output directory → input files that write into it, both sorted.
pub type DiscoveryMap = BTreeMap<PathBuf, Vec<PathBuf>>;

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
}

/// Find supported files under `input_root` and group them by the output
/// directory they belong to.
///
/// Root-level files map to `output_root`. With `recursive`, a file in
/// `input_root/a/b` maps to `output_root/a/b`; without it, subdirectories are
/// ignored.
pub fn discover_files(input_root: &Path, output_root: &Path, recursive: bool) -> DiscoveryMap {
    let mut map = DiscoveryMap::new();

    if recursive {
        for entry in WalkDir::new(input_root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_supported(entry.path()) {
                continue;
            }

            let parent = entry.path().parent().unwrap_or(input_root);
            let target = match parent.strip_prefix(input_root) {
                Ok(rel) if rel.as_os_str().is_empty() => output_root.to_path_buf(),
                Ok(rel) => output_root.join(rel),
                Err(_) => output_root.to_path_buf(),
            };
            map.entry(target)
                .or_default()
                .push(entry.path().to_path_buf());
        }
    } else {
        match fs::read_dir(input_root) {
            Ok(entries) => {
                let files: Vec<PathBuf> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && is_supported(p))
                    .collect();
                if !files.is_empty() {
                    map.insert(output_root.to_path_buf(), files);
                }
            }
            Err(e) => warn!("Failed to list {}: {}", input_root.display(), e),
        }
    }

    for files in map.values_mut() {
        files.sort();
    }
    map
}

/// Run the whole batch.
///
/// A missing input root is logged and yields an empty summary. Individual
/// file failures are counted and never stop the run.
pub fn run_pipeline(
    input_root: &Path,
    output_root: &Path,
    recursive: bool,
    models: &NlpModels,
    classifier: &DialogueClassifier,
) -> Result<PipelineSummary> {
    let mut summary = PipelineSummary::default();

    if !input_root.is_dir() {
        error!(
            "Input directory not found: {}. Create it and put .docx/.txt files there, or pass a different path.",
            input_root.display()
        );
        return Ok(summary);
    }

    info!(
        "Searching for files in {}{}",
        input_root.display(),
        if recursive { " (including subdirectories)" } else { "" }
    );

    let map = discover_files(input_root, output_root, recursive);
    summary.discovered = map.values().map(Vec::len).sum();

    if summary.discovered == 0 {
        warn!(
            "No .docx or .txt files found in {}",
            input_root.display()
        );
        return Ok(summary);
    }
    info!("Found {} file(s) to process", summary.discovered);

    let pb = ProgressBar::new(summary.discovered as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let converter = FileConverter::new(models, classifier);

    for (output_dir, files) in &map {
        if !output_dir.is_dir() {
            debug!("Creating output directory: {}", output_dir.display());
            if let Err(e) = fs::create_dir_all(output_dir) {
                error!(
                    "Failed to create output directory {}: {}",
                    output_dir.display(),
                    e
                );
                summary.failed += files.len();
                pb.inc(files.len() as u64);
                continue;
            }
        }

        for file in files {
            pb.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            if converter.process(file, output_dir, input_root) {
                summary.processed += 1;
            } else {
                summary.failed += 1;
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    info!(
        "Dataset processing finished: {} of {} file(s) processed, {} failed",
        summary.processed, summary.discovered, summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::docx::tests::write_docx;
    use crate::record::ParagraphRecord;
    use crate::text::RussianSentenceModel;
    use tempfile::TempDir;

    fn models() -> NlpModels {
        NlpModels::new(Box::new(RussianSentenceModel::new()), None)
    }

    fn read_records(path: &Path) -> Vec<ParagraphRecord> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// input/book1/chapter1.txt, input/standalone.txt, input/notes.md
    fn sample_tree(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
        let input = temp_dir.path().join("input_texts");
        let output = temp_dir.path().join("processed_data");
        fs::create_dir_all(input.join("book1")).unwrap();
        fs::write(input.join("book1").join("chapter1.txt"), "A.\n\nB.").unwrap();
        fs::write(input.join("standalone.txt"), "C.").unwrap();
        fs::write(input.join("notes.md"), "ignored").unwrap();
        (input, output)
    }

    #[test]
    fn test_discover_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let (input, output) = sample_tree(&temp_dir);

        let map = discover_files(&input, &output, true);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&output], vec![input.join("standalone.txt")]);
        assert_eq!(
            map[&output.join("book1")],
            vec![input.join("book1").join("chapter1.txt")]
        );
    }

    #[test]
    fn test_discover_flat_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let (input, output) = sample_tree(&temp_dir);

        let map = discover_files(&input, &output, false);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&output], vec![input.join("standalone.txt")]);
    }

    #[test]
    fn test_run_mirrors_tree() {
        let temp_dir = TempDir::new().unwrap();
        let (input, output) = sample_tree(&temp_dir);

        let summary =
            run_pipeline(&input, &output, true, &models(), &DialogueClassifier::new()).unwrap();
        assert_eq!(
            summary,
            PipelineSummary {
                discovered: 2,
                processed: 2,
                failed: 0
            }
        );

        let chapter = read_records(&output.join("book1").join("chapter1.jsonl"));
        assert_eq!(chapter.len(), 2);
        assert!(chapter.iter().all(|r| r.category == "book1"));
        assert_eq!(chapter[1].id, "chapter1_paragraph_1");

        let standalone = read_records(&output.join("standalone.jsonl"));
        assert_eq!(standalone.len(), 1);
        assert_eq!(standalone[0].category, "");
        assert!(!output.join("notes.jsonl").exists());
    }

    #[test]
    fn test_run_docx_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(input.join("story")).unwrap();
        write_docx(
            &input.join("story").join("part.docx"),
            &["Первый абзац.", "", "– Второй абзац."],
        );

        let summary =
            run_pipeline(&input, &output, true, &models(), &DialogueClassifier::new()).unwrap();
        assert_eq!(summary.processed, 1);

        let records = read_records(&output.join("story").join("part.jsonl"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "story");
        assert!(records[1].sentences[0].dialogue_info.is_dialogue);
    }

    #[test]
    fn test_missing_input_root_is_empty_run() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out");

        let summary = run_pipeline(
            &temp_dir.path().join("nope"),
            &output,
            true,
            &models(),
            &DialogueClassifier::new(),
        )
        .unwrap();
        assert_eq!(summary, PipelineSummary::default());
        assert!(!output.exists());
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.txt"), "Первый.").unwrap();
        fs::write(input.join("b.txt"), "Второй.").unwrap();
        fs::write(input.join("c.txt"), "Третий.").unwrap();
        // Block b.jsonl with a non-empty directory
        fs::create_dir_all(output.join("b.jsonl").join("x")).unwrap();

        let summary =
            run_pipeline(&input, &output, false, &models(), &DialogueClassifier::new()).unwrap();
        assert_eq!(
            summary,
            PipelineSummary {
                discovered: 3,
                processed: 2,
                failed: 1
            }
        );
        assert!(output.join("a.jsonl").is_file());
        assert!(output.join("c.jsonl").is_file());
    }

    #[test]
    fn test_empty_input_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(input.join("empty_sub")).unwrap();

        let summary =
            run_pipeline(&input, &output, true, &models(), &DialogueClassifier::new()).unwrap();
        assert_eq!(summary.discovered, 0);
        assert!(!output.exists());
    }
}
