//! dataset-prep - Convert .txt/.docx documents into annotated JSONL records

mod config;
mod dialogue;
mod loaders;
mod nlp;
mod pipeline;
mod processor;
mod record;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::DatasetConfig;
use dialogue::DialogueClassifier;
use log::{debug, info};
use nlp::{Language, NlpModels};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dataset-prep")]
#[command(about = "Convert .txt/.docx documents into annotated JSONL training records", long_about = None)]
#[command(version)]
struct Args {
    /// Input directory (default: config value, then ./input_texts)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory (default: config value, then ./processed_data)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only process files directly inside the input directory
    #[arg(long)]
    no_recursive: bool,

    /// Sentence model language
    #[arg(long, value_enum)]
    language: Option<LanguageArg>,

    /// Entity gazetteer file (TOML)
    #[arg(long)]
    gazetteer: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LanguageArg {
    Russian,
    English,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Russian => Language::Russian,
            LanguageArg::English => Language::English,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the input and output directories
    Init,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default input directory
    SetInput {
        /// Directory path
        path: PathBuf,
    },
    /// Set default output directory
    SetOutput {
        /// Directory path
        path: PathBuf,
    },
    /// Set default language (russian, english)
    SetLanguage {
        #[arg(value_enum)]
        language: LanguageArg,
    },
    /// Set entity gazetteer file
    SetGazetteer {
        /// Path to gazetteer TOML
        path: PathBuf,
    },
    /// Set extra abbreviations file
    SetAbbreviations {
        /// Path to abbreviations list
        path: PathBuf,
    },
    /// Enable or disable recursive search
    SetRecursive {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let mut config = DatasetConfig::load().context("Failed to load configuration")?;
    if let Some(input) = args.input.clone() {
        config.input_dir = input;
    }
    if let Some(output) = args.output.clone() {
        config.output_dir = output;
    }
    if args.no_recursive {
        config.recursive = false;
    }
    if let Some(language) = args.language {
        config.language = language.into();
    }
    if let Some(gazetteer) = args.gazetteer.clone() {
        config.gazetteer_file = Some(gazetteer);
    }

    if let Some(Commands::Init) = &args.command {
        return init_directories(&config);
    }

    debug!("Input: {}", config.input_dir.display());
    debug!("Output: {}", config.output_dir.display());
    debug!("Recursive: {}", config.recursive);

    let models = NlpModels::load(&config.nlp_options()).context("Failed to load NLP models")?;
    if !models.has_entity_model() {
        info!("Entity extraction disabled; records will have empty entity lists");
    }
    let classifier = DialogueClassifier::new();
    debug!(
        "Dialogue rules: {}",
        classifier
            .rules()
            .map(|r| format!("{:?}", r.cue()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let summary = pipeline::run_pipeline(
        &config.input_dir,
        &config.output_dir,
        config.recursive,
        &models,
        &classifier,
    )?;

    println!(
        "Processed {}/{} file(s){}",
        summary.processed,
        summary.discovered,
        if summary.failed > 0 {
            format!(", {} failed", summary.failed)
        } else {
            String::new()
        }
    );

    Ok(())
}

fn init_directories(config: &DatasetConfig) -> Result<()> {
    for dir in [&config.input_dir, &config.output_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        info!("Directory ready: {}", dir.display());
    }
    println!(
        "Put .docx/.txt files into {} and run dataset-prep",
        config.input_dir.display()
    );
    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = DatasetConfig::load()?;
            println!("Configuration file: {:?}", DatasetConfig::config_path()?);
            println!();
            println!("input_dir = \"{}\"", config.input_dir.display());
            println!("output_dir = \"{}\"", config.output_dir.display());
            println!("recursive = {}", config.recursive);
            println!("language = {:?}", config.language);
            match &config.abbreviations_file {
                Some(path) => println!("abbreviations_file = \"{}\"", path.display()),
                None => println!("abbreviations_file = (built-in list only)"),
            }
            match &config.gazetteer_file {
                Some(path) => println!("gazetteer_file = \"{}\"", path.display()),
                None => println!("gazetteer_file = (none, entities disabled)"),
            }
        }
        ConfigAction::SetInput { path } => {
            let mut config = DatasetConfig::load()?;
            config.input_dir = path.clone();
            config.save()?;
            println!("Input directory set to: {}", path.display());
        }
        ConfigAction::SetOutput { path } => {
            let mut config = DatasetConfig::load()?;
            config.output_dir = path.clone();
            config.save()?;
            println!("Output directory set to: {}", path.display());
        }
        ConfigAction::SetLanguage { language } => {
            let mut config = DatasetConfig::load()?;
            config.language = (*language).into();
            config.save()?;
            println!("Language set to: {:?}", config.language);
        }
        ConfigAction::SetGazetteer { path } => {
            if !path.exists() {
                anyhow::bail!("Gazetteer file not found: {}", path.display());
            }
            let mut config = DatasetConfig::load()?;
            config.gazetteer_file = Some(path.clone());
            config.save()?;
            println!("Gazetteer set to: {}", path.display());
        }
        ConfigAction::SetAbbreviations { path } => {
            if !path.exists() {
                anyhow::bail!("Abbreviations file not found: {}", path.display());
            }
            let mut config = DatasetConfig::load()?;
            config.abbreviations_file = Some(path.clone());
            config.save()?;
            println!("Abbreviations file set to: {}", path.display());
        }
        ConfigAction::SetRecursive { value } => {
            let mut config = DatasetConfig::load()?;
            config.recursive = *value;
            config.save()?;
            println!("Recursive search: {}", value);
        }
    }
    Ok(())
}
