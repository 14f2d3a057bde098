mod client;
mod profile;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::ProfileClient;
use gptunnel_client::{ClientConfig, GenerationParams};
use profile::{AgentDetails, ProfileOptions};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "profile-creator",
    about = "Generate AI agent profiles with GPTunnel models",
    long_about = "Composes a character-writer prompt from the details you provide and asks a GPTunnel chat model for a full agent profile"
)]
#[command(version)]
struct Args {
    /// Enable debug mode for verbose output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available models
    Models,
    /// Generate an agent profile
    Generate(GenerateArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Name or code name
    #[arg(long)]
    name: Option<String>,

    /// Main role
    #[arg(long)]
    role: Option<String>,

    /// Key tasks
    #[arg(long)]
    tasks: Option<String>,

    /// Age, or how the agent is perceived
    #[arg(long)]
    age: Option<String>,

    /// Education or source of knowledge
    #[arg(long)]
    education: Option<String>,

    /// Description of the agent's appearance
    #[arg(long)]
    photo_description: Option<String>,

    /// Model id (overrides default from config)
    #[arg(short, long)]
    model: Option<String>,

    /// Bill the request to the personal wallet balance
    #[arg(long)]
    wallet: bool,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f64>,

    /// Maximum tokens in the reply
    #[arg(long)]
    max_tokens: Option<u32>,

    /// File with a system prompt that replaces the default one
    #[arg(long)]
    system_prompt: Option<PathBuf>,

    /// File with a user prompt that replaces the generated one
    #[arg(long)]
    user_prompt: Option<PathBuf>,

    /// Also write the profile to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl GenerateArgs {
    fn details(&self) -> AgentDetails {
        AgentDetails {
            name: self.name.clone(),
            role: self.role.clone(),
            tasks: self.tasks.clone(),
            age: self.age.clone(),
            education: self.education.clone(),
            photo_description: self.photo_description.clone(),
        }
    }

    fn options(&self) -> Result<ProfileOptions> {
        let mut params = GenerationParams::new();
        if let Some(temperature) = self.temperature {
            params = params.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            params = params.max_tokens(max_tokens);
        }

        Ok(ProfileOptions {
            system_template: read_template(self.system_prompt.as_deref())?,
            user_template: read_template(self.user_prompt.as_deref())?,
            params,
        })
    }
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Store the API key
    SetKey {
        /// GPTunnel API key
        key: String,
    },
    /// Set the default model
    SetModel {
        /// Model id
        model: String,
    },
    /// Use the personal wallet balance by default
    SetWallet {
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn read_template(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|p| {
        std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read prompt template: {}", p.display()))
    })
    .transpose()
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = ClientConfig::load()?;
            let path = ClientConfig::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            let key_status = match config.api_key() {
                Ok(_) if config.api_key.is_some() => "(set in config)",
                Ok(_) => "(from GPTUNNEL_API_KEY)",
                Err(_) => "(not set)",
            };
            println!("api_key = {}", key_status);
            println!("base_url = \"{}\"", config.base_url);
            println!("timeout_secs = {}", config.timeout_secs);
            println!("default_model = \"{}\"", config.default_model);
            println!("use_wallet_balance = {}", config.use_wallet_balance);
            println!("temperature = {}", config.temperature);
            println!("max_tokens = {}", config.max_tokens);
        }
        ConfigAction::SetKey { key } => {
            if key.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            let mut config = ClientConfig::load()?;
            config.api_key = Some(key.trim().to_string());
            config.save()?;
            println!("API key saved to {}", ClientConfig::config_path()?.display());
        }
        ConfigAction::SetModel { model } => {
            let mut config = ClientConfig::load()?;
            config.default_model = model.clone();
            config.save()?;
            println!("Default model set to: {}", model);
        }
        ConfigAction::SetWallet { enabled } => {
            let mut config = ClientConfig::load()?;
            config.use_wallet_balance = *enabled;
            config.save()?;
            println!("Use wallet balance: {}", enabled);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &args.command {
        Commands::Config { action } => return handle_config_command(action),
        _ => ClientConfig::load().context("Failed to load GPTunnel configuration")?,
    };

    match &args.command {
        Commands::Models => {
            let client = ProfileClient::new(&config, None, false)?;
            let models = client.models().await?;
            if models.is_empty() {
                println!("No models available");
            }
            for model in &models {
                let marker = if model.id == client.model() {
                    " (default)"
                } else {
                    ""
                };
                println!("  {} - {}{}", model.id, model.title, marker);
            }
        }
        Commands::Generate(generate) => {
            let client = ProfileClient::new(&config, generate.model.as_deref(), generate.wallet)?;
            let profile = client
                .generate(&generate.details(), &generate.options()?)
                .await?;

            println!("{}", profile);

            if let Some(output) = &generate.output {
                std::fs::write(output, &profile)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                eprintln!("Saved to {}", output.display());
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
