use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GptunnelError, Result};

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "GPTUNNEL_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://gptunnel.ru/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;
pub const DEFAULT_MODEL: &str = "deepseek-r1";

/// Client configuration, stored at ~/.config/dream-team/gptunnel.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Model used when none is given on the command line
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Bill requests to the personal wallet balance
    #[serde(default)]
    pub use_wallet_balance: bool,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    0.75
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_model: default_model(),
            use_wallet_balance: false,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| GptunnelError::Config("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/dream-team/gptunnel.toml"))
    }

    /// API key from config, falling back to `GPTUNNEL_API_KEY`.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_or(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_or(&self, env_value: Option<String>) -> Result<String> {
        self.api_key
            .iter()
            .chain(env_value.iter())
            .map(|key| key.trim())
            .find(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or(GptunnelError::MissingApiKey)
    }
}
