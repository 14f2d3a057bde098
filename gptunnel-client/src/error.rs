use thiserror::Error;

#[derive(Error, Debug)]
pub enum GptunnelError {
    #[error("GPTunnel API key not found. Set GPTUNNEL_API_KEY environment variable or add to config.")]
    MissingApiKey,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("API error (HTTP {status}){}", format_body(body))]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response format: {message}{}", format_body(body))]
    MalformedResponse { message: String, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl GptunnelError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Response body suffix for error messages, pretty-printed when it is JSON.
fn format_body(body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => format!(
            "\nResponse body:\n{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string())
        ),
        Err(_) => format!("\nResponse body (raw):\n{}", body),
    }
}

pub type Result<T> = std::result::Result<T, GptunnelError>;
