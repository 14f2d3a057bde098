//! HTTP client for the GPTunnel API
//!
//! Authentication is the raw key in the `Authorization` header, without a
//! `Bearer` prefix.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::backend::ChatBackend;
use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{GptunnelError, Result};
use crate::types::{ChatRequest, ModelInfo};

pub struct GptunnelClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GptunnelClient {
    /// Create a client for the public endpoint with the default timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client with a custom base URL and timeout
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GptunnelError::MissingApiKey);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client from configuration, resolving the key from config or
    /// the environment
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_options(
            config.api_key()?,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn request(&self, method: Method, endpoint: &str, payload: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method, &url)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json");
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GptunnelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Map::new()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GptunnelError::MalformedResponse {
            message: format!("invalid JSON from {}: {}", url, e),
            body,
        })
    }
}

#[async_trait]
impl ChatBackend for GptunnelClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self.request(Method::GET, "/models", None).await?;
        parse_models_response(&response)
    }

    async fn chat_completion(&self, request: ChatRequest) -> Result<String> {
        if request.model.trim().is_empty() {
            return Err(GptunnelError::InvalidRequest(
                "model id must not be empty".to_string(),
            ));
        }

        let payload = request.to_payload();
        let response = self
            .request(Method::POST, "/chat/completions", Some(&payload))
            .await?;
        extract_completion_text(&response)
    }

    fn name(&self) -> &'static str {
        "GPTunnel"
    }
}

/// Map a `/models` response to model entries.
///
/// Entries without an `id` are dropped and `title` falls back to the id.
pub fn parse_models_response(response: &Value) -> Result<Vec<ModelInfo>> {
    let data = response
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| GptunnelError::MalformedResponse {
            message: "expected a `data` array from /models".to_string(),
            body: response.to_string(),
        })?;

    Ok(data
        .iter()
        .filter_map(|model| {
            let id = model.get("id").and_then(Value::as_str)?;
            if id.is_empty() {
                return None;
            }
            let title = model.get("title").and_then(Value::as_str).unwrap_or(id);
            Some(ModelInfo {
                id: id.to_string(),
                title: title.to_string(),
            })
        })
        .collect())
}

/// Reply text from a `/chat/completions` response.
///
/// Reads `choices[0].message.content` (null content is an empty reply), then
/// `choices[0].text`.
pub fn extract_completion_text(response: &Value) -> Result<String> {
    let malformed = |message: &str| GptunnelError::MalformedResponse {
        message: message.to_string(),
        body: response.to_string(),
    };

    let choice = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| malformed("missing or empty `choices`"))?;

    if let Some(content) = choice.get("message").and_then(|m| m.get("content")) {
        match content {
            Value::Null => return Ok(String::new()),
            Value::String(text) => return Ok(text.trim().to_string()),
            _ => {}
        }
    }

    choice
        .get("text")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| malformed("no `message.content` or `text` in the first choice"))
}
