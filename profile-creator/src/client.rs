//! Chat backend wrapper for profile-creator
//!
//! Resolves the model, wallet flag and generation defaults from the
//! configuration and hands requests to a [`ChatBackend`].

use anyhow::{Context, Result};
use gptunnel_client::{ChatBackend, ClientConfig, GenerationParams, GptunnelClient, ModelInfo};
use log::debug;

use crate::profile::{self, AgentDetails, ProfileOptions};

pub struct ProfileClient {
    backend: Box<dyn ChatBackend>,
    model: String,
    use_wallet_balance: bool,
    params: GenerationParams,
}

impl ProfileClient {
    /// Create a client from configuration; `model` and `use_wallet` override it.
    pub fn new(config: &ClientConfig, model: Option<&str>, use_wallet: bool) -> Result<Self> {
        let backend = GptunnelClient::from_config(config)
            .context("Failed to initialize GPTunnel client")?;
        let model = model.unwrap_or(&config.default_model);

        debug!(
            "Using backend: {} (model: {}, base URL: {})",
            backend.name(),
            model,
            config.base_url
        );

        Ok(Self::with_backend(
            Box::new(backend),
            model,
            use_wallet || config.use_wallet_balance,
        )
        .params(
            GenerationParams::new()
                .temperature(config.temperature)
                .max_tokens(config.max_tokens),
        ))
    }

    /// Wrap an existing backend.
    pub fn with_backend(backend: Box<dyn ChatBackend>, model: &str, use_wallet_balance: bool) -> Self {
        Self {
            backend,
            model: model.to_string(),
            use_wallet_balance,
            params: GenerationParams::new(),
        }
    }

    /// Generation parameters applied before per-call overrides.
    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn models(&self) -> Result<Vec<ModelInfo>> {
        self.backend
            .list_models()
            .await
            .context("Failed to fetch model list")
    }

    /// Generate a profile; `options.params` win over the client's params.
    pub async fn generate(&self, details: &AgentDetails, options: &ProfileOptions) -> Result<String> {
        let options = ProfileOptions {
            params: self.params.clone().merged(&options.params),
            ..options.clone()
        };
        profile::generate_profile(
            self.backend.as_ref(),
            &self.model,
            details,
            self.use_wallet_balance,
            &options,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptunnel_client::{GptunnelError, MockBackend};
    use serde_json::json;
    use std::sync::Arc;

    /// Lets a test keep a handle on the mock after boxing it.
    struct Shared(Arc<MockBackend>);

    #[async_trait::async_trait]
    impl ChatBackend for Shared {
        async fn list_models(&self) -> gptunnel_client::Result<Vec<ModelInfo>> {
            self.0.list_models().await
        }

        async fn chat_completion(
            &self,
            request: gptunnel_client::ChatRequest,
        ) -> gptunnel_client::Result<String> {
            self.0.chat_completion(request).await
        }

        fn name(&self) -> &'static str {
            self.0.name()
        }
    }

    #[tokio::test]
    async fn test_client_params_then_call_overrides() {
        let mock = Arc::new(MockBackend::always_succeeds("profile"));
        let client = ProfileClient::with_backend(Box::new(Shared(mock.clone())), "deepseek-r1", true)
            .params(GenerationParams::new().temperature(0.9).max_tokens(500));

        let options = ProfileOptions {
            params: GenerationParams::new().max_tokens(700),
            ..Default::default()
        };
        let reply = client.generate(&AgentDetails::default(), &options).await.unwrap();
        assert_eq!(reply, "profile");

        let payload = mock.requests()[0].to_payload();
        assert_eq!(payload["temperature"], json!(0.9));
        assert_eq!(payload["max_tokens"], json!(700));
        assert_eq!(payload["useWalletBalance"], true);
    }

    #[tokio::test]
    async fn test_models_error_has_context() {
        let client = ProfileClient::with_backend(
            Box::new(MockBackend::always_fails(GptunnelError::Api {
                status: 401,
                body: "unauthorized".to_string(),
            })),
            "m",
            false,
        );
        let err = client.models().await.unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to fetch model list"));
    }

    #[test]
    fn test_new_without_key_fails() {
        let config = ClientConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        // Falls back to the environment; only meaningful when it is unset
        if std::env::var("GPTUNNEL_API_KEY").is_err() {
            assert!(ProfileClient::new(&config, None, false).is_err());
        }
    }
}
