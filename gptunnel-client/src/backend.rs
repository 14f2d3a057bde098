use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ModelInfo};

/// Trait for chat completion backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// List the models available to this account
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Execute a chat completion and return the reply text, trimmed
    async fn chat_completion(&self, request: ChatRequest) -> Result<String>;

    /// Get the backend name for display
    fn name(&self) -> &'static str;
}
