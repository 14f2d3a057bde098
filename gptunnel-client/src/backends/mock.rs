//! Mock chat backend for testing
//!
//! Returns scripted replies and records every request so callers can assert
//! on the messages and parameters they produced.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::ChatBackend;
use crate::error::{GptunnelError, Result};
use crate::types::{ChatRequest, ModelInfo};

pub struct MockBackend {
    models: Vec<ModelInfo>,
    reply: String,
    /// Error to return instead of a reply (None = always succeed)
    fail_with: Option<GptunnelError>,
    call_count: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockBackend {
    /// Create a backend that always replies with `reply`
    pub fn always_succeeds(reply: &str) -> Self {
        Self {
            models: Vec::new(),
            reply: reply.to_string(),
            fail_with: None,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend that fails every call with `error`
    pub fn always_fails(error: GptunnelError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::always_succeeds("")
        }
    }

    /// Set the models returned by `list_models`
    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// Number of calls to either endpoint
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Chat requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn failure(&self) -> Option<GptunnelError> {
        self.fail_with.as_ref().map(clone_error)
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.failure() {
            Some(err) => Err(err),
            None => Ok(self.models.clone()),
        }
    }

    async fn chat_completion(&self, request: ChatRequest) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match self.failure() {
            Some(err) => Err(err),
            None => Ok(self.reply.trim().to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Clone a GptunnelError (needed because GptunnelError doesn't implement Clone)
fn clone_error(err: &GptunnelError) -> GptunnelError {
    match err {
        GptunnelError::MissingApiKey => GptunnelError::MissingApiKey,
        GptunnelError::InvalidRequest(s) => GptunnelError::InvalidRequest(s.clone()),
        GptunnelError::Api { status, body } => GptunnelError::Api {
            status: *status,
            body: body.clone(),
        },
        GptunnelError::MalformedResponse { message, body } => GptunnelError::MalformedResponse {
            message: message.clone(),
            body: body.clone(),
        },
        GptunnelError::Config(s) => GptunnelError::Config(s.clone()),
        // Transport and parse errors can't be cloned
        GptunnelError::Network(e) => GptunnelError::Config(format!("network error (mock): {}", e)),
        GptunnelError::Io(_) => GptunnelError::Config("IO error (mock)".to_string()),
        GptunnelError::TomlParse(_) => GptunnelError::Config("TOML parse error (mock)".to_string()),
        GptunnelError::TomlSerialize(_) => {
            GptunnelError::Config("TOML serialize error (mock)".to_string())
        }
    }
}
