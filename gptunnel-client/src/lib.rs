//! Client library for the GPTunnel chat completion API
//!
//! Provides:
//! - [`GptunnelClient`]: HTTP client for `GET /models` and `POST /chat/completions`
//! - [`ChatBackend`]: the seam callers program against
//! - [`MockBackend`]: scripted backend for tests

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod types;

pub use backend::ChatBackend;
pub use backends::{GptunnelClient, MockBackend};
pub use config::ClientConfig;
pub use error::{GptunnelError, Result};
pub use types::{ChatMessage, ChatRequest, GenerationParams, ModelInfo, Role};
