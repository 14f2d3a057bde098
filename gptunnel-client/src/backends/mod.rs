//! Chat backend implementations

mod gptunnel;
pub mod mock;

pub use gptunnel::{GptunnelClient, extract_completion_text, parse_models_response};
pub use mock::MockBackend;
