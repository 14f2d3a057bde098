//! Request and response types for the chat API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys of the request body owned by the client; generation parameters
/// cannot override them.
pub const RESERVED_KEYS: [&str; 3] = ["model", "messages", "useWalletBalance"];

/// An available model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Free-form generation parameters (`temperature`, `max_tokens`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams(Map<String, Value>);

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(self, value: f64) -> Self {
        self.with("temperature", value)
    }

    pub fn max_tokens(self, value: u32) -> Self {
        self.with("max_tokens", value)
    }

    /// Set an arbitrary parameter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merged(mut self, other: &GenerationParams) -> Self {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// One chat completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub use_wallet_balance: bool,
    pub params: GenerationParams,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            use_wallet_balance: false,
            params: GenerationParams::new(),
        }
    }

    pub fn use_wallet_balance(mut self, value: bool) -> Self {
        self.use_wallet_balance = value;
        self
    }

    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// JSON body for `POST /chat/completions`.
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        body.insert("model".to_string(), Value::String(self.model.clone()));
        body.insert(
            "messages".to_string(),
            serde_json::to_value(&self.messages).unwrap_or(Value::Array(Vec::new())),
        );
        body.insert(
            "useWalletBalance".to_string(),
            Value::Bool(self.use_wallet_balance),
        );

        for (key, value) in self.params.iter() {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                body.insert(key.clone(), value.clone());
            }
        }

        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_layout() {
        let request = ChatRequest::new(
            "deepseek-r1",
            vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        )
        .use_wallet_balance(true)
        .params(GenerationParams::new().temperature(0.5).max_tokens(150));

        assert_eq!(
            request.to_payload(),
            json!({
                "model": "deepseek-r1",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "useWalletBalance": true,
                "temperature": 0.5,
                "max_tokens": 150
            })
        );
    }

    #[test]
    fn test_params_cannot_override_reserved_keys() {
        let request = ChatRequest::new("real-model", vec![ChatMessage::user("hi")]).params(
            GenerationParams::new()
                .with("model", "other")
                .with("messages", json!([]))
                .with("useWalletBalance", true)
                .with("top_p", 0.9),
        );

        let payload = request.to_payload();
        assert_eq!(payload["model"], "real-model");
        assert_eq!(payload["messages"].as_array().unwrap().len(), 1);
        assert_eq!(payload["useWalletBalance"], false);
        assert_eq!(payload["top_p"], 0.9);
    }

    #[test]
    fn test_merged_params_override() {
        let defaults = GenerationParams::new().temperature(0.75).max_tokens(1000);
        let merged = defaults.merged(&GenerationParams::new().max_tokens(1200));
        assert_eq!(merged.get("temperature"), Some(&json!(0.75)));
        assert_eq!(merged.get("max_tokens"), Some(&json!(1200)));
    }
}
