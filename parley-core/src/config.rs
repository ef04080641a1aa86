//! Endpoint configuration.

/// Default chat-completions endpoint: a local OpenAI-compatible server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/completions";

/// Default model identifier sent when none is configured.
pub const DEFAULT_MODEL: &str = "default";

/// Environment variable overriding [`ChatConfig::endpoint`].
pub const ENDPOINT_VAR: &str = "PARLEY_ENDPOINT";
/// Environment variable overriding [`ChatConfig::api_key`].
pub const API_KEY_VAR: &str = "PARLEY_API_KEY";
/// Environment variable overriding [`ChatConfig::model`].
pub const MODEL_VAR: &str = "PARLEY_MODEL";

/// Settings for reaching a chat-completions endpoint.
///
/// Read-only once handed to a client. An empty `api_key` means no
/// `Authorization` header is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token; empty disables authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
        }
    }
}

impl ChatConfig {
    /// Load from `PARLEY_ENDPOINT`, `PARLEY_API_KEY` and `PARLEY_MODEL`.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            endpoint: get(ENDPOINT_VAR).unwrap_or(defaults.endpoint),
            api_key: get(API_KEY_VAR).unwrap_or(defaults.api_key),
            model: get(MODEL_VAR).unwrap_or(defaults.model),
        }
    }

    /// Override the endpoint URL.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.api_key.is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("ChatConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &key)
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            (ENDPOINT_VAR, "http://gpu-box:9000/v1/chat/completions"),
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "qwen2.5-coder"),
        ]
        .into();
        let config = ChatConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.endpoint, "http://gpu-box:9000/v1/chat/completions");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "qwen2.5-coder");
    }

    #[test]
    fn empty_variables_fall_back() {
        let config = ChatConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn builder_overrides() {
        let config = ChatConfig::default()
            .endpoint("http://localhost:1234/v1/chat/completions")
            .api_key("k")
            .model("m");
        assert_eq!(config.endpoint, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, "m");
    }

    #[test]
    fn debug_redacts_key() {
        let config = ChatConfig::default().api_key("sk-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
