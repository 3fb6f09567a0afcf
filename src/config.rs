// ABOUTME: Runtime configuration loaded from environment variables.
// ABOUTME: Holds the model credential, model identifier, and endpoint URL.

use crate::error::ConfigError;
use crate::llm::GROQ_BASE_URL;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Environment variable holding the model identifier.
pub const MODEL_VAR: &str = "GROQ_MODEL";

/// Environment variable overriding the chat-completions base URL.
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";

/// Settings needed to reach the language model.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Both the credential and the model identifier are required. Blank
    /// values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let model = get(MODEL_VAR).ok_or(ConfigError::Missing(MODEL_VAR))?;
        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| GROQ_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }
}
