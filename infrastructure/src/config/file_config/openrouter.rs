//! OpenRouter configuration from TOML (`[openrouter]` section)

use serde::{Deserialize, Serialize};

/// OpenRouter chat-completions settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// Environment variable name for the API key (default: "OPENROUTER_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model used when a roster entry does not name one.
    pub model: String,
    /// Max tokens per answer.
    pub max_tokens: u32,
    pub temperature: f32,
    /// Attempts per answer before the participant gives up.
    pub max_retries: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 100,
            temperature: 0.1,
            max_retries: 3,
            timeout_seconds: 60,
        }
    }
}

impl FileOpenRouterConfig {
    /// Resolve the API key: explicit value first, then the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }
}
