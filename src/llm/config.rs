//! LLM configuration parsed from environment variables.

use super::types::LlmError;

/// Ollama's OpenAI-compatible endpoint.
pub const DEFAULT_LLM_BASE_URL: &str = "http://127.0.0.1:11434/v1";
pub const DEFAULT_LLM_MODEL: &str = "gemma2:9b";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Bearer token; local servers such as Ollama need none.
    pub api_key: Option<String>,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// All optional:
    /// - `LLM_BASE_URL`: OpenAI-compatible base URL (default: local Ollama)
    /// - `LLM_MODEL`: default `gemma2:9b`
    /// - `LLM_API_KEY_ENV`: names the env var containing the key; when set,
    ///   that variable must exist
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when `LLM_API_KEY_ENV` points at an
    /// unset variable, or [`LlmError::ConfigParse`] for a malformed timeout.
    pub fn from_env() -> Result<Self, LlmError> {
        let base_url = normalize_base_url(&std::env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()));
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());

        let api_key = match std::env::var("LLM_API_KEY_ENV") {
            Ok(key_var) => Some(std::env::var(&key_var).map_err(|_| LlmError::MissingApiKey { var: key_var.clone() })?),
            Err(_) => None,
        };

        let timeouts = LlmTimeouts {
            request_secs: env_parse_u64("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { base_url, model, api_key, timeouts })
    }

    /// Apply command-line overrides on top of the environment.
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<&str>, model: Option<&str>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = normalize_base_url(base_url);
        }
        if let Some(model) = model {
            self.model = model.to_string();
        }
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn env_parse_u64(key: &str, default: u64) -> Result<u64, LlmError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| LlmError::ConfigParse(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
