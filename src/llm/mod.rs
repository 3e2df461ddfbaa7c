//! LLM: OpenAI-compatible chat adapter for prompt generation.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables with command-line
//! overrides. Every server speaks the `/chat/completions` dialect, which
//! covers OpenAI itself and local runners such as Ollama. Callers depend on
//! the [`LlmChat`] trait so tests can substitute a mock.

pub mod config;
pub mod openai;
pub mod retry;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatOptions, ChatResponse, LlmError, Message};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client bound to one model.
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(&config)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"gemma2:9b"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, options: &ChatOptions, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.inner.chat(&self.model, options, messages).await
    }
}
