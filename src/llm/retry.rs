//! Exponential backoff for retryable LLM failures.

use std::time::Duration;

use rand::Rng;

use super::types::{ChatOptions, ChatResponse, LlmChat, LlmError, Message};

pub const DEFAULT_MAX_RETRIES: u32 = 100;
const DEFAULT_BASE_DELAY_MS: u64 = 500;
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Upper bound of the sleep before retry number `attempt` (0-based):
    /// `base * 2^attempt`, capped at `max_delay`.
    #[must_use]
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Full-jitter delay: uniform in `[ceiling / 2, ceiling]`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling(attempt);
        let half = ceiling / 2;
        let spread = u64::try_from((ceiling - half).as_millis()).unwrap_or(u64::MAX);
        half + Duration::from_millis(rand::rng().random_range(0..=spread))
    }
}

/// Call `llm.chat`, retrying retryable errors per `policy`.
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error once retries run out.
pub async fn chat_with_retry(
    llm: &dyn LlmChat,
    policy: &RetryPolicy,
    options: &ChatOptions,
    messages: &[Message],
) -> Result<ChatResponse, LlmError> {
    let mut attempt = 0;
    loop {
        match llm.chat(options, messages).await {
            Ok(response) => return Ok(response),
            Err(e) if e.retryable() && attempt < policy.max_retries => {
                let delay = policy.delay(attempt);
                tracing::warn!(error = %e, attempt = attempt + 1, ?delay, "LLM call failed; retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
