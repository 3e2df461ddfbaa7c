//! OpenAI-compatible `/chat/completions` client.
//!
//! Works against OpenAI itself and against local servers that mimic it
//! (Ollama, llama.cpp, vLLM).

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::LlmConfig;
use super::types::{ChatOptions, ChatResponse, LlmError, Message};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key.clone(), base_url: config.base_url.clone() })
    }

    /// # Errors
    ///
    /// Returns an [`LlmError`] for transport failures, non-200 statuses, or
    /// an unparseable body.
    pub async fn chat(&self, model: &str, options: &ChatOptions, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let body = build_request(model, options, messages);
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(url).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
pub(crate) struct CcRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<CcResponseFormat>,
}

#[derive(Serialize)]
struct CcResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

pub(crate) fn build_request<'a>(model: &'a str, options: &ChatOptions, messages: &'a [Message]) -> CcRequest<'a> {
    CcRequest {
        model,
        messages,
        temperature: options.temperature,
        response_format: options.json_output.then_some(CcResponseFormat { format_type: "json_object" }),
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let input_tokens = root
        .get("usage")
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output_tokens = root
        .get("usage")
        .and_then(|u| u.get("completion_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .unwrap_or("stop")
        .to_string();
    let content = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned);

    Ok(ChatResponse { content, model, finish_reason, input_tokens, output_tokens })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
