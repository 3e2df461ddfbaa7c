//! WebUI: client for an AUTOMATIC1111-compatible image-generation server.
//!
//! DESIGN
//! ======
//! Two endpoints are used: the ControlNet extension's model list and
//! `txt2img`, with ControlNet units passed through `alwayson_scripts`.
//! Generators depend on the [`ImageBackend`] trait so tests can run
//! without a server.

pub mod types;

use std::time::Duration;

use base64::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use types::{ControlMode, ControlNetUnit, ResizeMode, Txt2ImgRequest, Txt2ImgResult, WebUiError};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:7860";
pub const DEFAULT_WEBUI_REQUEST_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_WEBUI_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebUiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for WebUiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_WEBUI_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_WEBUI_CONNECT_TIMEOUT_SECS }
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// What the generators need from an image server. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ImageBackend: Send + Sync {
    /// Names of the installed ControlNet models.
    ///
    /// # Errors
    ///
    /// Returns a [`WebUiError`] if the request fails or the body is malformed.
    async fn controlnet_models(&self) -> Result<Vec<String>, WebUiError>;

    /// Run one txt2img generation.
    ///
    /// # Errors
    ///
    /// Returns a [`WebUiError`] if the request fails or the body is malformed.
    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResult, WebUiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct WebUiClient {
    http: reqwest::Client,
    base_url: String,
}

impl WebUiClient {
    /// # Errors
    ///
    /// Returns [`WebUiError::InvalidServerUrl`] for a URL without host or
    /// port, or [`WebUiError::HttpClientBuild`].
    pub fn new(server_url: &str, timeouts: WebUiTimeouts) -> Result<Self, WebUiError> {
        let base_url = normalize_server_url(server_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| WebUiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_body(response: reqwest::Response) -> Result<String, WebUiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WebUiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(WebUiError::Response { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl ImageBackend for WebUiClient {
    async fn controlnet_models(&self) -> Result<Vec<String>, WebUiError> {
        let url = format!("{}/controlnet/model_list", self.base_url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| WebUiError::Request(e.to_string()))?;
        let text = Self::read_body(response).await?;
        parse_model_list(&text)
    }

    async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Txt2ImgResult, WebUiError> {
        let url = format!("{}/sdapi/v1/txt2img", self.base_url);
        tracing::debug!(%url, width = request.width, height = request.height, units = request.controlnet_units.len(), "txt2img");
        let response = self
            .http
            .post(url)
            .json(&WireTxt2Img::from(request))
            .send()
            .await
            .map_err(|e| WebUiError::Request(e.to_string()))?;
        let text = Self::read_body(response).await?;
        parse_txt2img_response(&text)
    }
}

/// First model whose name contains `needle`.
///
/// # Errors
///
/// Returns [`WebUiError::ModelNotFound`] when none matches.
pub fn find_model(models: &[String], needle: &str, kind: &'static str) -> Result<String, WebUiError> {
    models
        .iter()
        .find(|name| name.contains(needle))
        .cloned()
        .ok_or_else(|| WebUiError::ModelNotFound { kind, needle: needle.to_string() })
}

/// Reduce a server URL to `scheme://host:port`.
pub(crate) fn normalize_server_url(raw: &str) -> Result<String, WebUiError> {
    let invalid = |reason: &str| WebUiError::InvalidServerUrl { url: raw.to_string(), reason: reason.to_string() };
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    let Some(host) = url.host_str() else {
        return Err(invalid("failed to get hostname"));
    };
    let Some(port) = url.port_or_known_default() else {
        return Err(invalid("failed to get port"));
    };
    Ok(format!("{}://{host}:{port}", url.scheme()))
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
pub(crate) struct WireTxt2Img<'a> {
    prompt: &'a str,
    negative_prompt: &'a str,
    seed: i64,
    cfg_scale: f64,
    steps: u32,
    width: u32,
    height: u32,
    sampler_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alwayson_scripts: Option<WireScripts<'a>>,
}

#[derive(Serialize)]
struct WireScripts<'a> {
    controlnet: WireControlNet<'a>,
}

#[derive(Serialize)]
struct WireControlNet<'a> {
    args: &'a [ControlNetUnit],
}

impl<'a> From<&'a Txt2ImgRequest> for WireTxt2Img<'a> {
    fn from(request: &'a Txt2ImgRequest) -> Self {
        let alwayson_scripts = (!request.controlnet_units.is_empty()).then(|| WireScripts {
            controlnet: WireControlNet { args: &request.controlnet_units },
        });
        Self {
            prompt: &request.prompt,
            negative_prompt: &request.negative_prompt,
            seed: request.seed,
            cfg_scale: request.cfg_scale,
            steps: request.steps,
            width: request.width,
            height: request.height,
            sampler_name: &request.sampler_name,
            alwayson_scripts,
        }
    }
}

#[derive(Deserialize)]
struct WireModelList {
    model_list: Vec<String>,
}

#[derive(Deserialize)]
struct WireTxt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    info: Value,
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_model_list(json_text: &str) -> Result<Vec<String>, WebUiError> {
    let list: WireModelList = serde_json::from_str(json_text).map_err(|e| WebUiError::Parse(e.to_string()))?;
    Ok(list.model_list)
}

pub(crate) fn parse_txt2img_response(json_text: &str) -> Result<Txt2ImgResult, WebUiError> {
    let wire: WireTxt2ImgResponse = serde_json::from_str(json_text).map_err(|e| WebUiError::Parse(e.to_string()))?;

    // The first image is the generation; ControlNet may append its detected maps.
    let Some(encoded) = wire.images.first() else {
        return Err(WebUiError::Parse("txt2img: missing images[0]".to_string()));
    };
    let payload = encoded.rsplit(',').next().unwrap_or(encoded);
    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| WebUiError::ImageDecode(e.to_string()))?;
    let image = image::load_from_memory(&bytes).map_err(|e| WebUiError::ImageDecode(e.to_string()))?;

    // `info` arrives as a JSON document encoded in a string.
    let info = match wire.info {
        Value::String(text) => serde_json::from_str(&text).map_err(|e| WebUiError::Parse(format!("txt2img info: {e}")))?,
        other => other,
    };

    Ok(Txt2ImgResult { image, info })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
