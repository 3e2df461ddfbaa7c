//! WebUI types: txt2img requests, ControlNet units, results, and errors.

use base64::prelude::*;
use image::DynamicImage;
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while talking to the image-generation server.
#[derive(Debug, thiserror::Error)]
pub enum WebUiError {
    /// The server URL is malformed or lacks a host or port.
    #[error("invalid server URL {url}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The server returned a non-success HTTP status.
    #[error("server returned status {status}: {body}")]
    Response { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A returned image could not be decoded.
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// No installed ControlNet model matches.
    #[error("failed to find a proper {kind} model, which contains '{needle}' in its name")]
    ModelNotFound { kind: &'static str, needle: String },
}

// =============================================================================
// CONTROLNET
// =============================================================================

/// How strongly the ControlNet guide competes with the text prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlMode {
    #[serde(rename = "Balanced")]
    Balanced,
    #[serde(rename = "My prompt is more important")]
    PromptMoreImportant,
    #[serde(rename = "ControlNet is more important")]
    ControlNetMoreImportant,
}

/// How the guide image is fitted to the output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResizeMode {
    #[serde(rename = "Just Resize")]
    JustResize,
    #[serde(rename = "Crop and Resize")]
    CropAndResize,
    #[serde(rename = "Resize and Fill")]
    ResizeAndFill,
}

/// One ControlNet conditioning unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlNetUnit {
    /// Base64-encoded PNG guide image.
    pub image: String,
    /// Preprocessor; `"none"` feeds the guide as-is.
    pub module: String,
    pub model: String,
    pub weight: f64,
    pub guidance_start: f64,
    pub guidance_end: f64,
    pub control_mode: ControlMode,
    pub resize_mode: ResizeMode,
}

impl ControlNetUnit {
    /// Unit with full-strength guidance over the whole sampling run.
    #[must_use]
    pub fn new(png: &[u8], module: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            image: BASE64_STANDARD.encode(png),
            module: module.into(),
            model: model.into(),
            weight: 1.0,
            guidance_start: 0.0,
            guidance_end: 1.0,
            control_mode: ControlMode::Balanced,
            resize_mode: ResizeMode::CropAndResize,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Stop applying the guide after this fraction of the sampling steps.
    #[must_use]
    pub fn with_guidance_end(mut self, guidance_end: f64) -> Self {
        self.guidance_end = guidance_end;
        self
    }

    #[must_use]
    pub fn with_control_mode(mut self, control_mode: ControlMode) -> Self {
        self.control_mode = control_mode;
        self
    }

    #[must_use]
    pub fn with_resize_mode(mut self, resize_mode: ResizeMode) -> Self {
        self.resize_mode = resize_mode;
        self
    }
}

// =============================================================================
// TXT2IMG
// =============================================================================

/// Parameters for one text-to-image generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Txt2ImgRequest {
    pub prompt: String,
    pub negative_prompt: String,
    /// `-1` lets the server pick a random seed.
    pub seed: i64,
    pub cfg_scale: f64,
    pub steps: u32,
    pub width: u32,
    pub height: u32,
    pub sampler_name: String,
    pub controlnet_units: Vec<ControlNetUnit>,
}

/// Decoded txt2img output.
#[derive(Debug, Clone)]
pub struct Txt2ImgResult {
    pub image: DynamicImage,
    /// Generation metadata as reported by the server.
    pub info: Value,
}

impl Txt2ImgResult {
    /// The first infotext line (`info.infotexts[0]`), if present.
    #[must_use]
    pub fn infotext(&self) -> Option<&str> {
        self.info
            .get("infotexts")
            .and_then(Value::as_array)
            .and_then(|texts| texts.first())
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
