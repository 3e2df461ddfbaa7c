//! Generators: turn guide masks and prompts into txt2img requests.
//!
//! DESIGN
//! ======
//! Each generator builds its guide image locally with the `guide` crate,
//! resolves the ControlNet model it needs from the server's model list, and
//! issues a single txt2img call through an [`ImageBackend`]. Request
//! assembly is a pure function of the model list so it can be tested
//! without a server.

pub mod circular;
pub mod pizza;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

pub use circular::CircularGen;
pub use pizza::PizzaGen;

use crate::webui::{ImageBackend, Txt2ImgRequest, Txt2ImgResult, WebUiError};

/// Let the server pick a random seed.
pub const RANDOM_SEED: i64 = -1;
pub const DEFAULT_IMAGE_WIDTH: u32 = 720;
pub const DEFAULT_STEPS: u32 = 20;

/// Preprocessor name that passes a ready-made guide image straight through.
pub(crate) const MODULE_NONE: &str = "none";

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("guide mask: {0}")]
    Guide(#[from] guide::GuideError),
    #[error(transparent)]
    WebUi(#[from] WebUiError),
    #[error("guide image encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Text inputs shared by both generators. Empty overrides count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptOverrides {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
}

impl PromptOverrides {
    fn pick(value: Option<&String>, default: &str) -> String {
        match value {
            Some(text) if !text.is_empty() => text.clone(),
            _ => default.to_string(),
        }
    }

    #[must_use]
    pub fn prompt_or(&self, default: &str) -> String {
        Self::pick(self.prompt.as_ref(), default)
    }

    #[must_use]
    pub fn negative_prompt_or(&self, default: &str) -> String {
        Self::pick(self.negative_prompt.as_ref(), default)
    }
}

/// Fetch the model list, let `build` assemble the request, and run it.
async fn run(
    backend: &dyn ImageBackend,
    build: impl FnOnce(&[String]) -> Result<Txt2ImgRequest, GenerateError>,
) -> Result<Txt2ImgResult, GenerateError> {
    let models = backend.controlnet_models().await?;
    tracing::debug!(?models, "controlnet models");
    let request = build(&models)?;
    tracing::debug!(prompt = %request.prompt, negative_prompt = %request.negative_prompt, seed = request.seed, "generating");
    tracing::info!("processing...");
    let result = backend.txt2img(&request).await?;
    Ok(result)
}

/// PNG-encode a user-supplied guide image for a ControlNet unit.
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, GenerateError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
