//! Circular generator: a canny edge guide holding the subject to a circle.

use std::path::PathBuf;

use guide::MaskBuilder;

use super::{GenerateError, MODULE_NONE, PromptOverrides, DEFAULT_STEPS};
use crate::webui::{find_model, ControlMode, ControlNetUnit, ImageBackend, ResizeMode, Txt2ImgRequest, Txt2ImgResult};

pub const CANNY_MODEL_NEEDLE: &str = "sd15_canny";
pub const DEFAULT_CANNY_WEIGHT: f64 = 0.60;
pub const CANNY_GUIDANCE_END: f64 = 0.65;
pub const CIRCULAR_CFG_SCALE: f64 = 10.0;
pub const CIRCULAR_SAMPLER: &str = "Euler a";
pub const DEFAULT_CIRCULAR_PROMPT: &str = "A photo of a coffee cup";

pub const CIRCULAR_NEGATIVE_PROMPT: &str = concat!(
    "(worst quality, low quality:1.4),",
    "(low quality, worst quality:1.4),(bad_prompt:0.8),",
    "logo, text, watermark, unappealing, disgusting,",
    "illustration, human, human_face,",
);

#[derive(Debug, Clone)]
pub struct CircularGen {
    pub width: u32,
    /// Overrides [`DEFAULT_CANNY_WEIGHT`].
    pub canny_weight: Option<f64>,
    /// Where to dump the guide mask, if anywhere.
    pub debug_dir: Option<PathBuf>,
}

impl CircularGen {
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self { width, canny_weight: None, debug_dir: None }
    }

    #[must_use]
    pub fn canny_weight(&self) -> f64 {
        self.canny_weight.unwrap_or(DEFAULT_CANNY_WEIGHT)
    }

    /// Assemble the txt2img request against the installed `models`.
    ///
    /// # Errors
    ///
    /// Returns an error if no canny model is installed or the mask cannot be built.
    pub fn build_request(
        &self,
        models: &[String],
        prompt: &str,
        overrides: &PromptOverrides,
        seed: i64,
    ) -> Result<Txt2ImgRequest, GenerateError> {
        let model = find_model(models, CANNY_MODEL_NEEDLE, "canny")?;
        tracing::debug!(%model, canny_weight = self.canny_weight(), "canny unit");

        let mask = MaskBuilder::new()
            .with_debug_dir(self.debug_dir.clone())
            .build_circle_mask(self.width)?;
        let unit = ControlNetUnit::new(&mask.to_png_bytes()?, MODULE_NONE, model)
            .with_weight(self.canny_weight())
            .with_guidance_end(CANNY_GUIDANCE_END)
            .with_control_mode(ControlMode::ControlNetMoreImportant)
            .with_resize_mode(ResizeMode::CropAndResize);

        Ok(Txt2ImgRequest {
            prompt: prompt.to_string(),
            negative_prompt: overrides.negative_prompt_or(CIRCULAR_NEGATIVE_PROMPT),
            seed,
            cfg_scale: CIRCULAR_CFG_SCALE,
            steps: DEFAULT_STEPS,
            width: self.width,
            height: self.width,
            sampler_name: CIRCULAR_SAMPLER.to_string(),
            controlnet_units: vec![unit],
        })
    }

    /// Generate one circular image.
    ///
    /// # Errors
    ///
    /// Returns an error if the model lookup, mask build, or server call fails.
    pub async fn generate(
        &self,
        backend: &dyn ImageBackend,
        prompt: &str,
        overrides: &PromptOverrides,
        seed: i64,
    ) -> Result<Txt2ImgResult, GenerateError> {
        super::run(backend, |models| self.build_request(models, prompt, overrides, seed)).await
    }
}

#[cfg(test)]
#[path = "circular_test.rs"]
mod tests;
