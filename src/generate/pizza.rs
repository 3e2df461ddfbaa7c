//! Pizza generator: a segmentation guide of the remaining slices, plus an
//! optional depth guide taken from a user photo.
//!
//! The prompt is weighted by emptiness: the fewer slices remain, the
//! stronger the `(empty plate:w)` clause, and past half the plate a
//! `(half eaten)` clause is added.

use std::path::PathBuf;

use guide::{MaskBuilder, PieceCount, PromptWeights, RngJitter};
use image::DynamicImage;

use super::{encode_png, GenerateError, MODULE_NONE, PromptOverrides, DEFAULT_STEPS};
use crate::webui::{find_model, ControlMode, ControlNetUnit, ImageBackend, ResizeMode, Txt2ImgRequest, Txt2ImgResult};

pub const SEG_MODEL_NEEDLE: &str = "sd15_seg";
pub const DEPTH_MODEL_NEEDLE: &str = "sd15_depth";
pub const DEPTH_MODULE: &str = "depth_midas";

/// Segmentation weight when it is the only guide.
pub const SEG_WEIGHT_ALONE: f64 = 3.0;
/// Segmentation weight when a depth guide shares the work.
pub const SEG_WEIGHT_WITH_DEPTH: f64 = 1.1;
pub const DEPTH_WEIGHT: f64 = 0.8;
pub const DEPTH_GUIDANCE_END: f64 = 0.7;

pub const PIZZA_CFG_SCALE: f64 = 2.5;
pub const PIZZA_SAMPLER: &str = "DPM++ 3M SDE";
pub const DEFAULT_NUM_PIECES: u32 = 1;
pub const DEFAULT_TOTAL_NUM_PIECES: u32 = 12;

pub const PIZZA_NEGATIVE_PROMPT: &str = concat!(
    "(worst quality, low quality:1.4),",
    "(low quality, worst quality:1.4),(bad_prompt:0.8),",
    "logo, text, watermark, overcooked, (burnt:1.4), unappealing, disgusting,",
    "poorly-lit and has dull colors, unappetizing, blurry, fruit,",
);

/// Positive prompt for a plate with the given weights.
#[must_use]
pub fn pizza_prompt(weights: PromptWeights) -> String {
    let half_eaten = if weights.half_eaten() { "(half eaten:0.5)," } else { "" };
    format!(
        "pieces of mouthwatering pizza on the plate,{half_eaten}(empty plate:{}),\
         an incredibly realistic and visually enticing image,\
         photograph with vibrant colors and textures,",
        weights.empty_plate_weight_label(),
    )
}

#[derive(Debug, Clone)]
pub struct PizzaGen {
    pub width: u32,
    pub num_pieces: u32,
    pub total_num_pieces: u32,
    /// Overrides the segmentation weight chosen from the depth guide.
    pub seg_weight: Option<f64>,
    /// Where to dump the guide mask, if anywhere.
    pub debug_dir: Option<PathBuf>,
    /// Seed for wedge jitter; entropy when absent.
    pub mask_seed: Option<u64>,
}

impl PizzaGen {
    #[must_use]
    pub fn new(width: u32, num_pieces: u32, total_num_pieces: u32) -> Self {
        Self { width, num_pieces, total_num_pieces, seg_weight: None, debug_dir: None, mask_seed: None }
    }

    #[must_use]
    pub fn seg_weight(&self, with_depth: bool) -> f64 {
        let default = if with_depth { SEG_WEIGHT_WITH_DEPTH } else { SEG_WEIGHT_ALONE };
        self.seg_weight.unwrap_or(default)
    }

    /// Emptiness-derived prompt weights for this plate.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Guide`] for invalid piece counts.
    pub fn prompt_weights(&self) -> Result<PromptWeights, GenerateError> {
        let count = PieceCount::new(self.num_pieces, self.total_num_pieces)?;
        Ok(PromptWeights::from_count(count))
    }

    /// Segmentation mask as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Guide`] for invalid dimensions or counts.
    pub fn segmentation_png(&self) -> Result<Vec<u8>, GenerateError> {
        let jitter = match self.mask_seed {
            Some(seed) => RngJitter::seeded(seed),
            None => RngJitter::from_entropy(),
        };
        let mask = MaskBuilder::new()
            .with_jitter(jitter)
            .with_debug_dir(self.debug_dir.clone())
            .build_pizza_segmentation_mask(self.width, self.num_pieces, self.total_num_pieces)?;
        Ok(mask.canvas.to_png_bytes()?)
    }

    /// Assemble the txt2img request against the installed `models`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required model is missing, the counts are
    /// invalid, or a guide image cannot be encoded.
    pub fn build_request(
        &self,
        models: &[String],
        depth_guide: Option<&DynamicImage>,
        overrides: &PromptOverrides,
        seed: i64,
    ) -> Result<Txt2ImgRequest, GenerateError> {
        let weights = self.prompt_weights()?;
        tracing::debug!(empty_plate_weight = %weights.empty_plate_weight_label(), "prompt weights");

        let seg_model = find_model(models, SEG_MODEL_NEEDLE, "segmentation")?;
        let seg_weight = self.seg_weight(depth_guide.is_some());
        tracing::debug!(%seg_model, seg_weight, "segmentation unit");
        let mut units = vec![
            ControlNetUnit::new(&self.segmentation_png()?, MODULE_NONE, seg_model)
                .with_weight(seg_weight)
                .with_control_mode(ControlMode::ControlNetMoreImportant)
                .with_resize_mode(ResizeMode::CropAndResize),
        ];

        if let Some(depth) = depth_guide {
            let depth_model = find_model(models, DEPTH_MODEL_NEEDLE, "depth")?;
            tracing::debug!(%depth_model, "depth unit");
            units.push(
                ControlNetUnit::new(&encode_png(depth)?, DEPTH_MODULE, depth_model)
                    .with_weight(DEPTH_WEIGHT)
                    .with_guidance_end(DEPTH_GUIDANCE_END)
                    .with_control_mode(ControlMode::ControlNetMoreImportant)
                    .with_resize_mode(ResizeMode::CropAndResize),
            );
        }

        Ok(Txt2ImgRequest {
            prompt: overrides.prompt_or(&pizza_prompt(weights)),
            negative_prompt: overrides.negative_prompt_or(PIZZA_NEGATIVE_PROMPT),
            seed,
            cfg_scale: PIZZA_CFG_SCALE,
            steps: DEFAULT_STEPS,
            width: self.width,
            height: self.width,
            sampler_name: PIZZA_SAMPLER.to_string(),
            controlnet_units: units,
        })
    }

    /// Generate one pizza image.
    ///
    /// # Errors
    ///
    /// Returns an error if the model lookup, mask build, or server call fails.
    pub async fn generate(
        &self,
        backend: &dyn ImageBackend,
        depth_guide: Option<&DynamicImage>,
        overrides: &PromptOverrides,
        seed: i64,
    ) -> Result<Txt2ImgResult, GenerateError> {
        super::run(backend, |models| self.build_request(models, depth_guide, overrides, seed)).await
    }
}

#[cfg(test)]
#[path = "pizza_test.rs"]
mod tests;
