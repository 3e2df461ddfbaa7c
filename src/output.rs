//! Output: content-addressed file names and overwrite-safe saving.
//!
//! Every generation is written as `<base>.<format>` plus `<base>.info.json`
//! in the output directory. Existing files are left alone unless forced.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const DEFAULT_IMAGE_FORMAT: &str = "webp";
pub const DEFAULT_CIRCULAR_TEMPLATE: &str = "circular_{INFO_HASH}";
pub const INFO_HASH_PLACEHOLDER: &str = "{INFO_HASH}";
const INFO_JSON_SUFFIX: &str = "info.json";

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("info JSON encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to save image {path}: {source}")]
    SaveImage { path: PathBuf, source: image::ImageError },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// What happened to a file we were asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// The file existed and overwriting was not forced.
    Skipped,
}

// =============================================================================
// NAMING
// =============================================================================

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        write!(s, "{b:02x}").unwrap_or_default();
    }
    s
}

/// Hex SHA-256 of `text`.
///
/// Earlier releases of the tool named files by SHA-1, so these names do not
/// match files those releases wrote: re-running over an old output directory
/// writes new files instead of skipping existing ones.
#[must_use]
pub fn info_hash(text: &str) -> String {
    bytes_to_hex(&Sha256::digest(text.as_bytes()))
}

/// Info as written to disk: pretty-printed, two-space indent.
///
/// # Errors
///
/// Returns [`OutputError::Encode`] if `info` cannot be serialized.
pub fn info_json(info: &Value) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(info)?)
}

/// Base name for a circular image: `template` with `{INFO_HASH}` replaced by
/// the hash of the first infotext, or of the whole info when there is none.
///
/// # Errors
///
/// Returns [`OutputError::Encode`] if the fallback serialization fails.
pub fn circular_base_filename(template: &str, info: &Value) -> Result<String, OutputError> {
    let infotext = info
        .get("infotexts")
        .and_then(Value::as_array)
        .and_then(|texts| texts.first())
        .and_then(Value::as_str);
    let hash = match infotext {
        Some(text) => info_hash(text),
        None => {
            tracing::warn!("info has no infotexts; hashing the whole info instead");
            info_hash(&info_json(info)?)
        }
    };
    Ok(template.replace(INFO_HASH_PLACEHOLDER, &hash))
}

/// Base name for a pizza image: `pizza_{total}p_{num}p_{hash of info JSON}`.
#[must_use]
pub fn pizza_base_filename(total_num_pieces: u32, num_pieces: u32, info_json: &str) -> String {
    format!("pizza_{total_num_pieces}p_{num_pieces}p_{}", info_hash(info_json))
}

// =============================================================================
// SAVING
// =============================================================================

/// Image format for a file extension such as `webp`, `png`, or `jpg`.
///
/// # Errors
///
/// Returns [`OutputError::UnsupportedFormat`] for anything else.
pub fn parse_image_format(extension: &str) -> Result<ImageFormat, OutputError> {
    match ImageFormat::from_extension(extension.trim_start_matches('.')) {
        Some(format @ (ImageFormat::WebP | ImageFormat::Png | ImageFormat::Jpeg)) => Ok(format),
        _ => Err(OutputError::UnsupportedFormat(extension.to_string())),
    }
}

/// Save `image` to `path` unless it exists and `force` is off. The format
/// follows the extension.
///
/// # Errors
///
/// Returns [`OutputError::UnsupportedFormat`] or [`OutputError::SaveImage`].
pub fn save_image_safely(image: &DynamicImage, path: &Path, force: bool) -> Result<SaveOutcome, OutputError> {
    if path.exists() && !force {
        tracing::warn!(path = %path.display(), "already exists; skipping");
        return Ok(SaveOutcome::Skipped);
    }

    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    let format = parse_image_format(extension)?;
    let saved = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format),
        ImageFormat::WebP => DynamicImage::ImageRgba8(image.to_rgba8()).save_with_format(path, format),
        _ => image.save_with_format(path, format),
    };
    saved.map_err(|source| OutputError::SaveImage { path: path.to_path_buf(), source })?;

    tracing::info!(path = %path.display(), "saved image");
    Ok(SaveOutcome::Written)
}

/// Write `info_json` to `path` unless it exists and `force` is off.
///
/// # Errors
///
/// Returns [`OutputError::Write`] if the file cannot be written.
pub fn write_info_json(path: &Path, info_json: &str, force: bool) -> Result<SaveOutcome, OutputError> {
    if path.exists() && !force {
        tracing::warn!(path = %path.display(), "already exists; skipping");
        return Ok(SaveOutcome::Skipped);
    }
    std::fs::write(path, info_json).map_err(|source| OutputError::Write { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), "saved info.json");
    Ok(SaveOutcome::Written)
}

/// Where and how a generation's files are written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    /// Image file extension, e.g. `webp`.
    pub image_format: String,
    pub force_overwrite: bool,
}

impl OutputOptions {
    #[must_use]
    pub fn image_path(&self, base: &str) -> PathBuf {
        self.dir.join(format!("{base}.{}", self.image_format))
    }

    #[must_use]
    pub fn info_path(&self, base: &str) -> PathBuf {
        self.dir.join(format!("{base}.{INFO_JSON_SUFFIX}"))
    }

    /// Save the image and its info under `base`.
    ///
    /// # Errors
    ///
    /// Returns the first save or write failure.
    pub fn save(&self, base: &str, image: &DynamicImage, info_json: &str) -> Result<(SaveOutcome, SaveOutcome), OutputError> {
        let image_outcome = save_image_safely(image, &self.image_path(base), self.force_overwrite)?;
        let info_outcome = write_info_json(&self.info_path(base), info_json, self.force_overwrite)?;
        Ok((image_outcome, info_outcome))
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
