//! Errors produced while building guide masks.

use std::path::PathBuf;

/// Errors produced by mask construction and weight computation.
#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    /// The canvas width was zero.
    #[error("invalid geometry: width must be positive")]
    ZeroWidth,

    /// The canvas width exceeds the supported maximum.
    #[error("invalid geometry: width {width} exceeds the maximum of {max}")]
    WidthTooLarge { width: u32, max: u32 },

    /// The total number of pieces was zero.
    #[error("invalid geometry: total_num_pieces must be positive")]
    ZeroTotalPieces,

    /// The pizza was cut into more pieces than supported.
    #[error("invalid geometry: total_num_pieces ({total_num_pieces}) exceeds the maximum of {max}")]
    TotalPiecesTooLarge { total_num_pieces: u32, max: u32 },

    /// More pieces were requested than the pizza has.
    #[error("invalid geometry: num_pieces ({num_pieces}) exceeds total_num_pieces ({total_num_pieces})")]
    TooManyPieces { num_pieces: u32, total_num_pieces: u32 },

    /// The canvas could not be encoded.
    #[error("image encode failed: {0}")]
    Encode(#[from] image::ImageError),

    /// A mask PNG could not be written.
    #[error("failed to write mask image {}: {source}", path.display())]
    Write { path: PathBuf, source: image::ImageError },
}
