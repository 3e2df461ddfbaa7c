//! Guide-mask synthesis for ControlNet-conditioned image generation.
//!
//! The crate draws the raster masks that constrain the structure of a
//! generated image (a centered circle for canny guidance, or a pizza split
//! into jittered wedges for segmentation guidance) and derives the numeric
//! prompt weights that go with them. It performs no I/O apart from the
//! optional debug dumps.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`mask`] | [`mask::MaskBuilder`], wedges, circle and pizza masks |
//! | [`canvas`] | Square RGBA raster with filled ellipse / pie-slice primitives |
//! | [`geometry`] | Points, bounding boxes, ellipse and slice containment |
//! | [`fill`] | Semantic fill classes and the palette that colors them |
//! | [`jitter`] | Injectable random source for wedge-edge jitter |
//! | [`weights`] | Piece counts, emptiness, and prompt weights |
//! | [`consts`] | Shared numeric constants |
//! | [`error`] | [`GuideError`] |

pub mod canvas;
pub mod consts;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod jitter;
pub mod mask;
pub mod weights;

pub use canvas::Canvas;
pub use error::GuideError;
pub use fill::{FillClass, Palette};
pub use jitter::{FixedJitter, JitterSource, RngJitter};
pub use mask::{MaskBuilder, PizzaMask, Wedge};
pub use weights::{PieceCount, PromptWeights};

/// Build a centered circle mask with the default palette.
///
/// # Errors
///
/// Returns [`GuideError::ZeroWidth`] when `width` is zero.
pub fn build_circle_mask(width: u32) -> Result<Canvas, GuideError> {
    MaskBuilder::new().build_circle_mask(width)
}

/// Build a pizza segmentation mask with the default palette and an
/// entropy-seeded jitter source.
///
/// # Errors
///
/// Returns a validation error for a zero width, a zero total, or more
/// pieces than the total.
pub fn build_pizza_segmentation_mask(width: u32, num_pieces: u32, total_num_pieces: u32) -> Result<PizzaMask, GuideError> {
    MaskBuilder::new().build_pizza_segmentation_mask(width, num_pieces, total_num_pieces)
}

/// Fraction of the pizza that is gone: `1 - num_pieces / total_num_pieces`.
///
/// # Errors
///
/// Returns a validation error for a zero total or more pieces than the total.
pub fn compute_emptiness(num_pieces: u32, total_num_pieces: u32) -> Result<f64, GuideError> {
    Ok(PieceCount::new(num_pieces, total_num_pieces)?.emptiness())
}
