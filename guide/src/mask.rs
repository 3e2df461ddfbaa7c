//! Guide-mask builders.
//!
//! Two masks are produced:
//!
//! - a **circle mask**: one centered filled circle, used as an edge guide;
//! - a **pizza segmentation mask**: a dish with `num_pieces` pie-slice
//!   wedges on top, colored by semantic class for a segmentation guide.
//!
//! Wedges are drawn at 3 o'clock = 0°, clockwise, then the finished canvas
//! is rotated 90° CCW so the first wedge starts at 12 o'clock. Each wedge
//! edge is widened by an independent jitter draw, so neighbouring wedges
//! may overlap or leave a gap. Later wedges overwrite earlier ones.

#[cfg(test)]
#[path = "mask_test.rs"]
mod mask_test;

use std::path::PathBuf;

use rand::rngs::StdRng;

use crate::canvas::Canvas;
use crate::consts::{CIRCLE_DIAMETER_RATIO, DEBUG_CIRCLE_MASK_FILENAME, DEBUG_PIZZA_MASK_FILENAME, DISH_INSET_PX};
use crate::error::GuideError;
use crate::fill::{FillClass, Palette};
use crate::geometry::Bounds;
use crate::jitter::{JitterSource, RngJitter};
use crate::weights::PieceCount;

/// One drawn pizza slice, in the pre-rotation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub fill_class: FillClass,
}

impl Wedge {
    /// Nominal `(start, end)` angles of wedge `index`.
    #[must_use]
    pub fn nominal_angles(index: u32, count: PieceCount) -> (f64, f64) {
        let span = count.wedge_span_deg();
        (span * f64::from(index), span * f64::from(index + 1))
    }

    /// Wedge `index` with its start pulled back and its end pushed forward
    /// by two independent jitter draws.
    pub fn jittered(index: u32, count: PieceCount, jitter: &mut impl JitterSource) -> Self {
        let (start, end) = Self::nominal_angles(index, count);
        let start_angle_deg = start - f64::from(jitter.jitter_deg());
        let end_angle_deg = end + f64::from(jitter.jitter_deg());
        Self { start_angle_deg, end_angle_deg, fill_class: FillClass::Food }
    }

    #[must_use]
    pub fn span_deg(&self) -> f64 {
        self.end_angle_deg - self.start_angle_deg
    }
}

/// A finished pizza mask and the wedges that were drawn into it.
#[derive(Debug, Clone)]
pub struct PizzaMask {
    pub canvas: Canvas,
    pub wedges: Vec<Wedge>,
}

impl PizzaMask {
    #[must_use]
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

/// Builds guide masks with a palette, a jitter source, and optional debug dumps.
pub struct MaskBuilder<J = RngJitter<StdRng>> {
    palette: Palette,
    jitter: J,
    debug_dir: Option<PathBuf>,
}

impl MaskBuilder {
    /// ADE20K palette, entropy-seeded jitter, no debug output.
    #[must_use]
    pub fn new() -> Self {
        Self { palette: Palette::ade20k(), jitter: RngJitter::from_entropy(), debug_dir: None }
    }
}

impl Default for MaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: JitterSource> MaskBuilder<J> {
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the jitter source, e.g. with a seeded one for reproducible masks.
    pub fn with_jitter<K: JitterSource>(self, jitter: K) -> MaskBuilder<K> {
        MaskBuilder { palette: self.palette, jitter, debug_dir: self.debug_dir }
    }

    /// Dump every finished mask as PNG into `dir` under a fixed file name.
    #[must_use]
    pub fn with_debug_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.debug_dir = dir;
        self
    }

    /// Centered filled circle, 90% of `width` across, on the background fill.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::ZeroWidth`] or [`GuideError::WidthTooLarge`],
    /// or [`GuideError::Write`] when
    /// the debug dump fails.
    pub fn build_circle_mask(&mut self, width: u32) -> Result<Canvas, GuideError> {
        let mut canvas = Canvas::new(width, self.palette)?;
        canvas.fill_ellipse(pizza_bounds(width), FillClass::Shape);
        self.dump(&canvas, DEBUG_CIRCLE_MASK_FILENAME)?;
        Ok(canvas)
    }

    /// Dish plus `num_pieces` jittered wedges, rotated so wedge 0 starts at 12 o'clock.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero or oversized width, a zero or
    /// oversized total, or more pieces than the total; [`GuideError::Write`]
    /// when the debug dump fails.
    pub fn build_pizza_segmentation_mask(
        &mut self,
        width: u32,
        num_pieces: u32,
        total_num_pieces: u32,
    ) -> Result<PizzaMask, GuideError> {
        let count = PieceCount::new(num_pieces, total_num_pieces)?;
        let mut canvas = Canvas::new(width, self.palette)?;

        let pizza = pizza_bounds(width);
        let dish = Bounds::padded_square(f64::from(width), pizza.min.x + DISH_INSET_PX);
        if canvas.fill_ellipse(dish, FillClass::Dish) == 0 {
            tracing::debug!(width, "canvas too small for the dish inset; dish skipped");
        }

        let mut wedges = Vec::new();
        for index in 0..count.num_pieces() {
            let wedge = Wedge::jittered(index, count, &mut self.jitter);
            canvas.fill_pieslice(pizza, wedge.start_angle_deg, wedge.end_angle_deg, wedge.fill_class);
            wedges.push(wedge);
        }
        tracing::debug!(num_pieces, total_num_pieces, ?wedges, "pizza wedges drawn");

        let canvas = canvas.rotate_ccw();
        self.dump(&canvas, DEBUG_PIZZA_MASK_FILENAME)?;
        Ok(PizzaMask { canvas, wedges })
    }

    fn dump(&self, canvas: &Canvas, file_name: &str) -> Result<(), GuideError> {
        let Some(dir) = &self.debug_dir else {
            return Ok(());
        };
        let path = dir.join(file_name);
        tracing::debug!(path = %path.display(), "saving debug mask");
        canvas.save_png(&path)
    }
}

/// Bounding box of the circle: 90% of the canvas, centered.
fn pizza_bounds(width: u32) -> Bounds {
    let side = f64::from(width);
    let diameter = side * CIRCLE_DIAMETER_RATIO;
    Bounds::padded_square(side, (side - diameter) / 2.0)
}
