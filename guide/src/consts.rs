//! Shared numeric constants for the guide crate.

// ── Geometry ────────────────────────────────────────────────────

/// Degrees in a full turn.
pub const FULL_TURN_DEG: f64 = 360.0;

/// Circle (and pizza) diameter as a fraction of the canvas width.
pub const CIRCLE_DIAMETER_RATIO: f64 = 0.90;

/// Largest accepted canvas width; a square RGBA canvas this wide is 1 GiB.
pub const MAX_CANVAS_WIDTH: u32 = 16_384;

/// Extra inset of the dish relative to the pizza circle, in pixels.
pub const DISH_INSET_PX: f64 = 10.0;

// ── Wedges ──────────────────────────────────────────────────────

/// Largest accepted `total_num_pieces`: one wedge per tenth of a degree.
pub const MAX_TOTAL_PIECES: u32 = 3_600;

/// Upper bound (inclusive) of the per-edge wedge jitter, in degrees.
pub const MAX_WEDGE_JITTER_DEG: u32 = 5;

// ── Prompt weights ──────────────────────────────────────────────

/// Scale applied to emptiness to get the "empty plate" prompt weight.
pub const EMPTY_PLATE_WEIGHT_SCALE: f64 = 1.1;

/// Emptiness strictly above this selects the "half eaten" clause.
pub const HALF_EATEN_THRESHOLD: f64 = 0.5;

// ── Debug output ────────────────────────────────────────────────

/// File name for the debug dump of the circle (canny) mask.
pub const DEBUG_CIRCLE_MASK_FILENAME: &str = "debug_canny_image.png";

/// File name for the debug dump of the pizza segmentation mask.
pub const DEBUG_PIZZA_MASK_FILENAME: &str = "debug_seg_image.png";
