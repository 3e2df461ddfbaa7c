#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage, imageops};

use crate::consts::MAX_CANVAS_WIDTH;
use crate::error::GuideError;
use crate::fill::{FillClass, Palette};
use crate::geometry::{Bounds, Point};

/// Square RGBA raster that masks are drawn into.
///
/// Every pixel holds a palette color, so [`Canvas::class_at`] can recover
/// the fill class that painted it last.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    palette: Palette,
}

impl Canvas {
    /// Allocate a `width × width` canvas filled with the background color.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::ZeroWidth`] when `width` is zero, or
    /// [`GuideError::WidthTooLarge`] above [`MAX_CANVAS_WIDTH`].
    pub fn new(width: u32, palette: Palette) -> Result<Self, GuideError> {
        if width == 0 {
            return Err(GuideError::ZeroWidth);
        }
        if width > MAX_CANVAS_WIDTH {
            return Err(GuideError::WidthTooLarge { width, max: MAX_CANVAS_WIDTH });
        }
        let image = RgbaImage::from_pixel(width, width, palette.color(FillClass::Background));
        Ok(Self { image, palette })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Fill the ellipse inscribed in `bounds`. Returns the number of pixels painted.
    pub fn fill_ellipse(&mut self, bounds: Bounds, class: FillClass) -> usize {
        self.fill_where(bounds, class, |p| bounds.ellipse_contains(p))
    }

    /// Fill the pie slice of the ellipse inscribed in `bounds`, running
    /// clockwise from `start_deg` to `end_deg` (0° at 3 o'clock).
    /// Returns the number of pixels painted.
    pub fn fill_pieslice(&mut self, bounds: Bounds, start_deg: f64, end_deg: f64, class: FillClass) -> usize {
        self.fill_where(bounds, class, |p| bounds.slice_contains(p, start_deg, end_deg))
    }

    fn fill_where(&mut self, bounds: Bounds, class: FillClass, inside: impl Fn(Point) -> bool) -> usize {
        if bounds.is_degenerate() {
            return 0;
        }
        let color = self.palette.color(class);
        let (x0, x1) = pixel_span(bounds.min.x, bounds.max.x, self.image.width());
        let (y0, y1) = pixel_span(bounds.min.y, bounds.max.y, self.image.height());

        let mut painted = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(Point::pixel_center(x, y)) {
                    self.image.put_pixel(x, y, color);
                    painted += 1;
                }
            }
        }
        painted
    }

    /// Rotate the whole canvas 90° counter-clockwise.
    ///
    /// Content drawn at 3 o'clock ends up at 12 o'clock.
    #[must_use]
    pub fn rotate_ccw(self) -> Self {
        Self { image: imageops::rotate270(&self.image), palette: self.palette }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Fill class of the pixel at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn class_at(&self, x: u32, y: u32) -> Option<FillClass> {
        self.pixel(x, y).and_then(|color| self.palette.classify(color))
    }

    /// Number of pixels currently holding `class`.
    #[must_use]
    pub fn count_class(&self, class: FillClass) -> usize {
        let color = self.palette.color(class);
        self.image.pixels().filter(|p| **p == color).count()
    }

    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the canvas as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Encode`] if the encoder fails.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, GuideError> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write the canvas as PNG to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Write`] if the file cannot be written.
    pub fn save_png(&self, path: &Path) -> Result<(), GuideError> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| GuideError::Write { path: path.to_path_buf(), source })
    }
}

/// Integer pixel range `[lo, hi)` covering `[min, max]`, clamped to `limit`.
fn pixel_span(min: f64, max: f64, limit: u32) -> (u32, u32) {
    let lo = min.floor().clamp(0.0, f64::from(limit)) as u32;
    let hi = max.ceil().clamp(0.0, f64::from(limit)) as u32;
    (lo, hi)
}
