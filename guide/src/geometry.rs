#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::FULL_TURN_DEG;

/// A point in canvas pixel space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of the pixel at integer coordinates `(x, y)`.
    #[must_use]
    pub fn pixel_center(x: u32, y: u32) -> Self {
        Self { x: f64::from(x) + 0.5, y: f64::from(y) + 0.5 }
    }
}

/// Axis-aligned bounding box of an ellipse, `min` inclusive to `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Square box of side `side` shrunk by `padding` on every edge.
    #[must_use]
    pub fn padded_square(side: f64, padding: f64) -> Self {
        Self { min: Point::new(padding, padding), max: Point::new(side - padding, side - padding) }
    }

    /// `true` when the box has no area (padding ate the whole side).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    /// Horizontal and vertical radii of the inscribed ellipse.
    #[must_use]
    pub fn radii(&self) -> (f64, f64) {
        ((self.max.x - self.min.x) / 2.0, (self.max.y - self.min.y) / 2.0)
    }

    /// Whether `p` lies inside (or on) the ellipse inscribed in this box.
    #[must_use]
    pub fn ellipse_contains(&self, p: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let c = self.center();
        let (rx, ry) = self.radii();
        let dx = (p.x - c.x) / rx;
        let dy = (p.y - c.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    /// Angle of `p` around the box center in `[0, 360)`.
    ///
    /// 0° points at 3 o'clock and angles grow clockwise on screen, which is
    /// the frame pie slices are drawn in.
    #[must_use]
    pub fn angle_deg(&self, p: Point) -> f64 {
        let c = self.center();
        (p.y - c.y).atan2(p.x - c.x).to_degrees().rem_euclid(FULL_TURN_DEG)
    }

    /// Whether `p` lies in the pie slice from `start_deg` clockwise to `end_deg`.
    ///
    /// Angles may fall outside `[0, 360)`. A span of a full turn or more
    /// covers the whole ellipse; an empty or negative span covers nothing.
    #[must_use]
    pub fn slice_contains(&self, p: Point, start_deg: f64, end_deg: f64) -> bool {
        let span = end_deg - start_deg;
        if span.is_nan() || span <= 0.0 || !self.ellipse_contains(p) {
            return false;
        }
        if span >= FULL_TURN_DEG {
            return true;
        }
        (self.angle_deg(p) - start_deg).rem_euclid(FULL_TURN_DEG) <= span
    }
}
