#[cfg(test)]
#[path = "fill_test.rs"]
mod fill_test;

use image::Rgba;

/// Semantic label attached to every pixel drawn into a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillClass {
    /// Untouched canvas.
    Background,
    /// Solid shape for edge (canny) guidance.
    Shape,
    /// The plate under the pizza.
    Dish,
    /// Pizza slices.
    Food,
}

impl FillClass {
    pub const ALL: [FillClass; 4] = [Self::Background, Self::Shape, Self::Dish, Self::Food];
}

/// Maps fill classes onto the colors a conditioning backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba<u8>,
    pub shape: Rgba<u8>,
    pub dish: Rgba<u8>,
    pub food: Rgba<u8>,
}

impl Palette {
    /// ADE20K colors understood by the `sd15_seg` ControlNet model.
    ///
    /// The dish is painted as "rock, stone": the ADE20K "plate" label renders
    /// as a full dish rather than an empty one.
    #[must_use]
    pub fn ade20k() -> Self {
        Self {
            background: Rgba([255, 255, 255, 255]),
            shape: Rgba([0, 0, 0, 255]),
            dish: Rgba([255, 41, 10, 255]),
            food: Rgba([255, 204, 0, 255]),
        }
    }

    #[must_use]
    pub fn color(&self, class: FillClass) -> Rgba<u8> {
        match class {
            FillClass::Background => self.background,
            FillClass::Shape => self.shape,
            FillClass::Dish => self.dish,
            FillClass::Food => self.food,
        }
    }

    /// Reverse lookup; `None` for colors outside the palette.
    #[must_use]
    pub fn classify(&self, color: Rgba<u8>) -> Option<FillClass> {
        FillClass::ALL.into_iter().find(|class| self.color(*class) == color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ade20k()
    }
}
