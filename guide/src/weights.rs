#[cfg(test)]
#[path = "weights_test.rs"]
mod weights_test;

use crate::consts::{EMPTY_PLATE_WEIGHT_SCALE, HALF_EATEN_THRESHOLD, MAX_TOTAL_PIECES};
use crate::error::GuideError;

/// A validated `(num_pieces, total_num_pieces)` pair.
///
/// Construction guarantees `0 < total_num_pieces <= MAX_TOTAL_PIECES` and
/// `num_pieces <= total_num_pieces`, so angle and ratio math never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCount {
    num_pieces: u32,
    total_num_pieces: u32,
}

impl PieceCount {
    /// # Errors
    ///
    /// Returns [`GuideError::ZeroTotalPieces`], [`GuideError::TotalPiecesTooLarge`],
    /// or [`GuideError::TooManyPieces`].
    pub fn new(num_pieces: u32, total_num_pieces: u32) -> Result<Self, GuideError> {
        if total_num_pieces == 0 {
            return Err(GuideError::ZeroTotalPieces);
        }
        if total_num_pieces > MAX_TOTAL_PIECES {
            return Err(GuideError::TotalPiecesTooLarge { total_num_pieces, max: MAX_TOTAL_PIECES });
        }
        if num_pieces > total_num_pieces {
            return Err(GuideError::TooManyPieces { num_pieces, total_num_pieces });
        }
        Ok(Self { num_pieces, total_num_pieces })
    }

    #[must_use]
    pub fn num_pieces(&self) -> u32 {
        self.num_pieces
    }

    #[must_use]
    pub fn total_num_pieces(&self) -> u32 {
        self.total_num_pieces
    }

    /// Angular width of one nominal wedge.
    #[must_use]
    pub fn wedge_span_deg(&self) -> f64 {
        crate::consts::FULL_TURN_DEG / f64::from(self.total_num_pieces)
    }

    /// `1 - num_pieces / total_num_pieces`, always in `[0, 1]`.
    #[must_use]
    pub fn emptiness(&self) -> f64 {
        1.0 - f64::from(self.num_pieces) / f64::from(self.total_num_pieces)
    }
}

/// Prompt weights derived from how much of the pizza is left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptWeights {
    pub emptiness: f64,
}

impl PromptWeights {
    #[must_use]
    pub fn from_count(count: PieceCount) -> Self {
        Self { emptiness: count.emptiness() }
    }

    /// Weight for the "(empty plate:w)" clause.
    #[must_use]
    pub fn empty_plate_weight(&self) -> f64 {
        self.emptiness * EMPTY_PLATE_WEIGHT_SCALE
    }

    /// [`Self::empty_plate_weight`] with two decimals, as it appears in a prompt.
    #[must_use]
    pub fn empty_plate_weight_label(&self) -> String {
        format!("{:.2}", self.empty_plate_weight())
    }

    /// More than half the pizza is gone. Exactly half is not.
    #[must_use]
    pub fn half_eaten(&self) -> bool {
        self.emptiness > HALF_EATEN_THRESHOLD
    }
}
