#[cfg(test)]
#[path = "jitter_test.rs"]
mod jitter_test;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::consts::MAX_WEDGE_JITTER_DEG;

/// Source of the per-edge wedge jitter, in whole degrees.
///
/// Implementations must return values in `0..=MAX_WEDGE_JITTER_DEG`.
pub trait JitterSource {
    fn jitter_deg(&mut self) -> u32;
}

/// Uniform jitter drawn from any [`Rng`].
#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<StdRng> {
    /// Seeded from the operating system; different on every run.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible jitter for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn jitter_deg(&mut self) -> u32 {
        self.rng.random_range(0..=MAX_WEDGE_JITTER_DEG)
    }
}

/// Constant jitter, clamped to the allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedJitter(pub u32);

impl JitterSource for FixedJitter {
    fn jitter_deg(&mut self) -> u32 {
        self.0.min(MAX_WEDGE_JITTER_DEG)
    }
}

impl<J: JitterSource + ?Sized> JitterSource for &mut J {
    fn jitter_deg(&mut self) -> u32 {
        (**self).jitter_deg()
    }
}
