//! Sampling ranges for randomized scene and spawn parameters.
//!
//! A [`RandomizationRange`] describes how a single scalar is drawn each
//! episode. Config files store plain `[low, high]` pairs which are turned
//! into ranges with [`RandomizationRange::from_bounds`].

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    #[error("invalid bounds: low ({low}) > high ({high})")]
    InvalidBounds { low: f32, high: f32 },

    #[error("value is not finite: {0}")]
    NonFinite(f32),
}

/// How a parameter is randomized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RandomizationRange {
    /// Always the same value.
    Fixed(f32),

    /// Uniform over the closed interval `[low, high]`.
    Uniform { low: f32, high: f32 },
}

impl RandomizationRange {
    pub const fn fixed(value: f32) -> Result<Self, RangeError> {
        if !value.is_finite() {
            return Err(RangeError::NonFinite(value));
        }
        Ok(Self::Fixed(value))
    }

    /// Uniform range. Requires finite `low < high`.
    pub fn uniform(low: f32, high: f32) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(RangeError::InvalidBounds { low, high });
        }
        Ok(Self::Uniform { low, high })
    }

    /// Symmetric uniform range `[-half_width, half_width]`.
    pub fn symmetric(half_width: f32) -> Result<Self, RangeError> {
        Self::from_bounds([-half_width, half_width])
    }

    /// Build from a config pair. Equal bounds collapse to [`Fixed`](Self::Fixed).
    pub fn from_bounds([low, high]: [f32; 2]) -> Result<Self, RangeError> {
        if low.is_finite() && (low - high).abs() < f32::EPSILON {
            return Self::fixed(low);
        }
        Self::uniform(low, high)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match *self {
            Self::Fixed(v) => v,
            Self::Uniform { low, high } => rng.gen_range(low..=high),
        }
    }

    /// Lowest value this range can produce.
    pub fn low(&self) -> f32 {
        match *self {
            Self::Fixed(v) => v,
            Self::Uniform { low, .. } => low,
        }
    }

    /// Highest value this range can produce.
    pub fn high(&self) -> f32 {
        match *self {
            Self::Fixed(v) => v,
            Self::Uniform { high, .. } => high,
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.low()..=self.high()).contains(&value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn fixed_always_returns_value() {
        let range = RandomizationRange::fixed(180.0).unwrap();
        let mut rng = rng();
        for _ in 0..10 {
            assert!((range.sample(&mut rng) - 180.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn fixed_rejects_nan() {
        assert!(RandomizationRange::fixed(f32::NAN).is_err());
    }

    #[test]
    fn uniform_samples_in_closed_range() {
        let range = RandomizationRange::uniform(1.2, 2.5).unwrap();
        let mut rng = rng();
        for _ in 0..200 {
            let v = range.sample(&mut rng);
            assert!((1.2..=2.5).contains(&v), "got {v}");
        }
    }

    #[test]
    fn uniform_rejects_bad_bounds() {
        assert!(RandomizationRange::uniform(5.0, 5.0).is_err());
        assert!(RandomizationRange::uniform(6.0, 5.0).is_err());
        assert!(RandomizationRange::uniform(0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn symmetric_range() {
        let range = RandomizationRange::symmetric(5.0).unwrap();
        assert!((range.low() + 5.0).abs() < f32::EPSILON);
        assert!((range.high() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn from_bounds_collapses_equal_bounds() {
        assert_eq!(
            RandomizationRange::from_bounds([3.0, 3.0]).unwrap(),
            RandomizationRange::Fixed(3.0)
        );
        assert!(RandomizationRange::from_bounds([4.0, 3.0]).is_err());
    }

    #[test]
    fn deterministic_with_same_seed() {
        let range = RandomizationRange::uniform(-180.0, 180.0).unwrap();
        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);
        assert!((range.sample(&mut rng1) - range.sample(&mut rng2)).abs() < f32::EPSILON);
    }

    #[test]
    fn range_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomizationRange>();
    }
}
