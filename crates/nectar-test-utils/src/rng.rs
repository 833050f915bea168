//! Deterministic RNG utilities for reproducible tests.

use nectar_core::types::{ACTION_DIM, Action};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A reproducible action with every component in `[-1, 1]`.
pub fn deterministic_action(seed: u64) -> Action {
    let mut rng = seeded_rng(seed);
    Action::new(
        (0..ACTION_DIM)
            .map(|_| rng.gen_range(-1.0..=1.0))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
