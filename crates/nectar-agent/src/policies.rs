//! Basic decision sources.
//!
//! All sources implement [`DecisionSource`] from `nectar-core`.

use std::sync::{Mutex, PoisonError};

use nectar_core::traits::DecisionSource;
use nectar_core::types::{ACTION_DIM, Action, Observation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// IdlePolicy
// ---------------------------------------------------------------------------

/// Hovers in place: every action is zero.
pub struct IdlePolicy;

impl DecisionSource for IdlePolicy {
    fn decide(&self, _obs: &Observation) -> Action {
        Action::zeros(ACTION_DIM)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "IdlePolicy"
    }
}

// ---------------------------------------------------------------------------
// ConstantPolicy
// ---------------------------------------------------------------------------

/// Policy that always returns the same fixed action.
pub struct ConstantPolicy {
    action: Action,
}

impl ConstantPolicy {
    pub const fn new(action: Action) -> Self {
        Self { action }
    }
}

impl DecisionSource for ConstantPolicy {
    fn decide(&self, _obs: &Observation) -> Action {
        self.action.clone()
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ConstantPolicy"
    }
}

// ---------------------------------------------------------------------------
// RandomPolicy
// ---------------------------------------------------------------------------

/// Uniform random actions in `[-1, 1]`.
///
/// Uses a seeded RNG for determinism. Thread-safe via [`Mutex`].
pub struct RandomPolicy {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl DecisionSource for RandomPolicy {
    fn decide(&self, _obs: &Observation) -> Action {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Action::new((0..ACTION_DIM).map(|_| rng.gen_range(-1.0..=1.0)).collect())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "RandomPolicy"
    }

    fn is_deterministic(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// HomingPolicy
// ---------------------------------------------------------------------------

/// Pushes the beak tip straight at the current target.
///
/// Reads the target direction from the observation; with no target it
/// hovers. Orientation is left alone.
pub struct HomingPolicy {
    gain: f32,
}

impl HomingPolicy {
    pub const fn new(gain: f32) -> Self {
        Self { gain }
    }
}

impl Default for HomingPolicy {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DecisionSource for HomingPolicy {
    fn decide(&self, obs: &Observation) -> Action {
        let mut action = Action::zeros(ACTION_DIM);
        if let Some(direction) = obs.as_slice().get(4..7) {
            for (out, dir) in action.as_mut_slice().iter_mut().zip(direction) {
                *out = dir * self.gain;
            }
        }
        action.clip_normalized();
        action
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "HomingPolicy"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
