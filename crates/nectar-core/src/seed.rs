//! Deterministic seed tree for reproducible arenas.
//!
//! ```text
//! Run seed
//! └── Arena seed (one per arena instance)
//!     └── Episode seed
//!         └── Subsystem seed ("field_reset", ...)
//! ```
//!
//! Children are derived by hashing, so one root seed reproduces every flower
//! tilt and spawn pose of a run.

use std::hash::{DefaultHasher, Hash, Hasher};

use bevy::prelude::Resource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Subsystem key for flower-field tilt randomization.
pub const FIELD_RESET: &str = "field_reset";

/// Derive a child seed from a parent seed and a string key.
///
/// ```
/// use nectar_core::seed::derive_seed;
///
/// let child = derive_seed(42, "spawn");
/// assert_eq!(child, derive_seed(42, "spawn"));
/// assert_ne!(child, derive_seed(42, "field_reset"));
/// ```
#[must_use]
pub fn derive_seed(parent: u64, key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    key.hash(&mut hasher);
    hasher.finish()
}

/// Derive a child seed from a parent seed and a numeric index.
#[must_use]
pub fn derive_seed_indexed(parent: u64, index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

/// Root of the seed tree, stored as a Bevy resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct SeedHierarchy {
    root: u64,
}

impl SeedHierarchy {
    #[must_use]
    pub const fn new(root: u64) -> Self {
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> u64 {
        self.root
    }

    #[must_use]
    pub fn arena_seed(&self, arena: u16) -> u64 {
        derive_seed_indexed(self.root, u64::from(arena))
    }

    #[must_use]
    pub fn episode_seed(&self, arena: u16, episode: u64) -> u64 {
        derive_seed_indexed(self.arena_seed(arena), episode)
    }

    #[must_use]
    pub fn subsystem_seed(&self, arena: u16, episode: u64, subsystem: &str) -> u64 {
        derive_seed(self.episode_seed(arena, episode), subsystem)
    }

    /// RNG for the whole arena, advanced across episodes.
    #[must_use]
    pub fn arena_rng(&self, arena: u16) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.arena_seed(arena))
    }

    /// RNG dedicated to one subsystem of one episode.
    #[must_use]
    pub fn subsystem_rng(&self, arena: u16, episode: u64, subsystem: &str) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.subsystem_seed(arena, episode, subsystem))
    }
}

impl Default for SeedHierarchy {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
