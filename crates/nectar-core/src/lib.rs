//! Shared types, traits, config, seeding and errors for the Nectar forager.
//!
//! Everything the other crates agree on lives here: the observation/action
//! vectors, poses and contact identifiers, the physics-facing traits the
//! control core consumes, and the [`NectarSet`] ordering that every Bevy
//! system of an arena is scheduled into.

pub mod config;
pub mod error;
pub mod math;
pub mod ranges;
pub mod seed;
pub mod traits;
pub mod types;

use bevy::prelude::*;

use crate::config::NectarConfig;
use crate::seed::SeedHierarchy;

// ---------------------------------------------------------------------------
// NectarSet
// ---------------------------------------------------------------------------

/// Per-tick phases of an arena, run in declaration order inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NectarSet {
    /// Episode boundaries: field reset and spawn placement.
    Reset,
    /// Observation built and handed to the decision source.
    Decide,
    /// Motion controller turns the action into force and rotation.
    Act,
    /// Bodies integrate.
    Simulate,
    /// Contacts are classified and fed to the feedback composer.
    Contact,
    /// Target refresh, episode accounting.
    Evaluate,
    /// Statistics and external reporting.
    Communicate,
}

// ---------------------------------------------------------------------------
// NectarCorePlugin
// ---------------------------------------------------------------------------

/// Registers [`NectarSet`] ordering, the [`NectarConfig`] resource and a
/// [`SeedHierarchy`] rooted at the config seed.
///
/// An existing `NectarConfig` or `SeedHierarchy` resource is left untouched.
pub struct NectarCorePlugin;

impl Plugin for NectarCorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                NectarSet::Reset,
                NectarSet::Decide,
                NectarSet::Act,
                NectarSet::Simulate,
                NectarSet::Contact,
                NectarSet::Evaluate,
                NectarSet::Communicate,
            )
                .chain(),
        );

        app.init_resource::<NectarConfig>();
        if !app.world().contains_resource::<SeedHierarchy>() {
            let seed = app.world().resource::<NectarConfig>().seed;
            app.insert_resource(SeedHierarchy::new(seed));
        }
    }
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::config::{
        AgentConfig, ArenaConfig, EpisodeSettings, NectarConfig, RewardConfig, SpawnConfig,
    };
    pub use crate::error::{
        ConfigError, ControlError, FieldError, NectarError, SpawnError, ValidationError,
    };
    pub use crate::ranges::RandomizationRange;
    pub use crate::seed::SeedHierarchy;
    pub use crate::traits::{BodyControl, CollisionQuery, DecisionSource, SurfaceQuery};
    pub use crate::types::{
        ACTION_DIM, Action, Contact, ContactId, FlowerId, OBSERVATION_DIM, Observation, PlantId,
        Pose, SurfaceTag,
    };
    pub use crate::{NectarCorePlugin, NectarSet};
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
