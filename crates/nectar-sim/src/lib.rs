//! Top-level Bevy plugin running Nectar arenas.
//!
//! [`NectarSimPlugin`] adds the core plugin, the arena resources and one
//! system per [`NectarSet`] phase. [`ArenaBuilder`] composes a ready-to-run
//! app from an [`ArenaLayout`] and a config.
//!
//! # Example
//!
//! ```no_run
//! use bevy::prelude::*;
//! use nectar_sim::NectarSimPlugin;
//!
//! App::new()
//!     .add_plugins(NectarSimPlugin)
//!     .run();
//! ```

pub mod builder;
pub mod components;
pub mod layout;
pub mod stats;
pub mod systems;

#[cfg(test)]
mod headless;

use bevy::prelude::*;
use nectar_agent::ManualInput;
use nectar_core::NectarSet;
use nectar_core::seed::SeedHierarchy;
use nectar_field::FlowerField;
use nectar_physics::ColliderScene;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builder::{ArenaBuilder, SpawnedArena};
pub use components::{Brain, ContactMemory, ManualControl, PendingAction, StepReport};
pub use layout::ArenaLayout;
pub use stats::EpisodeStats;

// ---------------------------------------------------------------------------
// ArenaRng
// ---------------------------------------------------------------------------

/// Random stream of the arena, used for field resets and spawn placement.
#[derive(Resource, Debug, Clone)]
pub struct ArenaRng(pub ChaCha8Rng);

// ---------------------------------------------------------------------------
// NectarSimPlugin
// ---------------------------------------------------------------------------

/// Meta-plugin that adds the full arena loop.
///
/// Includes:
/// - [`NectarCorePlugin`](nectar_core::NectarCorePlugin): set ordering, config, seeds
/// - [`FlowerField`], [`ColliderScene`], [`ManualInput`], [`ArenaRng`] and
///   [`EpisodeStats`] resources (existing ones are kept)
/// - reset, decide, act, simulate, contact, evaluate and statistics systems
pub struct NectarSimPlugin;

impl Plugin for NectarSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(nectar_core::NectarCorePlugin);

        if !app.world().contains_resource::<ArenaRng>() {
            let rng = app.world().resource::<SeedHierarchy>().arena_rng(0);
            app.insert_resource(ArenaRng(rng));
        }

        app.init_resource::<FlowerField>()
            .init_resource::<ColliderScene>()
            .init_resource::<ManualInput>()
            .init_resource::<EpisodeStats>()
            .add_systems(
                Update,
                (
                    systems::episode_reset_system.in_set(NectarSet::Reset),
                    systems::decide_system.in_set(NectarSet::Decide),
                    systems::act_system.in_set(NectarSet::Act),
                    systems::simulate_system.in_set(NectarSet::Simulate),
                    systems::contact_system.in_set(NectarSet::Contact),
                    systems::evaluate_system.in_set(NectarSet::Evaluate),
                    stats::episode_stats_system.in_set(NectarSet::Communicate),
                ),
            );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
