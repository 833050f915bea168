//! Arena systems, one per [`NectarSet`](nectar_core::NectarSet) phase.

use bevy::prelude::*;
use nectar_agent::{Forager, ManualInput};
use nectar_core::config::NectarConfig;
use nectar_core::seed::{FIELD_RESET, SeedHierarchy};
use nectar_core::types::{ACTION_DIM, Action, SurfaceTag};
use nectar_field::FlowerField;
use nectar_physics::{ColliderScene, PointMassBody};

use crate::ArenaRng;
use crate::components::{Brain, ContactMemory, ManualControl, PendingAction, StepReport};

/// Index of the arena in the seed hierarchy. Each app hosts one arena.
const ARENA_INDEX: u16 = 0;

/// Move every nectar sensor onto its flower after the field re-tilted.
pub fn sync_nectar_sensors(field: &FlowerField, scene: &mut ColliderScene) {
    for flower in field.flowers() {
        if !scene.move_contact(flower.contact(), flower.center()) {
            warn!("No nectar sensor registered for contact {}", flower.contact());
        }
    }
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

/// Start episodes for foragers that have none, and restart finished ones in
/// training arenas.
///
/// Flower tilts come from the episode's own seed so the field of episode `n`
/// does not depend on how earlier episodes went. Spawn placement draws from
/// the shared [`ArenaRng`] so foragers starting together land apart.
///
/// A failed placement leaves the forager as it was; it is retried on the
/// next tick.
#[allow(clippy::needless_pass_by_value)]
pub fn episode_reset_system(
    seeds: Res<SeedHierarchy>,
    mut rng: ResMut<ArenaRng>,
    mut field: ResMut<FlowerField>,
    mut scene: ResMut<ColliderScene>,
    mut foragers: Query<(
        Entity,
        &mut Forager,
        &mut PointMassBody,
        &mut ContactMemory,
        &mut StepReport,
    )>,
) {
    for (entity, mut forager, mut body, mut memory, mut report) in &mut foragers {
        let state = forager.episode().state;
        let due = !state.is_running() && (!state.is_terminal() || forager.is_training());
        if !due {
            continue;
        }

        let episode = u64::from(forager.episode().episode_number) + 1;
        let seed = seeds.episode_seed(ARENA_INDEX, episode);
        let mut field_rng = seeds.subsystem_rng(ARENA_INDEX, episode, FIELD_RESET);
        if forager.reset_field(&mut field, &mut field_rng) {
            sync_nectar_sensors(&field, &mut scene);
        }
        match forager.begin_episode(&field, &*scene, &mut *body, &mut rng.0, Some(seed)) {
            Ok(()) => {
                memory.clear();
                *report = StepReport::default();
            }
            Err(err) => error!("Forager {entity}: episode {episode} not started: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decide
// ---------------------------------------------------------------------------

/// Ask each running forager's brain, or the manual input, for an action.
#[allow(clippy::needless_pass_by_value)]
pub fn decide_system(
    field: Res<FlowerField>,
    input: Res<ManualInput>,
    mut foragers: Query<(&Forager, &mut PendingAction, Option<&Brain>, Has<ManualControl>)>,
) {
    for (forager, mut pending, brain, manual) in &mut foragers {
        if !forager.episode().is_running() {
            continue;
        }
        pending.0 = if manual {
            input.to_action(&forager.state().pose)
        } else if let Some(brain) = brain {
            brain.0.decide(&forager.observe(&field))
        } else {
            Action::zeros(ACTION_DIM)
        };
    }
}

// ---------------------------------------------------------------------------
// Act
// ---------------------------------------------------------------------------

#[allow(clippy::needless_pass_by_value)]
pub fn act_system(
    config: Res<NectarConfig>,
    mut foragers: Query<(Entity, &mut Forager, &mut PointMassBody, &mut PendingAction)>,
) {
    for (entity, mut forager, mut body, mut pending) in &mut foragers {
        if !forager.episode().is_running() {
            continue;
        }
        let action = pending.take();
        if let Err(err) = forager.act(action, config.physics_dt, &mut *body) {
            warn!("Forager {entity}: action rejected: {err}");
        }
    }
}

// ---------------------------------------------------------------------------
// Simulate
// ---------------------------------------------------------------------------

/// Integrate bodies, push them out of solids and back inside the arena.
#[allow(clippy::needless_pass_by_value)]
pub fn simulate_system(
    config: Res<NectarConfig>,
    scene: Res<ColliderScene>,
    mut foragers: Query<(&mut Forager, &mut PointMassBody)>,
) {
    for (mut forager, mut body) in &mut foragers {
        if !forager.episode().is_running() {
            continue;
        }
        body.integrate(config.physics_dt);
        scene.resolve(&mut body);
        forager.sync_pose(&*body);
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// Classify what each body touches and hand it to the forager.
///
/// Nectar contacts feed every tick they persist. Boundary contacts are
/// penalised once per touch.
#[allow(clippy::needless_pass_by_value)]
pub fn contact_system(
    mut field: ResMut<FlowerField>,
    scene: Res<ColliderScene>,
    mut foragers: Query<(Entity, &mut Forager, &PointMassBody, &mut ContactMemory)>,
) {
    for (entity, mut forager, body, mut memory) in &mut foragers {
        if !forager.episode().is_running() {
            continue;
        }
        let contacts = scene.contacts(body.pose().position, body.radius());
        let mut touching_boundary = false;
        for contact in &contacts {
            if contact.tag.is_boundary() {
                touching_boundary = true;
                continue;
            }
            if let Err(err) = forager.handle_contact(contact, &mut field, &*scene) {
                debug!("Forager {entity}: contact skipped: {err}");
            }
        }
        if memory.update_boundary(touching_boundary) {
            forager.handle_boundary(SurfaceTag::Boundary);
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluate
// ---------------------------------------------------------------------------

/// Refresh targets and close the step.
#[allow(clippy::needless_pass_by_value)]
pub fn evaluate_system(
    field: Res<FlowerField>,
    mut foragers: Query<(&mut Forager, &mut StepReport)>,
) {
    for (mut forager, mut report) in &mut foragers {
        if !forager.episode().is_running() {
            report.just_finished = false;
            continue;
        }
        forager.refresh_target(&field);
        let outcome = forager.end_step(&field);
        report.last = Some(outcome);
        report.just_finished = outcome.state.is_terminal();
    }
}
