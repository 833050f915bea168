//! End-to-end arena runs through the public API.

use bevy::prelude::*;
use nectar_agent::{EpisodeState, Forager, HomingPolicy, RandomPolicy};
use nectar_core::config::NectarConfig;
use nectar_field::FlowerField;
use nectar_physics::PointMassBody;
use nectar_sim::{
    ArenaBuilder, ArenaLayout, Brain, ContactMemory, EpisodeStats, NectarSimPlugin, PendingAction,
    StepReport,
};
use nectar_test_utils::{abc_field, scene_for};

/// Plugin app over a fixture field, with one homing forager.
fn fixture_app(config: NectarConfig) -> (App, Entity) {
    let field = abc_field();
    let scene = scene_for(&field);

    let mut app = App::new();
    app.insert_resource(config.clone())
        .insert_resource(field)
        .insert_resource(scene)
        .add_plugins(NectarSimPlugin);
    app.finish();
    app.cleanup();

    let entity = app
        .world_mut()
        .spawn((
            Forager::from_config(&config).unwrap(),
            PointMassBody::from_config(&config.agent),
            PendingAction::default(),
            ContactMemory::default(),
            StepReport::default(),
            Brain::new(HomingPolicy::default()),
        ))
        .id();
    (app, entity)
}

#[test]
fn homing_forager_feeds_in_fixture_arena() {
    let (mut app, entity) = fixture_app(NectarConfig::default());
    for _ in 0..100 {
        app.update();
    }

    let forager = app.world().get::<Forager>(entity).unwrap();
    assert_eq!(forager.episode().state, EpisodeState::Running);
    assert!(forager.nectar_obtained() > 0.0);

    let field = app.world().resource::<FlowerField>();
    assert!(field.total_nectar() < 3.0);
    assert!(forager.target(field).is_some());
}

#[test]
fn same_seed_same_trajectory() {
    let run = |seed: u64| {
        let config = NectarConfig::default()
            .with_training_mode(true)
            .with_seed(seed);
        let mut arena = ArenaBuilder::new()
            .with_config(config)
            .with_layout(ArenaLayout::ring(4, 2, 3.0))
            .with_forager(RandomPolicy::new(seed))
            .build()
            .unwrap();
        arena.step_n(50);
        let world = arena.app.world();
        let body = world.get::<PointMassBody>(arena.foragers[0]).unwrap();
        let forager = world.get::<Forager>(arena.foragers[0]).unwrap();
        (body.pose().position, forager.episode().total_reward)
    };

    assert_eq!(run(21), run(21));
}

#[test]
fn training_arena_counts_truncations() {
    let mut config = NectarConfig::default().with_training_mode(true).with_seed(4);
    config.episode.max_episode_steps = 10;

    let mut arena = ArenaBuilder::new()
        .with_config(config)
        .with_layout(ArenaLayout::ring(4, 3, 3.0))
        .with_forager(RandomPolicy::new(4))
        .build()
        .unwrap();
    arena.step_n(10 * 3 + 2);

    let stats = arena.app.world().resource::<EpisodeStats>();
    assert_eq!(stats.episodes_truncated + stats.episodes_done, 3);
    assert_eq!(stats.step_history.len(), 3);
    assert!(stats.mean_episode_length().unwrap() <= 10.0);
}
