//! Headless arena smoke tests.
//!
//! Runs the full loop (reset, decide, act, simulate, contact, evaluate,
//! statistics) as pure ECS with no window and checks the observable
//! outcomes.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bevy::math::Vec3;
    use nectar_agent::manual::FORWARD;
    use nectar_agent::{ConstantPolicy, EpisodeState, HomingPolicy, IdlePolicy, ManualInput};
    use nectar_core::config::NectarConfig;
    use nectar_core::types::Action;
    use nectar_field::FlowerField;
    use nectar_physics::PointMassBody;

    use crate::builder::{ArenaBuilder, SpawnedArena};
    use crate::layout::ArenaLayout;
    use crate::stats::EpisodeStats;

    fn single_flower_layout(center: Vec3) -> ArenaLayout {
        let mut layout = ArenaLayout::new();
        let plant = layout.add_plant(Vec3::new(center.x, 0.0, center.z));
        layout.add_flower(plant, center, Vec3::Z);
        layout
    }

    fn body_position(arena: &SpawnedArena) -> Vec3 {
        arena
            .app
            .world()
            .get::<PointMassBody>(arena.foragers[0])
            .unwrap()
            .pose()
            .position
    }

    // -------------------------------------------------------------------
    // Feeding
    // -------------------------------------------------------------------

    #[test]
    fn homing_forager_gathers_nectar() {
        let mut arena = ArenaBuilder::new()
            .with_layout(single_flower_layout(Vec3::new(0.0, 1.5, 0.0)))
            .with_forager(HomingPolicy::default())
            .build()
            .unwrap();
        arena.step_n(60);

        let forager = arena.forager(0).unwrap();
        assert!(forager.nectar_obtained() > 0.0);
        assert_eq!(forager.episode().state, EpisodeState::Running);
        // No reward outside training.
        assert_abs_diff_eq!(forager.episode().total_reward, 0.0);

        let field = arena.app.world().resource::<FlowerField>();
        assert_abs_diff_eq!(
            field.total_nectar() + forager.nectar_obtained(),
            1.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn emptied_field_ends_training_episode() {
        let mut config = NectarConfig::default().with_training_mode(true).with_seed(3);
        config.arena.flower_capacity = 0.02;
        config.spawn.front_probability = 1.0;

        let mut arena = ArenaBuilder::new()
            .with_config(config)
            .with_layout(single_flower_layout(Vec3::new(0.0, 1.5, 0.0)))
            .with_forager(HomingPolicy::default())
            .build()
            .unwrap();
        arena.step_n(150);

        let stats = arena.app.world().resource::<EpisodeStats>();
        assert!(stats.episodes_done >= 1, "stats: {stats:?}");
        assert_eq!(stats.episodes_truncated, 0);
        for nectar in &stats.nectar_history {
            assert_abs_diff_eq!(*nectar, 0.02, epsilon = 1e-5);
        }
        for reward in &stats.reward_history {
            assert!(*reward >= 0.02 - 1e-5);
        }
    }

    // -------------------------------------------------------------------
    // Episode lifecycle
    // -------------------------------------------------------------------

    #[test]
    fn training_episodes_truncate_and_restart() {
        let mut config = NectarConfig::default().with_training_mode(true).with_seed(1);
        config.episode.max_episode_steps = 5;

        let mut arena = ArenaBuilder::new()
            .with_config(config)
            .with_layout(ArenaLayout::ring(3, 2, 3.0))
            .with_forager(IdlePolicy)
            .build()
            .unwrap();
        arena.step_n(11);

        let stats = arena.app.world().resource::<EpisodeStats>();
        assert_eq!(stats.episodes_completed, 2);
        assert_eq!(stats.episodes_truncated, 2);
        assert_eq!(stats.total_steps, 10);
        assert_eq!(stats.step_history, vec![5, 5]);

        let forager = arena.forager(0).unwrap();
        assert_eq!(forager.episode().episode_number, 3);
        assert_eq!(forager.episode().step_count, 1);
    }

    #[test]
    fn non_training_episode_never_ends() {
        let mut config = NectarConfig::default();
        config.episode.max_episode_steps = 5;

        let mut arena = ArenaBuilder::new()
            .with_config(config)
            .with_layout(ArenaLayout::ring(3, 2, 3.0))
            .with_forager(IdlePolicy)
            .build()
            .unwrap();
        arena.step_n(20);

        let forager = arena.forager(0).unwrap();
        assert_eq!(forager.episode().state, EpisodeState::Running);
        assert_eq!(forager.episode().episode_number, 1);
        assert_eq!(forager.episode().step_count, 20);
        assert_eq!(
            arena.app.world().resource::<EpisodeStats>().episodes_completed,
            0
        );
    }

    #[test]
    fn empty_arena_keeps_forager_idle() {
        let mut arena = ArenaBuilder::new().with_forager(IdlePolicy).build().unwrap();
        arena.step_n(3);
        assert_eq!(
            arena.forager(0).unwrap().episode().state,
            EpisodeState::Idle
        );
    }

    // -------------------------------------------------------------------
    // Boundary
    // -------------------------------------------------------------------

    #[test]
    fn ceiling_touch_is_penalised_once() {
        let mut config = NectarConfig::default().with_training_mode(true).with_seed(7);
        config.spawn.front_probability = 0.0;

        let up = Action::new(vec![0.0, 1.0, 0.0, 0.0, 0.0]);
        let mut arena = ArenaBuilder::new()
            .with_config(config)
            .with_layout(single_flower_layout(Vec3::new(9.0, 1.0, 9.0)))
            .with_forager(ConstantPolicy::new(up))
            .build()
            .unwrap();
        arena.step_n(400);

        let position = body_position(&arena);
        assert_abs_diff_eq!(position.y, 5.0 - 0.12, epsilon = 1e-4);

        let forager = arena.forager(0).unwrap();
        assert_eq!(forager.episode().episode_number, 1);
        assert_abs_diff_eq!(forager.episode().total_reward, -0.5, epsilon = 1e-6);
    }

    // -------------------------------------------------------------------
    // Manual control
    // -------------------------------------------------------------------

    #[test]
    fn manual_forager_follows_input() {
        let mut arena = ArenaBuilder::new()
            .with_layout(single_flower_layout(Vec3::new(0.0, 1.5, 0.0)))
            .with_manual_forager()
            .build()
            .unwrap();
        arena.step_n(1);
        let start = body_position(&arena);

        arena
            .app
            .world_mut()
            .resource_mut::<ManualInput>()
            .set(FORWARD, 1.0);
        arena.step_n(20);

        // Spawned facing the flower along -Z.
        let end = body_position(&arena);
        assert!(end.z < start.z - 0.05, "start {start:?} end {end:?}");
        assert_abs_diff_eq!(end.x, start.x, epsilon = 1e-3);
    }
}
