use bevy::math::Vec3;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ranges::RandomizationRange;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_physics_dt() -> f32 {
    0.02
}
const fn default_max_episode_steps() -> u32 {
    5000
}
const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// NectarConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for one arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct NectarConfig {
    /// Fixed simulation step in seconds (default: 0.02 = 50 Hz).
    #[serde(default = "default_physics_dt")]
    pub physics_dt: f32,

    /// Enables reward computation and episodic auto-reset.
    #[serde(default)]
    pub training_mode: bool,

    /// Master random seed.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub spawn: SpawnConfig,

    #[serde(default)]
    pub reward: RewardConfig,

    #[serde(default)]
    pub arena: ArenaConfig,

    #[serde(default)]
    pub episode: EpisodeSettings,
}

impl Default for NectarConfig {
    fn default() -> Self {
        Self {
            physics_dt: default_physics_dt(),
            training_mode: false,
            seed: 0,
            agent: AgentConfig::default(),
            spawn: SpawnConfig::default(),
            reward: RewardConfig::default(),
            arena: ArenaConfig::default(),
            episode: EpisodeSettings::default(),
        }
    }
}

impl NectarConfig {
    /// Builder: toggle training mode.
    #[must_use]
    pub const fn with_training_mode(mut self, training: bool) -> Self {
        self.training_mode = training;
        self
    }

    /// Builder: set the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Step limit actually enforced. Outside training episodes never truncate.
    pub const fn effective_max_steps(&self) -> u32 {
        if self.training_mode {
            self.episode.max_episode_steps
        } else {
            0
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.physics_dt > 0.0) {
            return Err(ConfigError::InvalidPhysicsDt(self.physics_dt));
        }
        self.agent.validate()?;
        self.spawn.validate()?;
        self.reward.validate()?;
        self.arena.validate()?;
        Ok(())
    }

    /// Load from a TOML file and validate.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("must be positive and finite, got {value}"),
        })
    }
}

fn ordered(field: &str, [low, high]: [f32; 2]) -> Result<(), ConfigError> {
    if low.is_finite() && high.is_finite() && low <= high {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field: field.into(),
            low,
            high,
        })
    }
}

// ---------------------------------------------------------------------------
// AgentConfig
// ---------------------------------------------------------------------------

/// Body, feeding anchor and motion-control parameters of the forager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Scale applied to the raw force components of an action.
    pub move_force: f32,
    /// Degrees per second at a smoothed pitch rate of 1.
    pub pitch_speed: f32,
    /// Degrees per second at a smoothed yaw rate of 1.
    pub yaw_speed: f32,
    /// Pitch is clamped to `[-max_pitch_angle, max_pitch_angle]`.
    pub max_pitch_angle: f32,
    /// Maximum change of the smoothed pitch/yaw rates per second.
    pub smoothing_rate: f32,
    /// Beak tip in body-local coordinates (forward is `-Z`).
    pub beak_tip_offset: [f32; 3],
    /// Contacts farther than this from the beak tip never feed.
    pub beak_tip_radius: f32,
    /// Radius of the body sphere used for contact detection.
    pub body_radius: f32,
    pub mass: f32,
    /// Linear drag coefficient (1/s).
    pub linear_drag: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_force: 2.0,
            pitch_speed: 100.0,
            yaw_speed: 100.0,
            max_pitch_angle: 80.0,
            smoothing_rate: 2.0,
            beak_tip_offset: [0.0, 0.0, -0.1],
            beak_tip_radius: 0.008,
            body_radius: 0.12,
            mass: 1.0,
            linear_drag: 2.0,
        }
    }
}

impl AgentConfig {
    pub fn beak_tip(&self) -> Vec3 {
        Vec3::from_array(self.beak_tip_offset)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("agent.max_pitch_angle", self.max_pitch_angle)?;
        if self.max_pitch_angle > 90.0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_pitch_angle".into(),
                message: format!("must be <= 90, got {}", self.max_pitch_angle),
            });
        }
        positive("agent.smoothing_rate", self.smoothing_rate)?;
        positive("agent.beak_tip_radius", self.beak_tip_radius)?;
        positive("agent.body_radius", self.body_radius)?;
        positive("agent.mass", self.mass)?;
        if self.linear_drag < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.linear_drag".into(),
                message: "must be >= 0".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SpawnConfig
// ---------------------------------------------------------------------------

/// Rejection-sampling parameters for episode placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Candidates sampled before giving up.
    pub max_attempts: u32,
    /// Radius of the overlap probe around each candidate.
    pub probe_radius: f32,
    /// Distance in front of a flower along its facing vector.
    pub front_distance: [f32; 2],
    /// Free-float height above the arena origin.
    pub height: [f32; 2],
    /// Free-float horizontal distance from the arena origin.
    pub radius: [f32; 2],
    /// Free-float azimuth in degrees.
    pub azimuth: [f32; 2],
    /// Free-float initial pitch in degrees.
    pub pitch: [f32; 2],
    /// Free-float initial yaw in degrees.
    pub yaw: [f32; 2],
    /// In training mode, chance of spawning in front of a flower.
    pub front_probability: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            probe_radius: 0.05,
            front_distance: [0.1, 0.2],
            height: [1.2, 2.5],
            radius: [2.0, 7.0],
            azimuth: [-180.0, 180.0],
            pitch: [-60.0, 60.0],
            yaw: [-180.0, 180.0],
            front_probability: 0.5,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "spawn.max_attempts".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(self.probe_radius >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "spawn.probe_radius".into(),
                message: "must be >= 0".into(),
            });
        }
        ordered("spawn.front_distance", self.front_distance)?;
        ordered("spawn.height", self.height)?;
        ordered("spawn.radius", self.radius)?;
        ordered("spawn.azimuth", self.azimuth)?;
        ordered("spawn.pitch", self.pitch)?;
        ordered("spawn.yaw", self.yaw)?;
        if !(0.0..=1.0).contains(&self.front_probability) {
            return Err(ConfigError::InvalidValue {
                field: "spawn.front_probability".into(),
                message: format!("must be in [0, 1], got {}", self.front_probability),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RewardConfig
// ---------------------------------------------------------------------------

/// Feeding increment and reward shaping constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Nectar requested from a flower per qualifying contact.
    pub feed_amount: f32,
    /// Base reward per qualifying contact in training mode.
    pub feed_reward: f32,
    /// Scale of the face-on alignment bonus.
    pub alignment_bonus: f32,
    /// Reward for hitting an arena boundary in training mode.
    pub boundary_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            feed_amount: 0.01,
            feed_reward: 0.01,
            alignment_bonus: 0.2,
            boundary_penalty: -0.5,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.feed_amount >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "reward.feed_amount".into(),
                message: "must be >= 0".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ArenaConfig
// ---------------------------------------------------------------------------

/// Arena size and flower defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Used to normalize the distance-to-target observation.
    pub diameter: f32,
    /// Full nectar capacity of every flower.
    pub flower_capacity: f32,
    /// Half-width in degrees of the per-plant pitch/roll tilt on reset.
    pub plant_tilt: f32,
    /// Yaw in degrees every plant is set to on reset.
    pub plant_yaw: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            diameter: 20.0,
            flower_capacity: 1.0,
            plant_tilt: 5.0,
            plant_yaw: 180.0,
        }
    }
}

impl ArenaConfig {
    /// Symmetric pitch/roll range sampled per plant on reset.
    pub fn tilt_range(&self) -> Result<RandomizationRange, ConfigError> {
        Ok(RandomizationRange::symmetric(self.plant_tilt)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena.diameter", self.diameter)?;
        positive("arena.flower_capacity", self.flower_capacity)?;
        if !(self.plant_tilt >= 0.0 && self.plant_tilt.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "arena.plant_tilt".into(),
                message: "must be >= 0".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EpisodeSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSettings {
    /// Steps before truncation in training mode. `0` means no limit.
    #[serde(default = "default_max_episode_steps")]
    pub max_episode_steps: u32,
    /// End a training episode once every flower is empty.
    #[serde(default = "default_true")]
    pub end_when_depleted: bool,
}

impl Default for EpisodeSettings {
    fn default() -> Self {
        Self {
            max_episode_steps: default_max_episode_steps(),
            end_when_depleted: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = NectarConfig::default();
        assert!((cfg.physics_dt - 0.02).abs() < f32::EPSILON);
        assert!(!cfg.training_mode);
        assert!((cfg.agent.move_force - 2.0).abs() < f32::EPSILON);
        assert!((cfg.agent.max_pitch_angle - 80.0).abs() < f32::EPSILON);
        assert!((cfg.agent.beak_tip_radius - 0.008).abs() < f32::EPSILON);
        assert_eq!(cfg.spawn.max_attempts, 100);
        assert!((cfg.spawn.probe_radius - 0.05).abs() < f32::EPSILON);
        assert!((cfg.reward.boundary_penalty + 0.5).abs() < f32::EPSILON);
        assert!((cfg.arena.diameter - 20.0).abs() < f32::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn effective_max_steps_depends_on_training() {
        let cfg = NectarConfig::default();
        assert_eq!(cfg.effective_max_steps(), 0);
        let cfg = cfg.with_training_mode(true);
        assert_eq!(cfg.effective_max_steps(), 5000);
    }

    #[test]
    fn validate_rejects_bad_dt() {
        let cfg = NectarConfig {
            physics_dt: 0.0,
            ..NectarConfig::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidPhysicsDt(_)
        ));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let mut cfg = NectarConfig::default();
        cfg.spawn.height = [2.5, 1.2];
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidRange { .. }
        ));
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut cfg = NectarConfig::default();
        cfg.spawn.max_attempts = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_pitch_limit_above_vertical() {
        let mut cfg = NectarConfig::default();
        cfg.agent.max_pitch_angle = 95.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn toml_empty_uses_defaults() {
        let cfg = NectarConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, NectarConfig::default());
    }

    #[test]
    fn toml_partial_sections() {
        let cfg = NectarConfig::from_toml_str(
            r"
            training_mode = true
            seed = 9

            [agent]
            move_force = 3.5

            [spawn]
            max_attempts = 20

            [episode]
            max_episode_steps = 250
            ",
        )
        .unwrap();
        assert!(cfg.training_mode);
        assert_eq!(cfg.seed, 9);
        assert!((cfg.agent.move_force - 3.5).abs() < f32::EPSILON);
        assert!((cfg.agent.pitch_speed - 100.0).abs() < f32::EPSILON);
        assert_eq!(cfg.spawn.max_attempts, 20);
        assert_eq!(cfg.episode.max_episode_steps, 250);
        assert!(cfg.episode.end_when_depleted);
    }

    #[test]
    fn toml_invalid_values_rejected() {
        let result = NectarConfig::from_toml_str("physics_dt = -1.0");
        assert!(matches!(result, Err(ConfigError::InvalidPhysicsDt(_))));
    }

    #[test]
    fn from_file_round_trip() {
        let dir = std::env::temp_dir().join("nectar_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("arena.toml");
        std::fs::write(
            &path,
            r"
            physics_dt = 0.01
            [arena]
            diameter = 12.0
        ",
        )
        .unwrap();

        let cfg = NectarConfig::from_file(&path).unwrap();
        assert!((cfg.physics_dt - 0.01).abs() < f32::EPSILON);
        assert!((cfg.arena.diameter - 12.0).abs() < f32::EPSILON);

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn from_file_not_found() {
        let result = NectarConfig::from_file("/nonexistent/path/arena.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn tilt_range_is_symmetric() {
        let range = ArenaConfig::default().tilt_range().unwrap();
        assert!((range.low() + 5.0).abs() < f32::EPSILON);
        assert!((range.high() - 5.0).abs() < f32::EPSILON);

        let flat = ArenaConfig {
            plant_tilt: 0.0,
            ..ArenaConfig::default()
        };
        assert_eq!(flat.tilt_range().unwrap(), RandomizationRange::Fixed(0.0));
    }

    #[test]
    fn beak_tip_vector() {
        let agent = AgentConfig::default();
        assert_eq!(agent.beak_tip(), Vec3::new(0.0, 0.0, -0.1));
    }
}
