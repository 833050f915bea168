//! Rejection-sampled, collision-free spawn placement.

use bevy::log::{debug, error};
use bevy::math::{Quat, Vec3};
use nectar_core::config::SpawnConfig;
use nectar_core::error::{ConfigError, SpawnError};
use nectar_core::ranges::RandomizationRange;
use nectar_core::traits::CollisionQuery;
use nectar_core::types::Pose;
use nectar_field::FlowerField;
use rand::Rng;

// ---------------------------------------------------------------------------
// SpawnMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnMode {
    /// Hover just in front of a random flower, facing it.
    InFrontOfFlower,
    /// Anywhere in a ring above the arena floor with a random heading.
    FreeFloat,
}

// ---------------------------------------------------------------------------
// SpawnPlacer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlacer {
    max_attempts: u32,
    probe_radius: f32,
    front_distance: RandomizationRange,
    height: RandomizationRange,
    radius: RandomizationRange,
    azimuth: RandomizationRange,
    pitch: RandomizationRange,
    yaw: RandomizationRange,
    front_probability: f64,
}

impl SpawnPlacer {
    pub fn from_config(config: &SpawnConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            max_attempts: config.max_attempts,
            probe_radius: config.probe_radius,
            front_distance: RandomizationRange::from_bounds(config.front_distance)?,
            height: RandomizationRange::from_bounds(config.height)?,
            radius: RandomizationRange::from_bounds(config.radius)?,
            azimuth: RandomizationRange::from_bounds(config.azimuth)?,
            pitch: RandomizationRange::from_bounds(config.pitch)?,
            yaw: RandomizationRange::from_bounds(config.yaw)?,
            front_probability: config.front_probability.clamp(0.0, 1.0),
        })
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Mode for a new episode: a coin flip in training, always in front of a
    /// flower otherwise.
    pub fn choose_mode<R: Rng + ?Sized>(&self, training: bool, rng: &mut R) -> SpawnMode {
        if !training || rng.gen_bool(self.front_probability) {
            SpawnMode::InFrontOfFlower
        } else {
            SpawnMode::FreeFloat
        }
    }

    /// Sample candidates until one does not overlap anything.
    ///
    /// Exactly `max_attempts` probes are made before giving up.
    pub fn find_pose<R: Rng + ?Sized>(
        &self,
        mode: SpawnMode,
        field: &FlowerField,
        query: &dyn CollisionQuery,
        rng: &mut R,
    ) -> Result<Pose, SpawnError> {
        if mode == SpawnMode::InFrontOfFlower && field.is_empty() {
            return Err(SpawnError::EmptyField);
        }
        for attempt in 1..=self.max_attempts {
            let candidate = match mode {
                SpawnMode::InFrontOfFlower => self.in_front_of_flower(field, rng),
                SpawnMode::FreeFloat => self.free_float(field.origin(), rng),
            };
            if !query.overlaps_anything(candidate.position, self.probe_radius) {
                debug!("Spawn placed after {attempt} attempt(s) ({mode:?})");
                return Ok(candidate);
            }
        }
        error!(
            "No safe spawn position after {} attempts ({mode:?})",
            self.max_attempts
        );
        Err(SpawnError::NoSafePosition {
            attempts: self.max_attempts,
        })
    }

    fn in_front_of_flower<R: Rng + ?Sized>(&self, field: &FlowerField, rng: &mut R) -> Pose {
        let flowers = field.flowers();
        let flower = &flowers[rng.gen_range(0..flowers.len())];
        let distance = self.front_distance.sample(rng);
        let position = flower.center() + flower.up() * distance;
        Pose::looking_at(position, flower.center())
    }

    fn free_float<R: Rng + ?Sized>(&self, origin: Vec3, rng: &mut R) -> Pose {
        let height = self.height.sample(rng);
        let radius = self.radius.sample(rng);
        let azimuth = self.azimuth.sample(rng);
        let radial = Quat::from_rotation_y(azimuth.to_radians()) * Vec3::Z * radius;
        let position = origin + Vec3::Y * height + radial;
        let pitch = self.pitch.sample(rng);
        let yaw = self.yaw.sample(rng);
        Pose::new(position, pitch, yaw)
    }
}

impl Default for SpawnPlacer {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            probe_radius: 0.05,
            front_distance: RandomizationRange::Uniform {
                low: 0.1,
                high: 0.2,
            },
            height: RandomizationRange::Uniform {
                low: 1.2,
                high: 2.5,
            },
            radius: RandomizationRange::Uniform {
                low: 2.0,
                high: 7.0,
            },
            azimuth: RandomizationRange::Uniform {
                low: -180.0,
                high: 180.0,
            },
            pitch: RandomizationRange::Uniform {
                low: -60.0,
                high: 60.0,
            },
            yaw: RandomizationRange::Uniform {
                low: -180.0,
                high: 180.0,
            },
            front_probability: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
