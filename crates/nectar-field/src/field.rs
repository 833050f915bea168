//! The set of flowers in one arena, grouped into plants.

use std::collections::HashMap;

use bevy::log::debug;
use bevy::math::{EulerRot, Quat, Vec3};
use bevy::prelude::Resource;
use nectar_core::config::ArenaConfig;
use nectar_core::error::{ConfigError, FieldError};
use nectar_core::ranges::RandomizationRange;
use nectar_core::types::{ContactId, FlowerId, PlantId};
use rand::Rng;

use crate::flower::Flower;

// ---------------------------------------------------------------------------
// Composition specs
// ---------------------------------------------------------------------------

/// A plant as composed: its root position in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantSpec {
    pub root: Vec3,
}

/// A flower as composed, in world space with its plant at rest orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowerSpec {
    pub plant: PlantId,
    pub contact: ContactId,
    pub center: Vec3,
    pub up: Vec3,
}

/// A cluster of flowers that tilts as one on reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plant {
    pub root: Vec3,
    pub rotation: Quat,
}

// ---------------------------------------------------------------------------
// FlowerField
// ---------------------------------------------------------------------------

/// Owns every flower of an arena and resolves contact surfaces to flowers.
///
/// Flowers keep their registration order, which is the iteration order the
/// nearest-flower tracker breaks ties with.
#[derive(Debug, Clone, Resource)]
pub struct FlowerField {
    flowers: Vec<Flower>,
    plants: Vec<Plant>,
    by_contact: HashMap<ContactId, FlowerId>,
    origin: Vec3,
    tilt: RandomizationRange,
    plant_yaw: f32,
}

impl FlowerField {
    pub fn builder() -> FlowerFieldBuilder {
        FlowerFieldBuilder::new()
    }

    /// Register a composed layout with default settings.
    pub fn from_layout(plants: &[PlantSpec], flowers: &[FlowerSpec]) -> Result<Self, FieldError> {
        let mut builder = FlowerFieldBuilder::new();
        for plant in plants {
            builder.add_plant(plant.root);
        }
        for flower in flowers {
            builder.add_flower(*flower);
        }
        builder.build()
    }

    /// Start a new episode: re-tilt every plant and refill every flower.
    ///
    /// Each plant gets a pitch and roll drawn from the tilt range and the
    /// fixed yaw; its flowers follow the plant.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for plant in &mut self.plants {
            let pitch = self.tilt.sample(rng);
            let roll = self.tilt.sample(rng);
            plant.rotation = Quat::from_euler(
                EulerRot::YXZ,
                self.plant_yaw.to_radians(),
                pitch.to_radians(),
                roll.to_radians(),
            );
        }
        for flower in &mut self.flowers {
            let plant = self.plants[flower.plant().0];
            flower.place(plant.root, plant.rotation);
            flower.reset_flower();
        }
        debug!(
            "Flower field reset: {} plants, {} flowers",
            self.plants.len(),
            self.flowers.len()
        );
    }

    pub fn flower_by_contact(&self, contact: ContactId) -> Result<&Flower, FieldError> {
        let id = self.flower_id_by_contact(contact)?;
        Ok(&self.flowers[id.0])
    }

    pub fn flower_id_by_contact(&self, contact: ContactId) -> Result<FlowerId, FieldError> {
        self.by_contact
            .get(&contact)
            .copied()
            .ok_or(FieldError::UnknownContact(contact))
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    pub fn flower(&self, id: FlowerId) -> Result<&Flower, FieldError> {
        self.flowers.get(id.0).ok_or(FieldError::UnknownFlower(id))
    }

    pub fn flower_mut(&mut self, id: FlowerId) -> Result<&mut Flower, FieldError> {
        self.flowers
            .get_mut(id.0)
            .ok_or(FieldError::UnknownFlower(id))
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Center of the arena floor.
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    pub fn total_nectar(&self) -> f32 {
        self.flowers.iter().map(Flower::nectar).sum()
    }

    pub fn depleted_count(&self) -> usize {
        self.flowers.iter().filter(|f| !f.has_nectar()).count()
    }

    /// True when no flower has nectar left. An empty field counts as depleted.
    pub fn all_depleted(&self) -> bool {
        !self.flowers.iter().any(Flower::has_nectar)
    }
}

/// An arena with no flowers.
impl Default for FlowerField {
    fn default() -> Self {
        Self {
            flowers: Vec::new(),
            plants: Vec::new(),
            by_contact: HashMap::new(),
            origin: Vec3::ZERO,
            tilt: RandomizationRange::Fixed(0.0),
            plant_yaw: 180.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FlowerFieldBuilder
// ---------------------------------------------------------------------------

/// Flat registration of plants and their flowers.
#[derive(Debug, Clone)]
pub struct FlowerFieldBuilder {
    plants: Vec<PlantSpec>,
    flowers: Vec<FlowerSpec>,
    origin: Vec3,
    full_capacity: f32,
    tilt: RandomizationRange,
    plant_yaw: f32,
}

impl Default for FlowerFieldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowerFieldBuilder {
    pub fn new() -> Self {
        Self {
            plants: Vec::new(),
            flowers: Vec::new(),
            origin: Vec3::ZERO,
            full_capacity: 1.0,
            tilt: RandomizationRange::Uniform {
                low: -5.0,
                high: 5.0,
            },
            plant_yaw: 180.0,
        }
    }

    /// Builder seeded from the arena section of the config.
    pub fn from_config(config: &ArenaConfig) -> Result<Self, ConfigError> {
        Ok(Self::new()
            .with_full_capacity(config.flower_capacity)
            .with_tilt(config.tilt_range()?)
            .with_plant_yaw(config.plant_yaw))
    }

    #[must_use]
    pub const fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub const fn with_full_capacity(mut self, capacity: f32) -> Self {
        self.full_capacity = capacity;
        self
    }

    /// Range of the per-plant pitch and roll, in degrees.
    #[must_use]
    pub const fn with_tilt(mut self, tilt: RandomizationRange) -> Self {
        self.tilt = tilt;
        self
    }

    /// Yaw in degrees every plant rests at and is reset to.
    #[must_use]
    pub const fn with_plant_yaw(mut self, yaw: f32) -> Self {
        self.plant_yaw = yaw;
        self
    }

    pub fn add_plant(&mut self, root: Vec3) -> PlantId {
        self.plants.push(PlantSpec { root });
        PlantId(self.plants.len() - 1)
    }

    pub fn add_flower(&mut self, spec: FlowerSpec) -> &mut Self {
        self.flowers.push(spec);
        self
    }

    /// Validate the adjacency list and build the field.
    ///
    /// Every flower must reference a registered plant and carry a contact id
    /// no other flower uses.
    pub fn build(self) -> Result<FlowerField, FieldError> {
        let rest = Quat::from_rotation_y(self.plant_yaw.to_radians());
        let plants: Vec<Plant> = self
            .plants
            .iter()
            .map(|spec| Plant {
                root: spec.root,
                rotation: rest,
            })
            .collect();

        let mut flowers = Vec::with_capacity(self.flowers.len());
        let mut by_contact = HashMap::with_capacity(self.flowers.len());
        for spec in &self.flowers {
            let plant = plants
                .get(spec.plant.0)
                .ok_or(FieldError::UnknownPlant(spec.plant))?;
            let id = FlowerId(flowers.len());
            if by_contact.insert(spec.contact, id).is_some() {
                return Err(FieldError::DuplicateContact(spec.contact));
            }
            let mut flower = Flower::new(
                spec.contact,
                spec.plant,
                spec.center,
                spec.up,
                self.full_capacity,
            );
            flower.attach(plant.root, plant.rotation);
            flowers.push(flower);
        }

        Ok(FlowerField {
            flowers,
            plants,
            by_contact,
            origin: self.origin,
            tilt: self.tilt,
            plant_yaw: self.plant_yaw,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
