//! A single depletable nectar source.

use bevy::math::{Quat, Vec3};
use nectar_core::types::{ContactId, PlantId};

/// One flower: a nectar store plus the geometry the agent aims at.
///
/// Geometry is kept twice: in the owning plant's frame, so tilting the plant
/// can re-place the flower, and in world space for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Flower {
    contact: ContactId,
    plant: PlantId,
    local_anchor: Vec3,
    local_up: Vec3,
    center: Vec3,
    up: Vec3,
    nectar: f32,
    full_capacity: f32,
}

impl Flower {
    /// Full flower at a world-space `center` facing `up`.
    ///
    /// `up` is normalized; a zero vector becomes world up.
    pub fn new(
        contact: ContactId,
        plant: PlantId,
        center: Vec3,
        up: Vec3,
        full_capacity: f32,
    ) -> Self {
        let up = up.try_normalize().unwrap_or(Vec3::Y);
        Self {
            contact,
            plant,
            local_anchor: center,
            local_up: up,
            center,
            up,
            nectar: full_capacity,
            full_capacity,
        }
    }

    /// Withdraw up to `requested` nectar and return what was actually taken.
    ///
    /// Non-positive requests and empty flowers yield `0.0`.
    pub fn feed(&mut self, requested: f32) -> f32 {
        if !(requested > 0.0) {
            return 0.0;
        }
        let taken = requested.min(self.nectar);
        self.nectar -= taken;
        taken
    }

    /// Refill to full capacity.
    pub fn reset_flower(&mut self) {
        self.nectar = self.full_capacity;
    }

    pub fn has_nectar(&self) -> bool {
        self.nectar > 0.0
    }

    pub const fn nectar(&self) -> f32 {
        self.nectar
    }

    pub const fn full_capacity(&self) -> f32 {
        self.full_capacity
    }

    /// World-space anchor the agent feeds from.
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Unit facing direction of the flower opening.
    pub const fn up(&self) -> Vec3 {
        self.up
    }

    pub const fn contact(&self) -> ContactId {
        self.contact
    }

    pub const fn plant(&self) -> PlantId {
        self.plant
    }

    /// Store the flower's geometry relative to a plant frame.
    pub(crate) fn attach(&mut self, plant_root: Vec3, plant_rotation: Quat) {
        let inverse = plant_rotation.inverse();
        self.local_anchor = inverse * (self.center - plant_root);
        self.local_up = (inverse * self.up).normalize_or_zero();
    }

    /// Recompute world geometry from the plant frame.
    pub(crate) fn place(&mut self, plant_root: Vec3, plant_rotation: Quat) {
        self.center = plant_root + plant_rotation * self.local_anchor;
        self.up = (plant_rotation * self.local_up).normalize_or_zero();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
