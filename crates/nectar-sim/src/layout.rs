//! Flat description of an arena: plants, their flowers, solid obstacles and
//! the bounding box.
//!
//! [`ArenaLayout`] is plain data. It builds the [`FlowerField`] and the
//! matching [`ColliderScene`], giving every flower a nectar sensor under the
//! same [`ContactId`].

use std::f32::consts::TAU;

use bevy::math::{Quat, Vec3};
use nectar_core::config::ArenaConfig;
use nectar_core::error::NectarError;
use nectar_core::types::{ContactId, PlantId, SurfaceTag};
use nectar_field::{FlowerField, FlowerFieldBuilder, FlowerSpec};
use nectar_physics::{ArenaBounds, ColliderScene, SphereCollider};
use serde::{Deserialize, Serialize};

/// Radius of the nectar sensor sphere around each flower center.
pub const NECTAR_RADIUS: f32 = 0.05;

/// A solid sphere the agent cannot pass through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidSpec {
    pub center: [f32; 3],
    pub radius: f32,
}

/// A flower position and facing, in world space at the plant's rest pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutFlower {
    pub plant: usize,
    pub center: [f32; 3],
    pub up: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaLayout {
    pub origin: [f32; 3],
    /// Height of the arena box above the origin.
    pub height: f32,
    pub plants: Vec<[f32; 3]>,
    pub flowers: Vec<LayoutFlower>,
    #[serde(default)]
    pub solids: Vec<SolidSpec>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            height: 5.0,
            plants: Vec::new(),
            flowers: Vec::new(),
            solids: Vec::new(),
        }
    }
}

impl ArenaLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plants evenly spaced on a circle around the origin, each carrying
    /// `flowers_per_plant` flowers stacked up its stem and facing outward.
    #[allow(clippy::cast_precision_loss)]
    pub fn ring(plants: usize, flowers_per_plant: usize, radius: f32) -> Self {
        let mut layout = Self::new();
        for i in 0..plants {
            let angle = TAU * i as f32 / plants as f32;
            let root = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
            let plant = layout.add_plant(root);
            layout.add_solid(root + Vec3::Y * 0.3, 0.3);
            for j in 0..flowers_per_plant {
                let spin = TAU * j as f32 / flowers_per_plant as f32;
                let outward = Quat::from_rotation_y(spin) * root.normalize_or(Vec3::Z);
                let center = root + Vec3::Y * (1.2 + 0.3 * j as f32) + outward * 0.15;
                let up = (outward + Vec3::Y * 0.5).normalize();
                layout.add_flower(plant, center, up);
            }
        }
        layout
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin.to_array();
        self
    }

    pub fn add_plant(&mut self, root: Vec3) -> PlantId {
        self.plants.push(root.to_array());
        PlantId(self.plants.len() - 1)
    }

    /// Register a flower. Its contact id is its registration index.
    pub fn add_flower(&mut self, plant: PlantId, center: Vec3, up: Vec3) -> ContactId {
        self.flowers.push(LayoutFlower {
            plant: plant.0,
            center: center.to_array(),
            up: up.to_array(),
        });
        contact_id(self.flowers.len() - 1)
    }

    pub fn add_solid(&mut self, center: Vec3, radius: f32) -> &mut Self {
        self.solids.push(SolidSpec {
            center: center.to_array(),
            radius,
        });
        self
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }

    pub fn bounds(&self, arena: &ArenaConfig) -> ArenaBounds {
        ArenaBounds::centered(self.origin(), arena.diameter, self.height)
    }

    /// Build the flower field with capacity, tilt and rest yaw from `arena`.
    pub fn build_field(&self, arena: &ArenaConfig) -> Result<FlowerField, NectarError> {
        let mut builder = FlowerFieldBuilder::from_config(arena)?.with_origin(self.origin());
        for root in &self.plants {
            builder.add_plant(Vec3::from_array(*root));
        }
        for (i, flower) in self.flowers.iter().enumerate() {
            builder.add_flower(FlowerSpec {
                plant: PlantId(flower.plant),
                contact: contact_id(i),
                center: Vec3::from_array(flower.center),
                up: Vec3::from_array(flower.up),
            });
        }
        Ok(builder.build()?)
    }

    /// Colliders for `field`: a nectar sensor on every flower's current
    /// center, the solids, and the arena box.
    pub fn build_scene(&self, arena: &ArenaConfig, field: &FlowerField) -> ColliderScene {
        let mut scene = ColliderScene::new().with_bounds(self.bounds(arena));
        for flower in field.flowers() {
            scene.add_sphere(SphereCollider::new(
                flower.center(),
                NECTAR_RADIUS,
                SurfaceTag::Nectar(flower.contact()),
            ));
        }
        for solid in &self.solids {
            scene.add_sphere(SphereCollider::new(
                Vec3::from_array(solid.center),
                solid.radius,
                SurfaceTag::Solid,
            ));
        }
        scene
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn contact_id(index: usize) -> ContactId {
    ContactId(index as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
