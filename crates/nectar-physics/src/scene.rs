//! Static collider scene: tagged spheres inside an axis-aligned arena box.

use bevy::math::Vec3;
use bevy::prelude::Resource;
use nectar_core::traits::{CollisionQuery, SurfaceQuery};
use nectar_core::types::{Contact, ContactId, SurfaceTag};

use crate::body::PointMassBody;

// ---------------------------------------------------------------------------
// SphereCollider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
    pub tag: SurfaceTag,
}

impl SphereCollider {
    pub const fn new(center: Vec3, radius: f32, tag: SurfaceTag) -> Self {
        Self {
            center,
            radius,
            tag,
        }
    }

    /// Nectar surfaces are sensors: they report contacts but never block.
    pub const fn is_sensor(&self) -> bool {
        matches!(self.tag, SurfaceTag::Nectar(_))
    }

    pub fn overlaps(&self, point: Vec3, radius: f32) -> bool {
        self.center.distance(point) < self.radius + radius
    }

    /// Closest point of the solid ball to `point`; interior points map to
    /// themselves.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let offset = point - self.center;
        if offset.length() <= self.radius {
            point
        } else {
            self.center + offset.normalize_or_zero() * self.radius
        }
    }
}

// ---------------------------------------------------------------------------
// ArenaBounds
// ---------------------------------------------------------------------------

/// Walls, floor and ceiling of the arena as one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ArenaBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of the given horizontal diameter and height standing on `origin`.
    pub fn centered(origin: Vec3, diameter: f32, height: f32) -> Self {
        let half = diameter * 0.5;
        Self::new(
            origin - Vec3::new(half, 0.0, half),
            origin + Vec3::new(half, height, half),
        )
    }

    /// Whether a sphere touches or crosses any face.
    ///
    /// Compares against the same inset box [`confine`](Self::confine) clamps
    /// to, so a confined sphere always reads as touching.
    pub fn touches(&self, point: Vec3, radius: f32) -> bool {
        let lo = self.min + Vec3::splat(radius);
        let hi = self.max - Vec3::splat(radius);
        point.cmple(lo).any() || point.cmpge(hi).any()
    }

    /// Clamp a sphere center so the sphere stays inside the box.
    ///
    /// Returns the clamped center and the axes that were clamped.
    pub fn confine(&self, point: Vec3, radius: f32) -> (Vec3, [bool; 3]) {
        let lo = self.min + Vec3::splat(radius);
        let hi = (self.max - Vec3::splat(radius)).max(lo);
        let clamped = point.clamp(lo, hi);
        let hit = [
            clamped.x != point.x,
            clamped.y != point.y,
            clamped.z != point.z,
        ];
        (clamped, hit)
    }
}

// ---------------------------------------------------------------------------
// ColliderScene
// ---------------------------------------------------------------------------

/// Every collider of one arena.
#[derive(Debug, Clone, Default, Resource)]
pub struct ColliderScene {
    spheres: Vec<SphereCollider>,
    bounds: Option<ArenaBounds>,
}

impl ColliderScene {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_bounds(mut self, bounds: ArenaBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn add_sphere(&mut self, collider: SphereCollider) -> &mut Self {
        self.spheres.push(collider);
        self
    }

    pub fn spheres(&self) -> &[SphereCollider] {
        &self.spheres
    }

    pub const fn bounds(&self) -> Option<ArenaBounds> {
        self.bounds
    }

    /// Move the sensor registered for `contact`. Returns `false` if unknown.
    pub fn move_contact(&mut self, contact: ContactId, center: Vec3) -> bool {
        match self
            .spheres
            .iter_mut()
            .find(|s| s.tag == SurfaceTag::Nectar(contact))
        {
            Some(sphere) => {
                sphere.center = center;
                true
            }
            None => false,
        }
    }

    /// Classify everything a sphere at `center` is touching.
    ///
    /// Sphere contacts come first in registration order, then at most one
    /// boundary contact.
    pub fn contacts(&self, center: Vec3, radius: f32) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = self
            .spheres
            .iter()
            .filter(|s| s.overlaps(center, radius))
            .map(|s| Contact::new(s.tag))
            .collect();
        if self.bounds.is_some_and(|b| b.touches(center, radius)) {
            contacts.push(Contact::boundary());
        }
        contacts
    }

    /// Push a body out of solid spheres and back inside the arena box,
    /// removing the velocity component that points into the obstacle.
    pub fn resolve(&self, body: &mut PointMassBody) {
        let radius = body.radius();
        let mut position = body.pose().position;
        let mut velocity = body.velocity();

        for sphere in self.spheres.iter().filter(|s| !s.is_sensor()) {
            let offset = position - sphere.center;
            let min_dist = sphere.radius + radius;
            let dist = offset.length();
            if dist >= min_dist {
                continue;
            }
            let normal = offset.try_normalize().unwrap_or(Vec3::Y);
            position = sphere.center + normal * min_dist;
            let inward = velocity.dot(normal);
            if inward < 0.0 {
                velocity -= normal * inward;
            }
        }

        if let Some(bounds) = self.bounds {
            let (clamped, hit) = bounds.confine(position, radius);
            position = clamped;
            for (axis, was_hit) in hit.into_iter().enumerate() {
                if was_hit {
                    velocity[axis] = 0.0;
                }
            }
        }

        body.set_position(position);
        body.set_velocity(velocity);
    }
}

impl CollisionQuery for ColliderScene {
    fn overlaps_anything(&self, point: Vec3, radius: f32) -> bool {
        self.spheres.iter().any(|s| s.overlaps(point, radius))
            || self.bounds.is_some_and(|b| b.touches(point, radius))
    }
}

impl SurfaceQuery for ColliderScene {
    fn closest_point(&self, contact: ContactId, point: Vec3) -> Option<Vec3> {
        self.spheres
            .iter()
            .find(|s| s.tag == SurfaceTag::Nectar(contact))
            .map(|s| s.closest_point(point))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
