//! Mock implementations of the physics-facing traits for testing.
//!
//! Provides overlap queries with fixed answers, surface queries with a fixed
//! closest point, and a body that records every command it receives.

use std::cell::Cell;

use bevy::math::Vec3;
use nectar_core::traits::{BodyControl, CollisionQuery, SurfaceQuery};
use nectar_core::types::{ContactId, Pose};

// ---------------------------------------------------------------------------
// AlwaysOverlap / NeverOverlap
// ---------------------------------------------------------------------------

/// Every probe overlaps something.
pub struct AlwaysOverlap;

impl CollisionQuery for AlwaysOverlap {
    fn overlaps_anything(&self, _point: Vec3, _radius: f32) -> bool {
        true
    }
}

/// The scene is empty.
pub struct NeverOverlap;

impl CollisionQuery for NeverOverlap {
    fn overlaps_anything(&self, _point: Vec3, _radius: f32) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// CountingQuery
// ---------------------------------------------------------------------------

/// Wraps another query and counts how often it is asked.
pub struct CountingQuery<Q> {
    inner: Q,
    calls: Cell<u32>,
}

impl<Q: CollisionQuery> CountingQuery<Q> {
    pub const fn new(inner: Q) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl<Q: CollisionQuery> CollisionQuery for CountingQuery<Q> {
    fn overlaps_anything(&self, point: Vec3, radius: f32) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.overlaps_anything(point, radius)
    }
}

// ---------------------------------------------------------------------------
// RejectFirst
// ---------------------------------------------------------------------------

/// Reports an overlap for the first `n` probes, then a free scene.
pub struct RejectFirst {
    remaining: Cell<u32>,
}

impl RejectFirst {
    pub const fn new(n: u32) -> Self {
        Self {
            remaining: Cell::new(n),
        }
    }
}

impl CollisionQuery for RejectFirst {
    fn overlaps_anything(&self, _point: Vec3, _radius: f32) -> bool {
        let left = self.remaining.get();
        if left == 0 {
            false
        } else {
            self.remaining.set(left - 1);
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Surface queries
// ---------------------------------------------------------------------------

/// Closest point is the query point itself, i.e. always touching.
pub struct TouchingSurface;

impl SurfaceQuery for TouchingSurface {
    fn closest_point(&self, _contact: ContactId, point: Vec3) -> Option<Vec3> {
        Some(point)
    }
}

/// Closest point is always `offset` away from the query point.
pub struct OffsetSurface {
    pub offset: Vec3,
}

impl SurfaceQuery for OffsetSurface {
    fn closest_point(&self, _contact: ContactId, point: Vec3) -> Option<Vec3> {
        Some(point + self.offset)
    }
}

/// No registered surfaces.
pub struct NoSurface;

impl SurfaceQuery for NoSurface {
    fn closest_point(&self, _contact: ContactId, _point: Vec3) -> Option<Vec3> {
        None
    }
}

// ---------------------------------------------------------------------------
// RecordingBody
// ---------------------------------------------------------------------------

/// Body that stores the last pose and every force it was given.
#[derive(Debug, Default, Clone)]
pub struct RecordingBody {
    pub pose: Pose,
    pub forces: Vec<Vec3>,
    pub velocity_resets: u32,
    pub asleep: bool,
}

impl RecordingBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            pose: Pose::new(position, 0.0, 0.0),
            ..Self::default()
        }
    }

    pub fn total_force(&self) -> Vec3 {
        self.forces.iter().copied().sum()
    }
}

impl BodyControl for RecordingBody {
    fn position(&self) -> Vec3 {
        self.pose.position
    }

    fn set_pose(&mut self, pose: &Pose) {
        self.pose = *pose;
    }

    fn apply_force(&mut self, force: Vec3) {
        self.forces.push(force);
    }

    fn zero_velocity(&mut self) {
        self.velocity_resets += 1;
    }

    fn sleep(&mut self) {
        self.asleep = true;
    }

    fn wake(&mut self) {
        self.asleep = false;
    }

    fn is_asleep(&self) -> bool {
        self.asleep
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_overlap_answers() {
        assert!(AlwaysOverlap.overlaps_anything(Vec3::ZERO, 1.0));
        assert!(!NeverOverlap.overlaps_anything(Vec3::ZERO, 1.0));
    }

    #[test]
    fn counting_query_counts() {
        let q = CountingQuery::new(NeverOverlap);
        for _ in 0..4 {
            q.overlaps_anything(Vec3::ZERO, 0.1);
        }
        assert_eq!(q.calls(), 4);
    }

    #[test]
    fn reject_first_then_free() {
        let q = RejectFirst::new(2);
        assert!(q.overlaps_anything(Vec3::ZERO, 0.1));
        assert!(q.overlaps_anything(Vec3::ZERO, 0.1));
        assert!(!q.overlaps_anything(Vec3::ZERO, 0.1));
    }

    #[test]
    fn surface_mocks() {
        let p = Vec3::ONE;
        assert_eq!(TouchingSurface.closest_point(ContactId(0), p), Some(p));
        assert_eq!(
            OffsetSurface { offset: Vec3::X }.closest_point(ContactId(0), p),
            Some(p + Vec3::X)
        );
        assert_eq!(NoSurface.closest_point(ContactId(0), p), None);
    }

    #[test]
    fn recording_body_records() {
        let mut body = RecordingBody::at(Vec3::Y);
        body.apply_force(Vec3::X);
        body.apply_force(Vec3::X);
        body.zero_velocity();
        body.sleep();
        assert_eq!(body.total_force(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(body.velocity_resets, 1);
        assert!(body.is_asleep());
        assert_eq!(body.position(), Vec3::Y);
    }
}
