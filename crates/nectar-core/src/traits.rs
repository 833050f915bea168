use bevy::math::Vec3;

use crate::types::{Action, ContactId, Observation, Pose};

// ---------------------------------------------------------------------------
// CollisionQuery
// ---------------------------------------------------------------------------

/// Overlap test against every collider in the scene.
pub trait CollisionQuery {
    /// Whether a sphere of `radius` at `point` touches any collider.
    fn overlaps_anything(&self, point: Vec3, radius: f32) -> bool;
}

// ---------------------------------------------------------------------------
// SurfaceQuery
// ---------------------------------------------------------------------------

/// Closest-point lookups on registered contact surfaces.
pub trait SurfaceQuery {
    /// Closest point on the surface `contact` to `point`, or `None` if the
    /// physics side has no such surface.
    fn closest_point(&self, contact: ContactId, point: Vec3) -> Option<Vec3>;
}

// ---------------------------------------------------------------------------
// BodyControl
// ---------------------------------------------------------------------------

/// Force and pose primitives of the agent's rigid body.
pub trait BodyControl {
    fn position(&self) -> Vec3;

    /// Teleport the body. Position and orientation change together.
    fn set_pose(&mut self, pose: &Pose);

    /// Accumulate a force for the next integration step.
    fn apply_force(&mut self, force: Vec3);

    /// Zero linear and angular velocity and drop pending forces.
    fn zero_velocity(&mut self);

    /// Stop simulating the body until [`wake`](Self::wake).
    fn sleep(&mut self);

    fn wake(&mut self);

    fn is_asleep(&self) -> bool;
}

// ---------------------------------------------------------------------------
// DecisionSource
// ---------------------------------------------------------------------------

/// Anything that maps observations to actions: a trained policy, a
/// scripted controller, or manual input.
pub trait DecisionSource: Send + Sync + 'static {
    fn decide(&self, obs: &Observation) -> Action;

    fn name(&self) -> &str;

    /// Whether this source is deterministic (no randomness).
    fn is_deterministic(&self) -> bool {
        true
    }
}
