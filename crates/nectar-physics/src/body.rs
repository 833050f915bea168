//! Point-mass rigid body driven by accumulated forces.

use bevy::math::Vec3;
use bevy::prelude::Component;
use nectar_core::config::AgentConfig;
use nectar_core::traits::BodyControl;
use nectar_core::types::Pose;

// ---------------------------------------------------------------------------
// PointMassBody
// ---------------------------------------------------------------------------

/// Spherical body with linear dynamics only.
///
/// Orientation is kinematic: it changes only through [`BodyControl::set_pose`].
/// Forces accumulate between [`integrate`](Self::integrate) calls.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PointMassBody {
    pose: Pose,
    velocity: Vec3,
    pending_force: Vec3,
    mass: f32,
    linear_drag: f32,
    radius: f32,
    asleep: bool,
}

impl PointMassBody {
    pub const fn new(mass: f32, linear_drag: f32, radius: f32) -> Self {
        Self {
            pose: Pose::new(Vec3::ZERO, 0.0, 0.0),
            velocity: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            mass,
            linear_drag,
            radius,
            asleep: false,
        }
    }

    pub const fn from_config(agent: &AgentConfig) -> Self {
        Self::new(agent.mass, agent.linear_drag, agent.body_radius)
    }

    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub const fn radius(&self) -> f32 {
        self.radius
    }

    pub const fn pending_force(&self) -> Vec3 {
        self.pending_force
    }

    /// Overwrite the position without touching velocity or orientation.
    pub const fn set_position(&mut self, position: Vec3) {
        self.pose.position = position;
    }

    pub const fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Advance one step with semi-implicit Euler and exponential-style drag.
    ///
    /// Pending forces are consumed. Asleep bodies stay put.
    pub fn integrate(&mut self, dt: f32) {
        let force = std::mem::take(&mut self.pending_force);
        if self.asleep || dt <= 0.0 {
            return;
        }
        self.velocity += force / self.mass * dt;
        self.velocity /= 1.0 + self.linear_drag * dt;
        self.pose.position += self.velocity * dt;
    }
}

impl Default for PointMassBody {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

impl BodyControl for PointMassBody {
    fn position(&self) -> Vec3 {
        self.pose.position
    }

    fn set_pose(&mut self, pose: &Pose) {
        self.pose = *pose;
    }

    fn apply_force(&mut self, force: Vec3) {
        if !self.asleep {
            self.pending_force += force;
        }
    }

    fn zero_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
        self.pending_force = Vec3::ZERO;
    }

    fn sleep(&mut self) {
        self.asleep = true;
        self.zero_velocity();
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
    use approx::assert_abs_diff_eq;

    fn frictionless() -> PointMassBody {
        PointMassBody::new(1.0, 0.0, 0.1)
    }

    #[test]
    fn force_accelerates_body() {
        let mut body = frictionless();
        body.apply_force(Vec3::new(2.0, 0.0, 0.0));
        body.integrate(0.5);
        assert_abs_diff_eq!(body.velocity().x, 1.0);
        assert_abs_diff_eq!(body.position().x, 0.5);
        assert_eq!(body.pending_force(), Vec3::ZERO);
    }

    #[test]
    fn body_coasts_without_force() {
        let mut body = frictionless();
        body.set_velocity(Vec3::Y);
        body.integrate(0.1);
        body.integrate(0.1);
        assert_abs_diff_eq!(body.position().y, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn drag_slows_body() {
        let mut body = PointMassBody::new(1.0, 2.0, 0.1);
        body.set_velocity(Vec3::X);
        for _ in 0..50 {
            body.integrate(0.02);
        }
        assert!(body.velocity().x < 0.5);
        assert!(body.velocity().x > 0.0);
    }

    #[test]
    fn mass_scales_acceleration() {
        let mut body = PointMassBody::new(4.0, 0.0, 0.1);
        body.apply_force(Vec3::Z * 4.0);
        body.integrate(1.0);
        assert_abs_diff_eq!(body.velocity().z, 1.0);
    }

    #[test]
    fn asleep_body_ignores_forces() {
        let mut body = frictionless();
        body.set_velocity(Vec3::X);
        body.sleep();
        body.apply_force(Vec3::Y * 10.0);
        body.integrate(1.0);
        assert!(body.is_asleep());
        assert_eq!(body.position(), Vec3::ZERO);

        body.wake();
        assert_eq!(body.velocity(), Vec3::ZERO);
        body.apply_force(Vec3::X);
        body.integrate(1.0);
        assert_abs_diff_eq!(body.position().x, 1.0);
        assert_abs_diff_eq!(body.position().y, 0.0);
    }

    #[test]
    fn zero_velocity_drops_motion() {
        let mut body = frictionless();
        body.set_velocity(Vec3::ONE);
        body.apply_force(Vec3::ONE);
        body.zero_velocity();
        body.integrate(1.0);
        assert_eq!(body.position(), Vec3::ZERO);
    }

    #[test]
    fn set_pose_teleports_and_keeps_velocity() {
        let mut body = frictionless();
        body.set_velocity(Vec3::X);
        body.set_pose(&Pose::new(Vec3::new(0.0, 2.0, 0.0), 10.0, 45.0));
        assert_eq!(body.position(), Vec3::new(0.0, 2.0, 0.0));
        assert_abs_diff_eq!(body.pose().yaw, 45.0);
        assert_eq!(body.velocity(), Vec3::X);
    }

    #[test]
    fn default_uses_agent_config() {
        let body = PointMassBody::default();
        assert_abs_diff_eq!(body.radius(), AgentConfig::default().body_radius);
    }

    #[test]
    fn body_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PointMassBody>();
    }
}
