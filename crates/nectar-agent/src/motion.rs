//! Action-to-motion controller.
//!
//! Turns a 5-component action into a world-space force and a smoothed
//! pitch/yaw change. Rotation rates converge toward the requested deltas at a
//! bounded rate so noisy or discrete action sources do not jitter the body.

use bevy::log::error;
use bevy::math::Vec3;
use nectar_core::config::AgentConfig;
use nectar_core::error::{ControlError, ValidationError};
use nectar_core::math::{move_towards, wrap_degrees};
use nectar_core::traits::BodyControl;
use nectar_core::types::{ACTION_DIM, Action, Pose};

#[derive(Debug, Clone, PartialEq)]
pub struct MotionController {
    move_force: f32,
    pitch_speed: f32,
    yaw_speed: f32,
    max_pitch: f32,
    smoothing_rate: f32,
    smooth_pitch: f32,
    smooth_yaw: f32,
    frozen: bool,
}

impl MotionController {
    pub const fn from_config(agent: &AgentConfig) -> Self {
        Self {
            move_force: agent.move_force,
            pitch_speed: agent.pitch_speed,
            yaw_speed: agent.yaw_speed,
            max_pitch: agent.max_pitch_angle,
            smoothing_rate: agent.smoothing_rate,
            smooth_pitch: 0.0,
            smooth_yaw: 0.0,
            frozen: false,
        }
    }

    /// Apply one action for a step of `dt` seconds.
    ///
    /// `action[0..3]` is applied as a world-space force scaled by the move
    /// force; `action[3]` and `action[4]` request pitch and yaw rates. The
    /// pose is synced from the body, rotated, and written back. A frozen
    /// controller validates the action and otherwise does nothing.
    pub fn step(
        &mut self,
        action: &Action,
        dt: f32,
        pose: &mut Pose,
        body: &mut dyn BodyControl,
    ) -> Result<(), ValidationError> {
        action.validate(ACTION_DIM)?;
        if self.frozen {
            return Ok(());
        }
        let a = action.as_slice();

        body.apply_force(Vec3::new(a[0], a[1], a[2]) * self.move_force);

        let max_delta = self.smoothing_rate * dt;
        self.smooth_pitch = move_towards(self.smooth_pitch, a[3], max_delta);
        self.smooth_yaw = move_towards(self.smooth_yaw, a[4], max_delta);

        pose.position = body.position();
        pose.pitch = self.clamp_pitch(pose.pitch + self.smooth_pitch * dt * self.pitch_speed);
        pose.yaw = wrap_degrees(pose.yaw + self.smooth_yaw * dt * self.yaw_speed);
        body.set_pose(pose);
        Ok(())
    }

    /// Stop the body and ignore actions until [`unfreeze`](Self::unfreeze).
    ///
    /// Only valid outside training mode.
    pub fn freeze(&mut self, training: bool, body: &mut dyn BodyControl) -> Result<(), ControlError> {
        if training {
            error!("Freeze called in training mode");
            return Err(ControlError::FreezeInTraining);
        }
        self.frozen = true;
        body.sleep();
        Ok(())
    }

    /// Resume after [`freeze`](Self::freeze). Only valid outside training mode.
    pub fn unfreeze(
        &mut self,
        training: bool,
        body: &mut dyn BodyControl,
    ) -> Result<(), ControlError> {
        if training {
            error!("Unfreeze called in training mode");
            return Err(ControlError::UnfreezeInTraining);
        }
        self.frozen = false;
        body.wake();
        Ok(())
    }

    /// Limit a pitch angle to `[-max_pitch, max_pitch]`.
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        if pitch.is_finite() {
            pitch.clamp(-self.max_pitch, self.max_pitch)
        } else {
            0.0
        }
    }

    /// Zero the smoothed rates.
    pub const fn reset(&mut self) {
        self.smooth_pitch = 0.0;
        self.smooth_yaw = 0.0;
    }

    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub const fn smooth_pitch(&self) -> f32 {
        self.smooth_pitch
    }

    pub const fn smooth_yaw(&self) -> f32 {
        self.smooth_yaw
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
