//! Manual input buffer.
//!
//! [`ManualInput`] is a Bevy resource holding raw values of named input
//! channels. Keyboard handlers, gamepads or network input write values here;
//! [`ManualInput::to_action`] turns them into an action relative to the
//! agent's current heading.

use std::collections::HashMap;

use bevy::math::Vec3;
use bevy::prelude::Resource;
use nectar_core::types::{ACTION_DIM, Action, Pose};

pub const FORWARD: &str = "forward";
pub const BACK: &str = "back";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const UP: &str = "up";
pub const DOWN: &str = "down";
pub const PITCH_UP: &str = "pitch_up";
pub const PITCH_DOWN: &str = "pitch_down";
pub const YAW_LEFT: &str = "yaw_left";
pub const YAW_RIGHT: &str = "yaw_right";

/// Buffered manual control values.
///
/// # Example
///
/// ```
/// use nectar_agent::manual::{FORWARD, ManualInput};
/// use nectar_core::types::Pose;
///
/// let mut input = ManualInput::new();
/// input.set(FORWARD, 1.0);
/// let action = input.to_action(&Pose::default());
/// // Level pose: forward is -Z.
/// assert!((action.as_slice()[2] + 1.0).abs() < 1e-6);
/// ```
#[derive(Resource, Clone, Debug)]
pub struct ManualInput {
    values: HashMap<String, f32>,
    dead_zone: f32,
}

impl Default for ManualInput {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            dead_zone: 0.05,
        }
    }
}

impl ManualInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a channel, clamped to `[-1, 1]`.
    pub fn set(&mut self, channel: impl Into<String>, value: f32) {
        let value = if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.values.insert(channel.into(), value);
    }

    /// Current value of a channel after the dead zone (0.0 if unset).
    #[must_use]
    pub fn get(&self, channel: &str) -> f32 {
        let raw = self.values.get(channel).copied().unwrap_or(0.0);
        if raw.abs() < self.dead_zone {
            0.0
        } else {
            raw
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.values.len()
    }

    /// Build an action from the buffered channels.
    ///
    /// Movement channels are relative to the agent: forward follows its
    /// nose, right and up its local axes. The movement vector is scaled down
    /// to unit length when longer. Pitch and yaw channels become the rate
    /// requests, positive pitch raising the nose and positive yaw turning
    /// left.
    #[must_use]
    pub fn to_action(&self, pose: &Pose) -> Action {
        let local = Vec3::new(
            self.get(RIGHT) - self.get(LEFT),
            self.get(UP) - self.get(DOWN),
            self.get(BACK) - self.get(FORWARD),
        );
        let mut movement = pose.rotation() * local;
        if movement.length_squared() > 1.0 {
            movement = movement.normalize();
        }
        let pitch = self.get(PITCH_UP) - self.get(PITCH_DOWN);
        let yaw = self.get(YAW_LEFT) - self.get(YAW_RIGHT);

        let mut data = Vec::with_capacity(ACTION_DIM);
        data.extend_from_slice(&[movement.x, movement.y, movement.z, pitch, yaw]);
        Action::new(data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_input_is_zero_action() {
        let input = ManualInput::new();
        assert_eq!(input.to_action(&Pose::default()), Action::zeros(ACTION_DIM));
        assert_eq!(input.channel_count(), 0);
    }

    #[test]
    fn set_clamps_and_dead_zone_applies() {
        let mut input = ManualInput::new();
        input.set(UP, 3.0);
        input.set(DOWN, 0.01);
        input.set(LEFT, f32::NAN);
        assert_abs_diff_eq!(input.get(UP), 1.0);
        assert_abs_diff_eq!(input.get(DOWN), 0.0);
        assert_abs_diff_eq!(input.get(LEFT), 0.0);
        assert_abs_diff_eq!(input.get("missing"), 0.0);
    }

    #[test]
    fn forward_follows_heading() {
        let mut input = ManualInput::new();
        input.set(FORWARD, 1.0);
        let pose = Pose::new(Vec3::ZERO, 0.0, 90.0);
        let action = input.to_action(&pose);
        // Yaw 90 faces -X.
        assert_abs_diff_eq!(action.as_slice()[0], -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(action.as_slice()[2], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn diagonal_movement_is_unit_length() {
        let mut input = ManualInput::new();
        input.set(FORWARD, 1.0);
        input.set(RIGHT, 1.0);
        input.set(UP, 1.0);
        let action = input.to_action(&Pose::default());
        let s = action.as_slice();
        let len = (s[0] * s[0] + s[1] * s[1] + s[2] * s[2]).sqrt();
        assert_abs_diff_eq!(len, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn analog_movement_below_unit_is_kept() {
        let mut input = ManualInput::new();
        input.set(RIGHT, 0.5);
        let action = input.to_action(&Pose::default());
        assert_abs_diff_eq!(action.as_slice()[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn rotation_channels() {
        let mut input = ManualInput::new();
        input.set(PITCH_UP, 1.0);
        input.set(YAW_RIGHT, 1.0);
        let action = input.to_action(&Pose::default());
        assert_abs_diff_eq!(action.as_slice()[3], 1.0);
        assert_abs_diff_eq!(action.as_slice()[4], -1.0);
    }

    #[test]
    fn clear_resets_channels() {
        let mut input = ManualInput::new();
        input.set(BACK, 1.0);
        input.clear();
        assert_eq!(input.channel_count(), 0);
        assert_abs_diff_eq!(input.get(BACK), 0.0);
    }
}
