//! Per-agent kinematic and bookkeeping state.

use bevy::math::Vec3;
use nectar_core::config::AgentConfig;
use nectar_core::types::Pose;

/// Pose of the forager plus what it has gathered this episode.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub pose: Pose,
    /// Nectar gathered since the last episode boundary.
    pub nectar_obtained: f32,
    beak_tip_offset: Vec3,
}

impl AgentState {
    pub const fn new(beak_tip_offset: Vec3) -> Self {
        Self {
            pose: Pose::new(Vec3::ZERO, 0.0, 0.0),
            nectar_obtained: 0.0,
            beak_tip_offset,
        }
    }

    pub fn from_config(agent: &AgentConfig) -> Self {
        Self::new(agent.beak_tip())
    }

    /// World-space feeding anchor.
    pub fn beak_tip(&self) -> Vec3 {
        self.pose.transform_point(self.beak_tip_offset)
    }

    pub fn forward(&self) -> Vec3 {
        self.pose.forward()
    }

    pub const fn beak_tip_offset(&self) -> Vec3 {
        self.beak_tip_offset
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}
