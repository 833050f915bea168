//! Observations and reward shaping.

use bevy::log::error;
use nectar_core::config::NectarConfig;
use nectar_core::error::FieldError;
use nectar_core::math::clamp01;
use nectar_core::traits::SurfaceQuery;
use nectar_core::types::{Contact, OBSERVATION_DIM, Observation, SurfaceTag};
use nectar_field::{Flower, FlowerField, NearestFlowerTracker};

use crate::state::AgentState;

/// Builds the observation vector and turns contacts into nectar and reward.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackComposer {
    arena_diameter: f32,
    beak_tip_radius: f32,
    feed_amount: f32,
    feed_reward: f32,
    alignment_bonus: f32,
    boundary_penalty: f32,
}

impl FeedbackComposer {
    pub const fn from_config(config: &NectarConfig) -> Self {
        Self {
            arena_diameter: config.arena.diameter,
            beak_tip_radius: config.agent.beak_tip_radius,
            feed_amount: config.reward.feed_amount,
            feed_reward: config.reward.feed_reward,
            alignment_bonus: config.reward.alignment_bonus,
            boundary_penalty: config.reward.boundary_penalty,
        }
    }

    /// Ten values, in order: orientation quaternion (x, y, z, w), unit
    /// direction from beak tip to target, alignment of that direction with
    /// the flower opening, alignment of the agent's forward axis with the
    /// flower opening, and distance to target over arena diameter.
    ///
    /// All zeros when there is no target.
    pub fn observe(&self, agent: &AgentState, target: Option<&Flower>) -> Observation {
        let Some(target) = target else {
            return Observation::zeros(OBSERVATION_DIM);
        };
        let rotation = agent.pose.rotation().normalize();
        let to_target = target.center() - agent.beak_tip();
        let to_target_n = to_target.normalize_or_zero();
        let facing = -target.up().normalize_or_zero();
        let forward = agent.forward().normalize_or_zero();

        Observation::new(vec![
            rotation.x,
            rotation.y,
            rotation.z,
            rotation.w,
            to_target_n.x,
            to_target_n.y,
            to_target_n.z,
            to_target_n.dot(facing),
            forward.dot(facing),
            to_target.length() / self.arena_diameter,
        ])
    }

    /// Handle a classified contact. Returns the reward it earns.
    ///
    /// Only nectar contacts whose surface lies within the beak-tip radius
    /// feed. Empty flowers expose no nectar and yield nothing. When the fed
    /// flower runs dry the tracker picks a new target.
    pub fn on_contact(
        &self,
        contact: &Contact,
        agent: &mut AgentState,
        field: &mut FlowerField,
        tracker: &mut NearestFlowerTracker,
        surfaces: &dyn SurfaceQuery,
        training: bool,
    ) -> Result<f32, FieldError> {
        let Some(contact_id) = contact.tag.contact_id() else {
            return Ok(0.0);
        };
        let beak_tip = agent.beak_tip();
        let Some(closest) = surfaces.closest_point(contact_id, beak_tip) else {
            return Ok(0.0);
        };
        if beak_tip.distance(closest) >= self.beak_tip_radius {
            return Ok(0.0);
        }

        let flower_id = field.flower_id_by_contact(contact_id).inspect_err(|e| {
            error!("Contact dropped: {e}");
        })?;
        let flower = field.flower_mut(flower_id)?;
        if !flower.has_nectar() {
            return Ok(0.0);
        }
        agent.nectar_obtained += flower.feed(self.feed_amount);
        let fed_up = flower.up();
        let depleted = !flower.has_nectar();

        let reward = if training {
            let up = tracker.target(field.flowers()).map_or(fed_up, Flower::up);
            let alignment = agent.forward().normalize_or_zero().dot(-up.normalize_or_zero());
            self.feed_reward + self.alignment_bonus * clamp01(alignment)
        } else {
            0.0
        };

        if depleted {
            tracker.recompute(field.flowers(), beak_tip);
        }
        Ok(reward)
    }

    /// Penalty for touching an arena boundary in training mode.
    pub fn on_boundary_collision(&self, tag: SurfaceTag, training: bool) -> f32 {
        if training && tag.is_boundary() {
            self.boundary_penalty
        } else {
            0.0
        }
    }

    pub const fn arena_diameter(&self) -> f32 {
        self.arena_diameter
    }
}

impl Default for FeedbackComposer {
    fn default() -> Self {
        Self::from_config(&NectarConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
