//! The forager aggregate: one agent's controller, tracker, feedback and
//! episode bookkeeping behind a single component.

use bevy::log::{debug, info};
use bevy::prelude::Component;
use nectar_core::config::NectarConfig;
use nectar_core::error::{ConfigError, ControlError, FieldError, NectarError, ValidationError};
use nectar_core::traits::{BodyControl, CollisionQuery, SurfaceQuery};
use nectar_core::types::{ACTION_DIM, Action, Contact, FlowerId, Observation, SurfaceTag};
use nectar_field::{Flower, FlowerField, NearestFlowerTracker};
use rand::Rng;

use crate::episode::{Episode, EpisodeState};
use crate::feedback::FeedbackComposer;
use crate::motion::MotionController;
use crate::spawn::SpawnPlacer;
use crate::state::AgentState;

// ---------------------------------------------------------------------------
// StepOutcome
// ---------------------------------------------------------------------------

/// What one finished step produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Reward gathered since the previous step ended.
    pub reward: f32,
    pub state: EpisodeState,
}

// ---------------------------------------------------------------------------
// Forager
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone)]
pub struct Forager {
    state: AgentState,
    controller: MotionController,
    tracker: NearestFlowerTracker,
    composer: FeedbackComposer,
    placer: SpawnPlacer,
    episode: Episode,
    training: bool,
    max_steps: u32,
    end_when_depleted: bool,
    last_action: Action,
    pending_reward: f32,
}

impl Forager {
    pub fn from_config(config: &NectarConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            state: AgentState::from_config(&config.agent),
            controller: MotionController::from_config(&config.agent),
            tracker: NearestFlowerTracker::new(),
            composer: FeedbackComposer::from_config(config),
            placer: SpawnPlacer::from_config(&config.spawn)?,
            episode: Episode::default(),
            training: config.training_mode,
            max_steps: config.effective_max_steps(),
            end_when_depleted: config.episode.end_when_depleted,
            last_action: Action::zeros(ACTION_DIM),
            pending_reward: 0.0,
        })
    }

    // -- Episode boundary --

    /// Re-tilt and refill the field for a new episode. Only training arenas
    /// reset their flowers; returns whether a reset happened.
    pub fn reset_field<R: Rng + ?Sized>(&self, field: &mut FlowerField, rng: &mut R) -> bool {
        if self.training {
            field.reset(rng);
        }
        self.training
    }

    /// Place the agent for a new episode.
    ///
    /// The spawn pose is found first; if placement fails nothing about the
    /// agent or body has changed. On success the agent's gathered nectar,
    /// smoothing and velocity are zeroed, the body is moved, the target is
    /// re-selected and the episode starts running.
    pub fn begin_episode<R: Rng + ?Sized>(
        &mut self,
        field: &FlowerField,
        query: &dyn CollisionQuery,
        body: &mut dyn BodyControl,
        rng: &mut R,
        seed: Option<u64>,
    ) -> Result<(), NectarError> {
        let mode = self.placer.choose_mode(self.training, rng);
        let mut pose = self.placer.find_pose(mode, field, query, rng)?;
        pose.pitch = self.controller.clamp_pitch(pose.pitch);

        self.state.nectar_obtained = 0.0;
        self.state.pose = pose;
        self.controller.reset();
        self.pending_reward = 0.0;
        self.last_action = Action::zeros(ACTION_DIM);
        body.zero_velocity();
        body.set_pose(&pose);
        let target = self.tracker.recompute(field.flowers(), self.state.beak_tip());
        self.episode.reset(seed, self.max_steps);

        debug!(
            "Episode {} started ({:?}) at {:?}, target {:?}",
            self.episode.episode_number, mode, pose.position, target
        );
        Ok(())
    }

    /// Convenience for callers whose collision query does not depend on
    /// flower placement: field reset and placement in one call.
    pub fn reset_episode<R: Rng + ?Sized>(
        &mut self,
        field: &mut FlowerField,
        query: &dyn CollisionQuery,
        body: &mut dyn BodyControl,
        rng: &mut R,
        seed: Option<u64>,
    ) -> Result<(), NectarError> {
        self.reset_field(field, rng);
        self.begin_episode(field, query, body, rng, seed)
    }

    // -- Per-tick --

    /// Apply an action through the motion controller.
    pub fn act(
        &mut self,
        action: Action,
        dt: f32,
        body: &mut dyn BodyControl,
    ) -> Result<(), ValidationError> {
        self.controller
            .step(&action, dt, &mut self.state.pose, body)?;
        self.last_action = action;
        Ok(())
    }

    /// Pull the integrated position back from the body.
    pub fn sync_pose(&mut self, body: &dyn BodyControl) {
        self.state.pose.position = body.position();
    }

    pub fn observe(&self, field: &FlowerField) -> Observation {
        self.composer
            .observe(&self.state, self.tracker.target(field.flowers()))
    }

    /// Feed from a nectar contact. The reward is banked until
    /// [`end_step`](Self::end_step).
    pub fn handle_contact(
        &mut self,
        contact: &Contact,
        field: &mut FlowerField,
        surfaces: &dyn SurfaceQuery,
    ) -> Result<f32, FieldError> {
        let reward = self.composer.on_contact(
            contact,
            &mut self.state,
            field,
            &mut self.tracker,
            surfaces,
            self.training,
        )?;
        self.pending_reward += reward;
        Ok(reward)
    }

    /// Bank the boundary penalty for a collision with `tag`.
    pub fn handle_boundary(&mut self, tag: SurfaceTag) -> f32 {
        let reward = self.composer.on_boundary_collision(tag, self.training);
        self.pending_reward += reward;
        reward
    }

    /// Re-select the target if it has run dry.
    pub fn refresh_target(&mut self, field: &FlowerField) -> Option<FlowerId> {
        self.tracker
            .refresh_if_depleted(field.flowers(), self.state.beak_tip())
    }

    /// Close the step: hand the banked reward to the episode and check the
    /// end conditions.
    pub fn end_step(&mut self, field: &FlowerField) -> StepOutcome {
        let reward = std::mem::take(&mut self.pending_reward);
        if self.episode.advance(reward) {
            if self.training && self.end_when_depleted && field.all_depleted() {
                self.episode.terminate();
                info!(
                    "Episode {} done: field emptied in {} steps, reward {:.3}",
                    self.episode.episode_number, self.episode.step_count, self.episode.total_reward
                );
            } else if self.episode.check_truncation() {
                info!(
                    "Episode {} truncated at {} steps, reward {:.3}, nectar {:.3}",
                    self.episode.episode_number,
                    self.episode.step_count,
                    self.episode.total_reward,
                    self.state.nectar_obtained
                );
            }
        }
        StepOutcome {
            reward,
            state: self.episode.state,
        }
    }

    // -- Manual control --

    pub fn freeze(&mut self, body: &mut dyn BodyControl) -> Result<(), ControlError> {
        self.controller.freeze(self.training, body)
    }

    pub fn unfreeze(&mut self, body: &mut dyn BodyControl) -> Result<(), ControlError> {
        self.controller.unfreeze(self.training, body)
    }

    // -- Accessors --

    pub const fn state(&self) -> &AgentState {
        &self.state
    }

    pub const fn episode(&self) -> &Episode {
        &self.episode
    }

    pub const fn tracker(&self) -> &NearestFlowerTracker {
        &self.tracker
    }

    pub const fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub const fn is_training(&self) -> bool {
        self.training
    }

    pub const fn last_action(&self) -> &Action {
        &self.last_action
    }

    pub const fn nectar_obtained(&self) -> f32 {
        self.state.nectar_obtained
    }

    pub fn target<'a>(&self, field: &'a FlowerField) -> Option<&'a Flower> {
        self.tracker.target(field.flowers())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
