//! Episode statistics tracking.
//!
//! [`EpisodeStats`] records cumulative statistics across the episodes of all
//! foragers in an arena: how many ended, how they ended, and per-episode
//! step, reward and nectar history.

use bevy::prelude::*;
use nectar_agent::{EpisodeState, Forager};

use crate::components::StepReport;

// ---------------------------------------------------------------------------
// EpisodeStats
// ---------------------------------------------------------------------------

/// Bevy resource that tracks cumulative statistics across episodes.
#[derive(Resource, Clone, Debug, Default)]
pub struct EpisodeStats {
    /// Total number of completed episodes.
    pub episodes_completed: u32,
    /// Episodes that ended with every flower emptied.
    pub episodes_done: u32,
    /// Episodes cut off by the step limit.
    pub episodes_truncated: u32,
    /// Total steps across all completed episodes.
    pub total_steps: u64,
    /// Steps per completed episode.
    pub step_history: Vec<u32>,
    /// Accumulated reward per completed episode.
    pub reward_history: Vec<f32>,
    /// Nectar gathered per completed episode.
    pub nectar_history: Vec<f32>,
}

impl EpisodeStats {
    /// Create empty stats.
    pub const fn new() -> Self {
        Self {
            episodes_completed: 0,
            episodes_done: 0,
            episodes_truncated: 0,
            total_steps: 0,
            step_history: Vec::new(),
            reward_history: Vec::new(),
            nectar_history: Vec::new(),
        }
    }

    /// Record one finished episode.
    pub fn record(&mut self, state: EpisodeState, steps: u32, reward: f32, nectar: f32) {
        match state {
            EpisodeState::Done => self.episodes_done += 1,
            EpisodeState::Truncated => self.episodes_truncated += 1,
            EpisodeState::Idle | EpisodeState::Running => return,
        }
        self.episodes_completed += 1;
        self.total_steps += u64::from(steps);
        self.step_history.push(steps);
        self.reward_history.push(reward);
        self.nectar_history.push(nectar);
    }

    /// Average episode length (steps) across all completed episodes.
    pub fn mean_episode_length(&self) -> Option<f32> {
        if self.step_history.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let sum: f32 = self.step_history.iter().map(|&s| s as f32).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.step_history.len() as f32)
    }

    pub fn mean_reward(&self) -> Option<f32> {
        mean(&self.reward_history)
    }

    pub fn mean_nectar(&self) -> Option<f32> {
        mean(&self.nectar_history)
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some(values.iter().sum::<f32>() / values.len() as f32)
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Records every forager whose episode ended on this tick.
#[allow(clippy::needless_pass_by_value)]
pub fn episode_stats_system(
    foragers: Query<(&Forager, &StepReport)>,
    mut stats: ResMut<EpisodeStats>,
) {
    for (forager, report) in &foragers {
        if !report.just_finished {
            continue;
        }
        let episode = forager.episode();
        stats.record(
            episode.state,
            episode.step_count,
            episode.total_reward,
            forager.nectar_obtained(),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
