//! Episode state machine.
//!
//! An episode runs from one spawn placement to the next. [`Episode`] tracks
//! state, step count and accumulated reward for a single forager.

// ---------------------------------------------------------------------------
// EpisodeState
// ---------------------------------------------------------------------------

/// Lifecycle state of an episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EpisodeState {
    /// Before the first placement.
    #[default]
    Idle,
    /// Actively stepping.
    Running,
    /// Every flower was emptied.
    Done,
    /// Step limit reached.
    Truncated,
}

impl EpisodeState {
    /// Returns `true` if the episode is finished (Done or Truncated).
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Truncated)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

// ---------------------------------------------------------------------------
// Episode
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Episode {
    pub state: EpisodeState,
    pub step_count: u32,
    pub total_reward: f32,
    /// Seed the episode was placed with, if any.
    pub seed: Option<u64>,
    /// Episodes started since creation.
    pub episode_number: u32,
    /// Steps before truncation. `0` means no limit.
    pub max_steps: u32,
}

impl Episode {
    /// Start a new episode in `Running`.
    pub const fn reset(&mut self, seed: Option<u64>, max_steps: u32) {
        self.state = EpisodeState::Running;
        self.step_count = 0;
        self.total_reward = 0.0;
        self.seed = seed;
        self.max_steps = max_steps;
        self.episode_number += 1;
    }

    /// Count one step and its reward. Returns `false` if not running.
    pub fn advance(&mut self, reward: f32) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.step_count += 1;
        self.total_reward += reward;
        true
    }

    pub const fn terminate(&mut self) {
        self.state = EpisodeState::Done;
    }

    pub const fn truncate(&mut self) {
        self.state = EpisodeState::Truncated;
    }

    /// Truncate if the step limit is reached. Returns `true` when it fires.
    pub fn check_truncation(&mut self) -> bool {
        if self.max_steps > 0 && self.step_count >= self.max_steps && self.state.is_running() {
            self.truncate();
            return true;
        }
        false
    }

    pub const fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_detection() {
        assert_eq!(EpisodeState::default(), EpisodeState::Idle);
        assert!(!EpisodeState::Idle.is_terminal());
        assert!(EpisodeState::Running.is_running());
        assert!(EpisodeState::Done.is_terminal());
        assert!(EpisodeState::Truncated.is_terminal());
    }

    #[test]
    fn reset_starts_running() {
        let mut ep = Episode::default();
        ep.reset(Some(42), 100);
        assert_eq!(ep.state, EpisodeState::Running);
        assert_eq!(ep.seed, Some(42));
        assert_eq!(ep.max_steps, 100);
        assert_eq!(ep.episode_number, 1);
    }

    #[test]
    fn advance_accumulates_only_while_running() {
        let mut ep = Episode::default();
        assert!(!ep.advance(1.0));
        ep.reset(None, 0);
        assert!(ep.advance(0.25));
        assert!(ep.advance(-0.5));
        assert_eq!(ep.step_count, 2);
        assert!((ep.total_reward + 0.25).abs() < f32::EPSILON);
        ep.terminate();
        assert!(!ep.advance(1.0));
        assert!(ep.is_done());
    }

    #[test]
    fn truncation_at_limit() {
        let mut ep = Episode::default();
        ep.reset(None, 3);
        ep.advance(0.0);
        ep.advance(0.0);
        assert!(!ep.check_truncation());
        ep.advance(0.0);
        assert!(ep.check_truncation());
        assert_eq!(ep.state, EpisodeState::Truncated);
        assert!(!ep.check_truncation());
    }

    #[test]
    fn zero_limit_never_truncates() {
        let mut ep = Episode::default();
        ep.reset(None, 0);
        for _ in 0..10_000 {
            ep.advance(0.0);
        }
        assert!(!ep.check_truncation());
        assert!(ep.is_running());
    }

    #[test]
    fn reset_clears_counters() {
        let mut ep = Episode::default();
        ep.reset(None, 5);
        ep.advance(3.0);
        ep.truncate();
        ep.reset(Some(1), 5);
        assert_eq!(ep.step_count, 0);
        assert!(ep.total_reward.abs() < f32::EPSILON);
        assert_eq!(ep.episode_number, 2);
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EpisodeState>();
        assert_send_sync::<Episode>();
    }
}
