//! Decision-and-control core of the forager.
//!
//! - [`MotionController`]: action vector to force and smoothed rotation
//! - [`SpawnPlacer`]: rejection-sampled collision-free placement
//! - [`FeedbackComposer`]: observation vector, feeding and reward shaping
//! - [`Forager`]: the per-agent aggregate the simulation drives each tick
//! - [`ManualInput`] and basic [`DecisionSource`](nectar_core::traits::DecisionSource)s

pub mod episode;
pub mod feedback;
pub mod forager;
pub mod manual;
pub mod motion;
pub mod policies;
pub mod spawn;
pub mod state;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use episode::{Episode, EpisodeState};
pub use feedback::FeedbackComposer;
pub use forager::{Forager, StepOutcome};
pub use manual::ManualInput;
pub use motion::MotionController;
pub use policies::{ConstantPolicy, HomingPolicy, IdlePolicy, RandomPolicy};
pub use spawn::{SpawnMode, SpawnPlacer};
pub use state::AgentState;
