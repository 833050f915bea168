//! Per-forager components the arena systems read and write.
//!
//! A forager entity carries a [`Forager`](nectar_agent::Forager), a
//! [`PointMassBody`](nectar_physics::PointMassBody) and the bookkeeping
//! below. Its decisions come either from a [`Brain`] or, when tagged with
//! [`ManualControl`], from the [`ManualInput`](nectar_agent::ManualInput)
//! resource.

use bevy::prelude::*;
use nectar_agent::StepOutcome;
use nectar_core::traits::DecisionSource;
use nectar_core::types::{ACTION_DIM, Action};

// ---------------------------------------------------------------------------
// Brain
// ---------------------------------------------------------------------------

/// Decision source driving one forager.
#[derive(Component)]
pub struct Brain(pub Box<dyn DecisionSource>);

impl Brain {
    pub fn new(source: impl DecisionSource) -> Self {
        Self(Box::new(source))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl std::fmt::Debug for Brain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Brain").field(&self.0.name()).finish()
    }
}

/// Marks a forager steered from [`ManualInput`](nectar_agent::ManualInput).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ManualControl;

// ---------------------------------------------------------------------------
// PendingAction
// ---------------------------------------------------------------------------

/// Action decided this tick, consumed by the act phase.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PendingAction(pub Action);

impl Default for PendingAction {
    fn default() -> Self {
        Self(Action::zeros(ACTION_DIM))
    }
}

impl PendingAction {
    /// Take the action, leaving zeros behind.
    pub fn take(&mut self) -> Action {
        std::mem::replace(&mut self.0, Action::zeros(ACTION_DIM))
    }
}

// ---------------------------------------------------------------------------
// ContactMemory
// ---------------------------------------------------------------------------

/// Contact state carried across ticks.
///
/// Boundary penalties fire on the first tick of a touch, not while the body
/// keeps resting against the wall.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactMemory {
    pub touching_boundary: bool,
}

impl ContactMemory {
    /// Record this tick's boundary state. Returns `true` when the touch is new.
    pub const fn update_boundary(&mut self, touching: bool) -> bool {
        let entered = touching && !self.touching_boundary;
        self.touching_boundary = touching;
        entered
    }

    pub const fn clear(&mut self) {
        self.touching_boundary = false;
    }
}

// ---------------------------------------------------------------------------
// StepReport
// ---------------------------------------------------------------------------

/// Result of the forager's most recent step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub last: Option<StepOutcome>,
    /// The episode ended on this tick.
    pub just_finished: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
