//! Shared test fixtures and utilities for Nectar crates.
//!
//! Provides reusable helpers for building Bevy test apps, flower-field and
//! collider-scene fixtures, mock physics queries, and deterministic RNG setup.

pub mod app;
pub mod fixtures;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use app::{configured_test_app, minimal_test_app};
pub use fixtures::{abc_field, empty_field, field_with_flowers, scene_for, single_flower_field};
pub use rng::{deterministic_action, seeded_rng};
