//! Flowers, the flower field and nearest-flower tracking.
//!
//! A [`FlowerField`] owns every [`Flower`] of an arena and maps collision
//! contact ids back to flowers. The [`NearestFlowerTracker`] keeps an index
//! to the closest flower that still has nectar.

pub mod field;
pub mod flower;
pub mod tracker;

pub use field::{FlowerField, FlowerFieldBuilder, FlowerSpec, Plant, PlantSpec};
pub use flower::Flower;
pub use tracker::NearestFlowerTracker;
