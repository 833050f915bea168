//! Nearest-flower target selection.

use bevy::math::Vec3;
use nectar_core::types::FlowerId;

use crate::flower::Flower;

/// Remembers which flower the agent is currently heading for.
///
/// Holds an index into the field's flower list, never the flower itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NearestFlowerTracker {
    current: Option<FlowerId>,
}

impl NearestFlowerTracker {
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Select the flower with nectar closest to `reference`.
    ///
    /// The first flower in iteration order wins ties. `None` when no flower
    /// has nectar left.
    pub fn recompute(&mut self, flowers: &[Flower], reference: Vec3) -> Option<FlowerId> {
        let mut best: Option<(FlowerId, f32)> = None;
        for (i, flower) in flowers.iter().enumerate() {
            if !flower.has_nectar() {
                continue;
            }
            let dist = reference.distance_squared(flower.center());
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((FlowerId(i), dist)),
            }
        }
        self.current = best.map(|(id, _)| id);
        self.current
    }

    /// Recompute only when there is no target or the target ran dry.
    pub fn refresh_if_depleted(&mut self, flowers: &[Flower], reference: Vec3) -> Option<FlowerId> {
        let stale = self
            .current
            .and_then(|id| flowers.get(id.0))
            .is_none_or(|flower| !flower.has_nectar());
        if stale {
            self.recompute(flowers, reference)
        } else {
            self.current
        }
    }

    pub const fn current(&self) -> Option<FlowerId> {
        self.current
    }

    /// Resolve the current target against the field's flowers.
    pub fn target<'a>(&self, flowers: &'a [Flower]) -> Option<&'a Flower> {
        self.current.and_then(|id| flowers.get(id.0))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nectar_core::types::{ContactId, PlantId};

    fn at(i: u32, x: f32) -> Flower {
        Flower::new(ContactId(i), PlantId(0), Vec3::new(x, 0.0, 0.0), Vec3::Y, 1.0)
    }

    /// Flowers A, B, C at distances 3, 2, 1 from the origin.
    fn abc() -> Vec<Flower> {
        vec![at(0, 3.0), at(1, 2.0), at(2, 1.0)]
    }

    #[test]
    fn picks_nearest_then_next_then_none() {
        let mut flowers = abc();
        let mut tracker = NearestFlowerTracker::new();
        // A starts empty.
        flowers[0].feed(1.0);

        assert_eq!(tracker.recompute(&flowers, Vec3::ZERO), Some(FlowerId(2)));

        flowers[2].feed(1.0);
        assert_eq!(tracker.recompute(&flowers, Vec3::ZERO), Some(FlowerId(1)));

        flowers[1].feed(1.0);
        assert_eq!(tracker.recompute(&flowers, Vec3::ZERO), None);
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn first_flower_wins_ties() {
        let flowers = vec![at(0, 1.0), at(1, -1.0)];
        let mut tracker = NearestFlowerTracker::new();
        assert_eq!(tracker.recompute(&flowers, Vec3::ZERO), Some(FlowerId(0)));
    }

    #[test]
    fn empty_list_has_no_target() {
        let mut tracker = NearestFlowerTracker::new();
        assert_eq!(tracker.recompute(&[], Vec3::ZERO), None);
    }

    #[test]
    fn refresh_keeps_target_with_nectar() {
        let flowers = abc();
        let mut tracker = NearestFlowerTracker::new();
        tracker.recompute(&flowers, Vec3::ZERO);
        // Moving next to A does not switch target while C still has nectar.
        assert_eq!(
            tracker.refresh_if_depleted(&flowers, Vec3::new(3.0, 0.0, 0.0)),
            Some(FlowerId(2))
        );
    }

    #[test]
    fn refresh_switches_when_target_depleted() {
        let mut flowers = abc();
        let mut tracker = NearestFlowerTracker::new();
        tracker.recompute(&flowers, Vec3::ZERO);
        flowers[2].feed(1.0);
        assert_eq!(
            tracker.refresh_if_depleted(&flowers, Vec3::ZERO),
            Some(FlowerId(1))
        );
    }

    #[test]
    fn refresh_recovers_from_none() {
        let flowers = abc();
        let mut tracker = NearestFlowerTracker::new();
        assert_eq!(tracker.current(), None);
        assert_eq!(
            tracker.refresh_if_depleted(&flowers, Vec3::ZERO),
            Some(FlowerId(2))
        );
    }

    #[test]
    fn target_resolves_and_clear_forgets() {
        let flowers = abc();
        let mut tracker = NearestFlowerTracker::new();
        tracker.recompute(&flowers, Vec3::ZERO);
        assert_eq!(
            tracker.target(&flowers).map(Flower::contact),
            Some(ContactId(2))
        );
        tracker.clear();
        assert!(tracker.target(&flowers).is_none());
    }
}
