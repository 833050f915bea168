use std::fmt;

use bevy::math::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::math::look_angles;

/// Length of the action vector: three force components, pitch delta, yaw delta.
pub const ACTION_DIM: usize = 5;

/// Length of the observation vector emitted every decision step.
pub const OBSERVATION_DIM: usize = 10;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque identifier of a nectar contact surface, assigned at composition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactId(pub u32);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contact#{}", self.0)
    }
}

/// Index of a flower in its field's discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlowerId(pub usize);

impl fmt::Display for FlowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flower#{}", self.0)
    }
}

/// Index of a plant (visual cluster of flowers) in its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlantId(pub usize);

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plant#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Surfaces and contacts
// ---------------------------------------------------------------------------

/// Classification the collision system attaches to every surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceTag {
    /// Nectar surface of a flower.
    Nectar(ContactId),
    /// Arena wall, floor or ceiling.
    Boundary,
    /// Any other solid obstacle (stems, leaves).
    Solid,
}

impl SurfaceTag {
    pub const fn contact_id(self) -> Option<ContactId> {
        match self {
            Self::Nectar(id) => Some(id),
            _ => None,
        }
    }

    pub const fn is_boundary(self) -> bool {
        matches!(self, Self::Boundary)
    }
}

/// A contact event already classified by the physics driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub tag: SurfaceTag,
}

impl Contact {
    pub const fn new(tag: SurfaceTag) -> Self {
        Self { tag }
    }

    pub const fn nectar(id: ContactId) -> Self {
        Self::new(SurfaceTag::Nectar(id))
    }

    pub const fn boundary() -> Self {
        Self::new(SurfaceTag::Boundary)
    }
}

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// Position plus pitch/yaw orientation in degrees. Roll is always zero.
///
/// Uses a Y-up frame where the body's forward axis is `-Z`; rotation is
/// yaw about Y applied after pitch about X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
}

impl Pose {
    #[must_use]
    pub const fn new(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            pitch,
            yaw,
        }
    }

    /// Pose at `position` facing `target` with world up as the up vector.
    ///
    /// A zero-length direction yields a level pose facing `-Z`.
    #[must_use]
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let (pitch, yaw) = look_angles(target - position);
        Self::new(position, pitch, yaw)
    }

    /// Orientation as a unit quaternion.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }

    /// Unit forward vector.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Transform a body-local offset into world space.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation() * local
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Flat f32 vector handed to the decision source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    data: Vec<f32>,
}

impl Observation {
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Check the vector has the expected length.
    pub fn validate(&self, expected: usize) -> Result<(), ValidationError> {
        if self.data.len() == expected {
            Ok(())
        } else {
            Err(ValidationError::ObservationDimMismatch {
                expected,
                got: self.data.len(),
            })
        }
    }
}

impl std::ops::Index<usize> for Observation {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl From<Vec<f32>> for Observation {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Continuous control command from the decision source.
///
/// Components are applied raw; any clamping policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    data: Vec<f32>,
}

impl Action {
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Clip every value to [-1, 1].
    pub fn clip_normalized(&mut self) {
        for val in &mut self.data {
            *val = val.clamp(-1.0, 1.0);
        }
    }

    /// Validate dimension and reject NaN/Inf.
    pub fn validate(&self, expected: usize) -> Result<(), ValidationError> {
        if self.data.len() != expected {
            return Err(ValidationError::ActionDimMismatch {
                expected,
                got: self.data.len(),
            });
        }
        for val in &self.data {
            if val.is_nan() {
                return Err(ValidationError::ActionContainsNan);
            }
            if val.is_infinite() {
                return Err(ValidationError::ActionContainsInf);
            }
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Action {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
