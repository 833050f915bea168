// nectar-physics: Built-in physics backend for the Nectar forager.
//
// A point-mass body implements the `BodyControl` primitives and a collider
// scene of tagged spheres inside an arena box answers overlap, closest-point
// and contact-classification queries. Nothing here knows about flowers or
// rewards; it only sees `SurfaceTag`s.

pub mod body;
pub mod scene;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        body::PointMassBody,
        scene::{ArenaBounds, ColliderScene, SphereCollider},
    };
}

pub use body::PointMassBody;
pub use scene::{ArenaBounds, ColliderScene, SphereCollider};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
