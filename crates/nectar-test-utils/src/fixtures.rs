//! Ready-made flower fields and collider scenes.

use bevy::math::Vec3;
use nectar_core::ranges::RandomizationRange;
use nectar_core::types::{ContactId, PlantId, SurfaceTag};
use nectar_field::{FlowerField, FlowerSpec};
use nectar_physics::{ArenaBounds, ColliderScene, SphereCollider};

/// Radius of the nectar sensor spheres in fixture scenes.
pub const NECTAR_RADIUS: f32 = 0.05;

/// One flower per entry, all on a single untilted plant at the origin.
///
/// Flower `i` gets contact id `i` and faces `+Z`.
pub fn field_with_flowers(centers: &[Vec3]) -> FlowerField {
    let mut builder = FlowerField::builder().with_tilt(RandomizationRange::Fixed(0.0));
    let plant = builder.add_plant(Vec3::ZERO);
    for (i, center) in centers.iter().enumerate() {
        builder.add_flower(FlowerSpec {
            plant,
            contact: ContactId(i as u32),
            center: *center,
            up: Vec3::Z,
        });
    }
    // Contacts are sequential and the plant exists, so composition cannot fail.
    builder
        .build()
        .unwrap_or_else(|e| panic!("fixture field failed to build: {e}"))
}

/// Flowers A, B, C on the X axis at distances 3, 2 and 1 from the origin.
pub fn abc_field() -> FlowerField {
    field_with_flowers(&[
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ])
}

/// A single flower at `center` facing `up`.
pub fn single_flower_field(center: Vec3, up: Vec3) -> FlowerField {
    let mut builder = FlowerField::builder().with_tilt(RandomizationRange::Fixed(0.0));
    let plant = builder.add_plant(center);
    builder.add_flower(FlowerSpec {
        plant,
        contact: ContactId(0),
        center,
        up,
    });
    builder
        .build()
        .unwrap_or_else(|e| panic!("fixture field failed to build: {e}"))
}

/// Empty field: no plants, no flowers.
pub fn empty_field() -> FlowerField {
    FlowerField::from_layout(&[], &[])
        .unwrap_or_else(|e| panic!("empty field failed to build: {e}"))
}

/// Collider scene with one nectar sensor per flower and a 20 m arena box.
pub fn scene_for(field: &FlowerField) -> ColliderScene {
    let mut scene = ColliderScene::new().with_bounds(ArenaBounds::centered(
        field.origin() - Vec3::Y * 0.5,
        20.0,
        10.0,
    ));
    for flower in field.flowers() {
        scene.add_sphere(SphereCollider::new(
            flower.center(),
            NECTAR_RADIUS,
            SurfaceTag::Nectar(flower.contact()),
        ));
    }
    scene
}

/// Plant id of the single plant used by the fixtures above.
pub const FIXTURE_PLANT: PlantId = PlantId(0);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
