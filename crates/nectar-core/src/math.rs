//! Small angle and interpolation helpers shared by the controller and spawner.

use bevy::math::Vec3;

/// Fold an angle in degrees into `(-180, 180]`. Non-finite input maps to 0.
///
/// Angles already in range are returned bit-for-bit.
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    if angle > -180.0 && angle <= 180.0 {
        return angle;
    }
    let folded = angle % 360.0;
    if folded > 180.0 {
        folded - 360.0
    } else if folded <= -180.0 {
        folded + 360.0
    } else {
        folded
    }
}

/// Move `current` toward `target` by at most `max_delta`.
#[must_use]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

#[must_use]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Pitch and yaw (degrees) of a pose whose forward axis (`-Z`) points along
/// `direction`, with world up as the up vector.
#[must_use]
pub fn look_angles(direction: Vec3) -> (f32, f32) {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return (0.0, 0.0);
    }
    let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = (-dir.x).atan2(-dir.z).to_degrees();
    (pitch, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrap_keeps_in_range_values() {
        assert_abs_diff_eq!(wrap_degrees(45.0), 45.0);
        assert_abs_diff_eq!(wrap_degrees(-179.0), -179.0);
        assert_abs_diff_eq!(wrap_degrees(180.0), 180.0);
    }

    #[test]
    fn wrap_is_exact_for_small_negative_angles() {
        assert_eq!(wrap_degrees(-0.08), -0.08);
        assert_eq!(wrap_degrees(-1e-6), -1e-6);

        let mut yaw = 0.0_f32;
        for _ in 0..1000 {
            yaw = wrap_degrees(yaw - 0.001);
        }
        let mut plain = 0.0_f32;
        for _ in 0..1000 {
            plain -= 0.001;
        }
        assert_eq!(yaw, plain);
    }

    #[test]
    fn wrap_folds_out_of_range_values() {
        assert_abs_diff_eq!(wrap_degrees(190.0), -170.0, epsilon = 1e-4);
        assert_abs_diff_eq!(wrap_degrees(-190.0), 170.0, epsilon = 1e-4);
        assert_abs_diff_eq!(wrap_degrees(720.0 + 10.0), 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(wrap_degrees(-180.0), 180.0);
        assert_abs_diff_eq!(wrap_degrees(540.0), 180.0);
        assert_abs_diff_eq!(wrap_degrees(-540.0), 180.0);
    }

    #[test]
    fn wrap_non_finite_is_zero() {
        assert_abs_diff_eq!(wrap_degrees(f32::NAN), 0.0);
        assert_abs_diff_eq!(wrap_degrees(f32::INFINITY), 0.0);
    }

    #[test]
    fn move_towards_is_rate_limited() {
        assert_abs_diff_eq!(move_towards(0.0, 1.0, 0.04), 0.04);
        assert_abs_diff_eq!(move_towards(0.0, -1.0, 0.04), -0.04);
        assert_abs_diff_eq!(move_towards(0.98, 1.0, 0.04), 1.0);
        assert_abs_diff_eq!(move_towards(0.5, 0.5, 0.04), 0.5);
    }

    #[test]
    fn clamp01_bounds() {
        assert_abs_diff_eq!(clamp01(-0.3), 0.0);
        assert_abs_diff_eq!(clamp01(0.3), 0.3);
        assert_abs_diff_eq!(clamp01(1.3), 1.0);
    }

    #[test]
    fn look_angles_cardinal_directions() {
        let (pitch, yaw) = look_angles(Vec3::NEG_Z);
        assert_abs_diff_eq!(pitch, 0.0);
        assert_abs_diff_eq!(yaw, 0.0);

        let (pitch, _) = look_angles(Vec3::Y);
        assert_abs_diff_eq!(pitch, 90.0, epsilon = 1e-4);

        let (pitch, yaw) = look_angles(Vec3::NEG_X);
        assert_abs_diff_eq!(pitch, 0.0);
        assert_abs_diff_eq!(yaw, 90.0, epsilon = 1e-4);
    }

    #[test]
    fn look_angles_zero_direction() {
        assert_eq!(look_angles(Vec3::ZERO), (0.0, 0.0));
    }
}
