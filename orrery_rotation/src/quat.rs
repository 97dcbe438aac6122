// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quaternion algebra used by rotation nodes.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::AxisAngle;

/// Magnitudes below this are treated as zero when normalizing axes and quaternions.
pub const NORM_EPSILON: f32 = 1e-6;

/// The rotation-free quaternion `(0, 0, 0, 1)`.
#[inline]
pub const fn identity() -> Quat {
    Quat::IDENTITY
}

/// Unit quaternion for a rotation of `angle_degrees` about `(x, y, z)`.
///
/// The axis is normalized internally. A zero angle, a zero-length axis, or any non-finite
/// component yields [`identity`].
pub fn from_axis_angle(x: f32, y: f32, z: f32, angle_degrees: f32) -> Quat {
    if angle_degrees == 0.0 {
        return Quat::IDENTITY;
    }
    let axis = Vec3::new(x, y, z);
    let len = axis.length();
    if !angle_degrees.is_finite() || !len.is_finite() || len < NORM_EPSILON {
        log::warn!("degenerate axis ({x}, {y}, {z}) at {angle_degrees} degrees, using identity");
        return Quat::IDENTITY;
    }
    let q = Quat::from_axis_angle(axis / len, angle_degrees.to_radians());
    normalize(q)
}

/// Quaternion product `a * b`: apply `b` first, then `a`.
#[inline]
pub fn multiply(a: Quat, b: Quat) -> Quat {
    a * b
}

/// Rescale `q` to unit length.
///
/// Returns [`identity`] when the magnitude is below [`NORM_EPSILON`] or not finite.
pub fn normalize(q: Quat) -> Quat {
    let v = Vec4::from(q);
    let len = v.length();
    if !len.is_finite() || len < NORM_EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_vec4(v / len)
}

/// Homogeneous rotation matrix for `q` (column-vector convention, like the rest of `glam`).
#[inline]
pub fn to_matrix(q: Quat) -> Mat4 {
    Mat4::from_quat(q)
}

/// Axis-angle form of `q`, with the angle in degrees in `[0, 360)`.
///
/// Near the identity the axis is arbitrary; `(1, 0, 0)` is returned with a zero angle.
pub fn to_axis_angle(q: Quat) -> AxisAngle {
    let (axis, radians) = normalize(q).to_axis_angle();
    let mut angle = radians.to_degrees();
    // Near -identity the angle can round up to a full turn.
    if angle >= 360.0 {
        angle -= 360.0;
    }
    if angle == 0.0 {
        return AxisAngle::new(1.0, 0.0, 0.0, 0.0);
    }
    AxisAngle::new(axis.x, axis.y, axis.z, angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn same_rotation(a: Quat, b: Quat) -> bool {
        to_matrix(a).abs_diff_eq(to_matrix(b), TOL)
    }

    #[test]
    fn identity_is_rotation_free() {
        assert_eq!(identity(), Quat::from_xyzw(0.0, 0.0, 0.0, 1.0));
        assert_eq!(to_matrix(identity()), Mat4::IDENTITY);
    }

    #[test]
    fn zero_axis_yields_identity() {
        let q = from_axis_angle(0.0, 0.0, 0.0, 45.0);
        assert_eq!(q, Quat::IDENTITY);
        assert!(!q.is_nan());
    }

    #[test]
    fn zero_angle_yields_identity() {
        assert_eq!(from_axis_angle(0.0, 1.0, 0.0, 0.0), Quat::IDENTITY);
        assert_eq!(from_axis_angle(0.0, 0.0, 0.0, 0.0), Quat::IDENTITY);
    }

    #[test]
    fn non_finite_input_yields_identity() {
        assert_eq!(from_axis_angle(f32::NAN, 0.0, 1.0, 30.0), Quat::IDENTITY);
        assert_eq!(from_axis_angle(0.0, 0.0, 1.0, f32::NAN), Quat::IDENTITY);
        assert_eq!(from_axis_angle(f32::INFINITY, 0.0, 0.0, 30.0), Quat::IDENTITY);
    }

    #[test]
    fn axis_is_normalized_internally() {
        let long = from_axis_angle(0.0, 10.0, 0.0, 90.0);
        let unit = from_axis_angle(0.0, 1.0, 0.0, 90.0);
        assert!(long.abs_diff_eq(unit, TOL));
        assert!(long.is_normalized());
        assert!(
            long.abs_diff_eq(Quat::from_rotation_y(90_f32.to_radians()), TOL),
            "should match glam's rotation about Y"
        );
    }

    #[test]
    fn composition_is_order_sensitive() {
        let y90 = from_axis_angle(0.0, 1.0, 0.0, 90.0);
        let x90 = from_axis_angle(1.0, 0.0, 0.0, 90.0);
        // Y first then X, versus X first then Y.
        let yx = multiply(x90, y90);
        let xy = multiply(y90, x90);
        assert!(!same_rotation(yx, xy));

        // `multiply(a, b)` applies `b` first.
        let p = to_matrix(yx).transform_point3(Vec3::Z);
        let after_y = to_matrix(y90).transform_point3(Vec3::Z);
        let expected = to_matrix(x90).transform_point3(after_y);
        assert!(p.abs_diff_eq(expected, TOL));
    }

    #[test]
    fn normalize_is_idempotent_and_unit() {
        let samples = [
            Quat::from_xyzw(1.0, 2.0, 3.0, 4.0),
            Quat::from_xyzw(-0.3, 0.0, 0.0, 0.01),
            Quat::from_xyzw(0.0, 0.0, 0.0, 7.5),
        ];
        for q in samples {
            let once = normalize(q);
            let twice = normalize(once);
            assert!(once.abs_diff_eq(twice, TOL));
            assert!((once.length() - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn normalize_near_zero_is_identity() {
        assert_eq!(normalize(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
        assert_eq!(normalize(Quat::from_xyzw(1e-9, 0.0, 0.0, 0.0)), Quat::IDENTITY);
        assert_eq!(
            normalize(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)),
            Quat::IDENTITY
        );
    }

    #[test]
    fn axis_angle_round_trip() {
        let inputs = [
            AxisAngle::new(0.0, 0.0, 1.0, 45.0),
            AxisAngle::new(1.0, 1.0, 0.0, 120.0),
            AxisAngle::new(0.0, -2.0, 0.0, 270.0),
            AxisAngle::new(3.0, -1.0, 2.0, -30.0),
            AxisAngle::new(0.5, 0.5, 0.5, 359.0),
        ];
        for input in inputs {
            let q = input.to_quat();
            let back = to_axis_angle(q);
            assert!(
                same_rotation(back.to_quat(), q),
                "round trip changed rotation for {input:?}"
            );
            assert!((back.axis().length() - 1.0).abs() < TOL);
            assert!((0.0..360.0).contains(&back.angle));
        }
    }

    #[test]
    fn to_axis_angle_near_identity() {
        let back = to_axis_angle(Quat::IDENTITY);
        assert_eq!(back, AxisAngle::new(1.0, 0.0, 0.0, 0.0));
        let back = to_axis_angle(Quat::from_xyzw(0.0, 0.0, 0.0, -1.0));
        assert_eq!(back.angle, 0.0);
        assert!(!back.x.is_nan());
    }

    #[test]
    fn to_axis_angle_near_negative_identity_stays_below_full_turn() {
        let samples = [
            Quat::from_xyzw(1e-7, 0.0, 0.0, -1.0),
            Quat::from_xyzw(0.0, -3e-7, 0.0, -1.0),
            Quat::from_xyzw(0.0, 0.0, 1e-3, -1.0),
        ];
        for q in samples {
            let back = to_axis_angle(q);
            assert!(
                (0.0..360.0).contains(&back.angle),
                "angle {} outside [0, 360) for {q:?}",
                back.angle
            );
            assert!(
                same_rotation(back.to_quat(), normalize(q)),
                "wrapped angle changed rotation for {q:?}"
            );
        }
    }

    #[test]
    fn matrix_rotates_points() {
        let q = from_axis_angle(0.0, 0.0, 1.0, 45.0);
        let q = multiply(from_axis_angle(1.0, 0.0, 0.0, 20.0), q);
        let expected =
            Mat4::from_rotation_x(20_f32.to_radians()) * Mat4::from_rotation_z(45_f32.to_radians());
        let p = to_matrix(q).transform_point3(Vec3::Y);
        assert!(p.abs_diff_eq(expected.transform_point3(Vec3::Y), TOL));
    }
}
