// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-angle rotation record.

use glam::{Quat, Vec3};

use crate::quat::{NORM_EPSILON, from_axis_angle, to_axis_angle};

/// A rotation of `angle` degrees about the axis `(x, y, z)`.
///
/// The axis does not need to be unit length. All fields default to zero, which describes the
/// identity rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisAngle {
    /// Axis X component.
    pub x: f32,
    /// Axis Y component.
    pub y: f32,
    /// Axis Z component.
    pub z: f32,
    /// Rotation angle in degrees.
    pub angle: f32,
}

impl AxisAngle {
    /// The all-zero record (identity rotation).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new axis-angle record.
    pub const fn new(x: f32, y: f32, z: f32, angle: f32) -> Self {
        Self { x, y, z, angle }
    }

    /// The rotation axis as a vector (not normalized).
    pub fn axis(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Returns `true` if this record asks for a non-zero rotation about an axis that cannot be
    /// normalized (zero length or non-finite).
    ///
    /// Such input is still accepted everywhere; it is treated as the identity rotation.
    pub fn is_degenerate(&self) -> bool {
        if self.angle == 0.0 {
            return false;
        }
        let len = self.axis().length();
        !self.angle.is_finite() || !len.is_finite() || len < NORM_EPSILON
    }

    /// Convert to a unit quaternion. See [`from_axis_angle`].
    pub fn to_quat(&self) -> Quat {
        from_axis_angle(self.x, self.y, self.z, self.angle)
    }

    /// Recover an axis-angle record from a quaternion. See [`to_axis_angle`].
    pub fn from_quat(q: Quat) -> Self {
        to_axis_angle(q)
    }
}

impl From<AxisAngle> for Quat {
    fn from(value: AxisAngle) -> Self {
        value.to_quat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero_and_identity() {
        assert_eq!(AxisAngle::default(), AxisAngle::ZERO);
        assert_eq!(AxisAngle::ZERO.to_quat(), Quat::IDENTITY);
        assert!(!AxisAngle::ZERO.is_degenerate());
    }

    #[test]
    fn degenerate_detection() {
        assert!(AxisAngle::new(0.0, 0.0, 0.0, 45.0).is_degenerate());
        assert!(AxisAngle::new(f32::NAN, 0.0, 1.0, 45.0).is_degenerate());
        assert!(AxisAngle::new(0.0, 1.0, 0.0, f32::INFINITY).is_degenerate());
        assert!(!AxisAngle::new(0.0, 3.0, 0.0, 45.0).is_degenerate());
        // A zero angle is a valid identity rotation whatever the axis.
        assert!(!AxisAngle::new(0.0, 0.0, 0.0, 0.0).is_degenerate());
    }

    #[test]
    fn into_quat_matches_to_quat() {
        let aa = AxisAngle::new(1.0, 2.0, 3.0, 33.0);
        let q: Quat = aa.into();
        assert_eq!(q, aa.to_quat());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_defaults_missing_fields_to_zero() {
        let aa: AxisAngle = serde_json::from_str(r#"{"y": 1.0, "angle": 90.0}"#).unwrap();
        assert_eq!(aa, AxisAngle::new(0.0, 1.0, 0.0, 90.0));

        let empty: AxisAngle = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, AxisAngle::ZERO);

        let json = serde_json::to_string(&aa).unwrap();
        assert_eq!(serde_json::from_str::<AxisAngle>(&json).unwrap(), aa);
    }
}
