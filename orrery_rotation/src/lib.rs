// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orrery Rotation: quaternion helpers for scene-graph transform nodes.
//!
//! This crate is the leaf of the Orrery workspace. It wraps [`glam::Quat`] with the handful of
//! operations a retained-mode transform node needs, with the edge cases pinned down:
//!
//! - Axis-angle input is expressed in **degrees** and the axis may have any non-zero length.
//! - A zero-length axis, a zero angle, or non-finite input yields the identity rotation instead
//!   of NaNs. A NaN rotation would poison every matrix composed below it.
//! - [`normalize`] is fail-safe: near-zero quaternions collapse to identity.
//! - [`multiply`] composes in "apply `b` first, then `a`" order, which is the order used when a
//!   node accumulates a new rotation on top of its current one.
//!
//! ## Example
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use orrery_rotation::{AxisAngle, from_axis_angle, multiply, to_matrix};
//!
//! // Rotate 45° about Z, then 20° about X.
//! let z = from_axis_angle(0.0, 0.0, 1.0, 45.0);
//! let x = AxisAngle::new(1.0, 0.0, 0.0, 20.0).to_quat();
//! let q = multiply(x, z);
//!
//! let expected = Mat4::from_rotation_x(20_f32.to_radians())
//!     * Mat4::from_rotation_z(45_f32.to_radians());
//! let p = to_matrix(q).transform_point3(Vec3::Y);
//! assert!(p.abs_diff_eq(expected.transform_point3(Vec3::Y), 1e-5));
//!
//! // Degenerate input degrades to identity.
//! assert_eq!(from_axis_angle(0.0, 0.0, 0.0, 45.0), orrery_rotation::identity());
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `glam/std`.
//! - `libm`: forwards to `glam/libm` for `no_std` targets.
//! - `serde`: derives `Serialize`/`Deserialize` for [`AxisAngle`].
//!
//! This crate is `no_std`.

#![no_std]

mod axis_angle;
mod quat;

pub use axis_angle::AxisAngle;
pub use quat::{
    NORM_EPSILON, from_axis_angle, identity, multiply, normalize, to_axis_angle, to_matrix,
};

pub use glam::{Mat4, Quat};
