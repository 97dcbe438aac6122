// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform nodes: local transforms wrapped with configuration and memoization.

use core::fmt::Debug;

use glam::{Mat4, Quat, Vec3};
use orrery_rotation::{AxisAngle, from_axis_angle, multiply, normalize, to_axis_angle, to_matrix};

use crate::config::{ConfigSource, FromData, QuaternionConfig, ScaleConfig, TranslateConfig};
use crate::data::TraversalData;
use crate::error::ConfigError;
use crate::memo::{MemoLevel, TransformMemo};
use crate::model_view::{CachedTransform, ModelTransform};

/// A local spatial transform that can be configured and turned into a matrix.
pub trait Transform: Default + Debug {
    /// Configuration record applied to this transform.
    type Config: Debug;

    /// Build a transform from `config`.
    fn from_config(config: &Self::Config) -> Self {
        let mut transform = Self::default();
        transform.apply(config);
        transform
    }

    /// Replace this transform's state with `config`.
    fn apply(&mut self, config: &Self::Config);

    /// The transform as a matrix relative to the parent space.
    fn local_matrix(&self) -> Mat4;
}

/// The per-visit render steps of a transform node, independent of its kind.
///
/// A traversal calls [`prepare`](Self::prepare), then [`compose`](Self::compose), publishes the
/// result for the node's children, and restores the ambient transform afterwards.
pub trait SpatialNode: Debug {
    /// Re-evaluate dynamic configuration and refresh the local matrix if it is stale.
    fn prepare(&mut self, data: &TraversalData) -> Result<(), ConfigError>;

    /// Compose the local matrix with `ambient`, using the memoized result where valid.
    fn compose(&mut self, ambient: ModelTransform, instancing: bool) -> ModelTransform;

    /// Current memoization level.
    fn memo_level(&self) -> MemoLevel;

    /// Transform composed on the most recent visit, if any.
    fn cached(&self) -> Option<&CachedTransform>;
}

/// A transform of kind `T` with its configuration source and memoized matrices.
#[derive(Debug)]
pub struct TransformNode<T: Transform> {
    transform: T,
    source: ConfigSource<T::Config>,
    memo: TransformMemo,
}

/// Translate node.
pub type TranslateNode = TransformNode<Translate>;
/// Scale node.
pub type ScaleNode = TransformNode<Scale>;
/// Axis-angle rotate node.
pub type RotateNode = TransformNode<Rotate>;
/// Quaternion rotation node.
pub type QuaternionNode = TransformNode<QuaternionRotation>;

impl<T: Transform> TransformNode<T> {
    /// Create a node from a configuration source.
    ///
    /// A static configuration is applied immediately and the node starts at
    /// [`MemoLevel::LocallyFixed`]. A dynamic one is evaluated on every visit.
    pub fn new(source: ConfigSource<T::Config>) -> Self {
        let mut memo = TransformMemo::new();
        let transform = match &source {
            ConfigSource::Static(config) => {
                let transform = T::from_config(config);
                memo.refresh_local(transform.local_matrix());
                transform
            }
            ConfigSource::Dynamic(_) => T::default(),
        };
        Self {
            transform,
            source,
            memo,
        }
    }

    /// Create a node with a static configuration.
    pub fn fixed(config: T::Config) -> Self {
        Self::new(ConfigSource::Static(config))
    }

    /// Create a node whose configuration is computed from traversal data on every visit.
    pub fn dynamic(f: impl Fn(&TraversalData) -> Result<T::Config, ConfigError> + 'static) -> Self {
        Self::new(ConfigSource::dynamic(f))
    }

    /// Create a node that reads its configuration fields from traversal data on every visit.
    pub fn from_data() -> Self
    where
        T::Config: FromData + 'static,
    {
        Self::new(ConfigSource::from_data())
    }

    /// Whether the configuration is static.
    pub fn has_fixed_params(&self) -> bool {
        self.source.is_static()
    }

    /// The configuration source.
    pub fn source(&self) -> &ConfigSource<T::Config> {
        &self.source
    }

    /// Current memoization level.
    pub fn memo_level(&self) -> MemoLevel {
        self.memo.level()
    }

    /// Transform composed on the most recent visit, if any.
    pub fn cached(&self) -> Option<&CachedTransform> {
        self.memo.cached()
    }

    /// The transform state.
    pub fn get(&self) -> &T {
        &self.transform
    }

    /// Mutate the transform state and invalidate the memoized matrices.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.transform);
        self.memo.invalidate();
    }

    /// The local matrix, from the memo when valid.
    pub fn local_matrix(&self) -> Mat4 {
        self.memo
            .local_matrix()
            .unwrap_or_else(|| self.transform.local_matrix())
    }
}

impl<T: Transform> SpatialNode for TransformNode<T> {
    fn prepare(&mut self, data: &TraversalData) -> Result<(), ConfigError> {
        if let ConfigSource::Dynamic(config_fn) = &self.source {
            self.memo.invalidate();
            let config = config_fn(data)?;
            self.transform.apply(&config);
        }
        if self.memo.level() == MemoLevel::Dirty {
            self.memo.refresh_local(self.transform.local_matrix());
        }
        Ok(())
    }

    fn compose(&mut self, ambient: ModelTransform, instancing: bool) -> ModelTransform {
        self.memo
            .compose(ambient, self.source.is_static(), instancing)
    }

    fn memo_level(&self) -> MemoLevel {
        self.memo.level()
    }

    fn cached(&self) -> Option<&CachedTransform> {
        self.memo.cached()
    }
}

/// Translation by an offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translate {
    /// Offset in parent space.
    pub offset: Vec3,
}

impl Transform for Translate {
    type Config = TranslateConfig;

    fn apply(&mut self, config: &Self::Config) {
        self.offset = Vec3::new(config.x, config.y, config.z);
    }

    fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset)
    }
}

/// Non-uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Per-axis factors.
    pub factors: Vec3,
}

impl Default for Scale {
    fn default() -> Self {
        Self { factors: Vec3::ONE }
    }
}

impl Transform for Scale {
    type Config = ScaleConfig;

    fn apply(&mut self, config: &Self::Config) {
        self.factors = Vec3::new(config.x, config.y, config.z);
    }

    fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.factors)
    }
}

/// Rotation about one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotate {
    /// Axis and angle in degrees.
    pub rotation: AxisAngle,
}

impl Transform for Rotate {
    type Config = AxisAngle;

    fn apply(&mut self, config: &Self::Config) {
        self.rotation = *config;
    }

    fn local_matrix(&self) -> Mat4 {
        to_matrix(self.rotation.to_quat())
    }
}

/// An accumulated rotation held as a unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuaternionRotation {
    q: Quat,
}

impl Default for QuaternionRotation {
    fn default() -> Self {
        Self { q: Quat::IDENTITY }
    }
}

impl QuaternionRotation {
    /// The current quaternion.
    pub fn quat(&self) -> Quat {
        self.q
    }

    /// Replace the rotation.
    pub fn set_rotation(&mut self, rotation: AxisAngle) {
        self.q = rotation.to_quat();
    }

    /// Apply `rotation` on top of the current rotation.
    ///
    /// The new rotation is left-multiplied, so it acts after everything accumulated so far.
    pub fn rotate(&mut self, rotation: AxisAngle) {
        let r = from_axis_angle(rotation.x, rotation.y, rotation.z, rotation.angle);
        self.q = normalize(multiply(r, self.q));
    }

    /// Rescale the quaternion to unit length.
    pub fn normalize(&mut self) {
        self.q = normalize(self.q);
    }

    /// The rotation in axis-angle form.
    pub fn rotation(&self) -> AxisAngle {
        to_axis_angle(self.q)
    }
}

impl Transform for QuaternionRotation {
    type Config = QuaternionConfig;

    fn apply(&mut self, config: &Self::Config) {
        self.set_rotation(config.base());
        for rotation in &config.rotations {
            self.rotate(*rotation);
        }
    }

    fn local_matrix(&self) -> Mat4 {
        to_matrix(self.q)
    }
}

impl TransformNode<QuaternionRotation> {
    /// Replace the rotation. Absent fields are zero, so an all-default record is the identity.
    pub fn set_rotation(&mut self, rotation: AxisAngle) {
        self.update(|t| t.set_rotation(rotation));
    }

    /// Accumulate `rotation` on top of the current rotation.
    pub fn rotate(&mut self, rotation: AxisAngle) {
        self.update(|t| t.rotate(rotation));
    }

    /// Rescale the quaternion to unit length.
    pub fn normalize(&mut self) {
        self.update(QuaternionRotation::normalize);
    }

    /// The rotation in axis-angle form.
    pub fn rotation(&self) -> AxisAngle {
        self.transform.rotation()
    }

    /// The rotation matrix.
    pub fn matrix(&self) -> Mat4 {
        self.local_matrix()
    }
}
