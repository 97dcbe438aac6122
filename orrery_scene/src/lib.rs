// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orrery Scene: memoized transform nodes for retained-mode scene graphs.
//!
//! A traversal walks the scene top-down. At each transform node it composes the node's local
//! matrix with the ambient model-view transform, publishes the result for the node's children,
//! and restores the ambient transform on the way back up. Nodes cache their matrices across
//! traversals so that static parts of the scene are not recomputed every frame.
//!
//! - [`Scene`]: generational arena of nodes, and traversal.
//! - [`TransformNode`]: a [`Transform`] (translate, scale, rotate, or quaternion) with its
//!   [`ConfigSource`] and memoized matrices. See [`MemoLevel`] for the caching tiers.
//! - [`RenderContext`]: the per-traversal state (model-view transform, instancing depth,
//!   [`TraversalData`], [`DrawSink`]). State changes are scoped and undone on every exit path,
//!   including errors.
//!
//! ## Caching
//!
//! A transform node moves between three [`MemoLevel`]s:
//!
//! - [`MemoLevel::Dirty`]: the local matrix must be recomputed. Dynamic nodes are dirty at the
//!   start of every visit; mutators such as [`QuaternionNode::rotate`] also make a node dirty.
//! - [`MemoLevel::LocallyFixed`]: the local matrix is valid; the composed matrix is recomputed on
//!   each visit.
//! - [`MemoLevel::FullyFixed`]: reached when the node's configuration is static, the ambient
//!   transform is fixed, and instancing is inactive. The composed matrix is then reused verbatim
//!   for as long as the ambient matrix stays bit-identical and the node is not reached through an
//!   instance.
//!
//! Inside an instanced subtree a node never goes past [`MemoLevel::LocallyFixed`], because the
//! same node is rendered under a different ambient transform at each instantiation.
//!
//! ## Example
//!
//! ```rust
//! use glam::Vec3;
//! use orrery_scene::{
//!     DataScope, DrawCall, GeometryId, NodeKind, QuaternionNode, RenderContext, Scene,
//!     TranslateConfig, TranslateNode, TraversalData,
//! };
//!
//! let mut scene = Scene::new();
//!
//! // A shared arm, rendered only through instances.
//! let arm = scene.insert(None, NodeKind::Symbol);
//! let joint = scene.insert(Some(arm), QuaternionNode::from_data());
//! scene.insert(Some(joint), GeometryId(7));
//!
//! // Two placements of the arm.
//! for x in [-2.0, 2.0] {
//!     let place = scene.insert(None, TranslateNode::fixed(TranslateConfig { x, y: 0.0, z: 0.0 }));
//!     scene.insert(Some(place), NodeKind::Instance(arm));
//! }
//!
//! let data = TraversalData::from_scope(DataScope::new().with("z", 1.0).with("angle", 90.0));
//! let mut calls: Vec<DrawCall> = Vec::new();
//! let mut ctx = RenderContext::new(&mut calls).with_data(data);
//! scene.render(&mut ctx).unwrap();
//! drop(ctx);
//!
//! assert_eq!(calls.len(), 2);
//! let tip = calls[0].transform.matrix.transform_point3(Vec3::X);
//! assert!(tip.abs_diff_eq(Vec3::new(-2.0, 1.0, 0.0), 1e-5));
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `glam/std`.
//! - `libm`: `no_std` math support via `glam/libm`.
//! - `serde`: derives `Serialize`/`Deserialize` for configuration records.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context;
mod data;
mod draw;
mod error;
mod memo;
mod model_view;
mod scene;
mod transform;
mod types;

pub use config::{
    ConfigSource, DynamicConfig, FromData, QuaternionConfig, ScaleConfig, TranslateConfig,
};
pub use context::{DataGuard, InstanceScope, RenderContext, TransformScope};
pub use data::{DataScope, TraversalData, Value};
pub use draw::{DrawCall, DrawSink};
pub use error::{ConfigError, RenderError};
pub use memo::MemoLevel;
pub use model_view::{CachedTransform, ModelTransform, ModelView};
pub use scene::{MAX_INSTANCE_DEPTH, Scene};
pub use transform::{
    QuaternionNode, QuaternionRotation, Rotate, RotateNode, Scale, ScaleNode, SpatialNode,
    Transform, TransformNode, Translate, TranslateNode,
};
pub use types::{GeometryId, NodeFlags, NodeId, NodeKind, TransformKind};

pub use orrery_rotation::AxisAngle;
