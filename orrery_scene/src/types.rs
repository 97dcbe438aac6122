// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, and node kinds.

use alloc::rc::Rc;

use crate::data::DataScope;
use crate::transform::{QuaternionNode, RotateNode, ScaleNode, SpatialNode, TranslateNode};

/// Identifier for a node in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Handle to geometry owned by the rendering backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GeometryId(pub u32);

bitflags::bitflags! {
    /// Node flags controlling traversal.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are rendered.
        const VISIBLE = 0b0000_0001;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// A spatial transform node of any supported kind.
#[derive(Debug)]
pub enum TransformKind {
    /// Translation.
    Translate(TranslateNode),
    /// Non-uniform scale.
    Scale(ScaleNode),
    /// Rotation about a single axis.
    Rotate(RotateNode),
    /// Accumulated quaternion rotation.
    Quaternion(QuaternionNode),
}

impl TransformKind {
    /// Shared view of the node's memoized render steps.
    pub fn as_spatial(&self) -> &dyn SpatialNode {
        match self {
            Self::Translate(n) => n,
            Self::Scale(n) => n,
            Self::Rotate(n) => n,
            Self::Quaternion(n) => n,
        }
    }

    /// Mutable view of the node's memoized render steps.
    pub fn as_spatial_mut(&mut self) -> &mut dyn SpatialNode {
        match self {
            Self::Translate(n) => n,
            Self::Scale(n) => n,
            Self::Rotate(n) => n,
            Self::Quaternion(n) => n,
        }
    }
}

/// What a node does when it is visited.
#[derive(Debug)]
pub enum NodeKind {
    /// Renders its children.
    Group,
    /// Composes a local transform with the ambient model-view transform for its children.
    Transform(TransformKind),
    /// A subtree that is skipped by normal traversal and only rendered through instances.
    Symbol,
    /// Renders another node's subtree in place. When the target is a [`NodeKind::Symbol`], its
    /// children are rendered. Instance nodes do not render their own children.
    Instance(NodeId),
    /// Layers key/value data over the traversal data for its subtree.
    Data(Rc<DataScope>),
    /// Leaf that emits a draw call with the ambient model-view transform, then renders its
    /// children.
    Geometry(GeometryId),
}

impl From<TransformKind> for NodeKind {
    fn from(value: TransformKind) -> Self {
        Self::Transform(value)
    }
}

impl From<TranslateNode> for NodeKind {
    fn from(value: TranslateNode) -> Self {
        Self::Transform(TransformKind::Translate(value))
    }
}

impl From<ScaleNode> for NodeKind {
    fn from(value: ScaleNode) -> Self {
        Self::Transform(TransformKind::Scale(value))
    }
}

impl From<RotateNode> for NodeKind {
    fn from(value: RotateNode) -> Self {
        Self::Transform(TransformKind::Rotate(value))
    }
}

impl From<QuaternionNode> for NodeKind {
    fn from(value: QuaternionNode) -> Self {
        Self::Transform(TransformKind::Quaternion(value))
    }
}

impl From<DataScope> for NodeKind {
    fn from(value: DataScope) -> Self {
        Self::Data(Rc::new(value))
    }
}

impl From<GeometryId> for NodeKind {
    fn from(value: GeometryId) -> Self {
        Self::Geometry(value)
    }
}
