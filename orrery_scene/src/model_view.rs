// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model-view state: the ambient transform seen by the node currently being rendered.

use glam::Mat4;

/// The ambient model-view transform.
///
/// `fixed` is `true` when the matrix is guaranteed to be identical on every traversal, which is
/// what lets descendants cache their composed transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelTransform {
    /// Local-to-eye matrix.
    pub matrix: Mat4,
    /// Whether the matrix is the same on every traversal.
    pub fixed: bool,
}

impl ModelTransform {
    /// Identity, fixed.
    pub const IDENTITY: Self = Self::fixed(Mat4::IDENTITY);

    /// A transform that does not change between traversals.
    pub const fn fixed(matrix: Mat4) -> Self {
        Self {
            matrix,
            fixed: true,
        }
    }

    /// A transform that may change between traversals.
    pub const fn dynamic(matrix: Mat4) -> Self {
        Self {
            matrix,
            fixed: false,
        }
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The transform a node composed on its most recent visit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CachedTransform {
    /// The node's own matrix.
    pub local_matrix: Mat4,
    /// `ambient * local_matrix`.
    pub matrix: Mat4,
    /// Whether the result is the same on every traversal.
    pub fixed: bool,
}

impl CachedTransform {
    /// The ambient transform this node publishes to its children.
    pub fn model(&self) -> ModelTransform {
        ModelTransform {
            matrix: self.matrix,
            fixed: self.fixed,
        }
    }
}

/// Current model-view transform of one traversal.
///
/// There is no explicit stack: each scope saves the value it replaces and restores it on exit
/// (see [`RenderContext::scoped_transform`](crate::RenderContext::scoped_transform)).
#[derive(Clone, Debug, Default)]
pub struct ModelView {
    current: ModelTransform,
    depth: usize,
}

impl ModelView {
    /// Start from `root` (typically the camera's view matrix).
    pub fn new(root: ModelTransform) -> Self {
        Self {
            current: root,
            depth: 0,
        }
    }

    /// The active transform.
    pub fn get_transform(&self) -> ModelTransform {
        self.current
    }

    /// Replace the active transform.
    pub fn set_transform(&mut self, transform: ModelTransform) {
        self.current = transform;
    }

    /// Number of transform scopes currently entered.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter(&mut self, transform: ModelTransform) -> ModelTransform {
        self.depth += 1;
        core::mem::replace(&mut self.current, transform)
    }

    pub(crate) fn leave(&mut self, saved: ModelTransform) {
        debug_assert!(self.depth > 0, "unbalanced model-view scope");
        self.depth = self.depth.saturating_sub(1);
        self.current = saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn enter_and_leave_restore() {
        let root = ModelTransform::fixed(Mat4::from_translation(Vec3::Z));
        let mut mv = ModelView::new(root);
        let inner = ModelTransform::dynamic(Mat4::from_scale(Vec3::splat(2.0)));

        let saved = mv.enter(inner);
        assert_eq!(saved, root);
        assert_eq!(mv.get_transform(), inner);
        assert_eq!(mv.depth(), 1);

        mv.leave(saved);
        assert_eq!(mv.get_transform(), root);
        assert_eq!(mv.depth(), 0);
    }

    #[test]
    fn cached_transform_publishes_matrix_and_fixed() {
        let cached = CachedTransform {
            local_matrix: Mat4::from_translation(Vec3::X),
            matrix: Mat4::from_translation(Vec3::new(1.0, 2.0, 0.0)),
            fixed: false,
        };
        assert_eq!(
            cached.model(),
            ModelTransform::dynamic(Mat4::from_translation(Vec3::new(1.0, 2.0, 0.0)))
        );
    }
}
