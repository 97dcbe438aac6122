// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render context threaded through one traversal, and its scoped guards.

use alloc::rc::Rc;
use core::ops::{Deref, DerefMut};

use crate::data::{DataScope, TraversalData};
use crate::draw::{DrawCall, DrawSink};
use crate::model_view::{ModelTransform, ModelView};
use crate::types::{GeometryId, NodeId};

/// Per-traversal state: model-view transform, instancing depth, traversal data, and the draw sink.
///
/// A context is exclusively borrowed by the traversal that uses it and is neither `Send` nor
/// `Sync`, so two traversals can never observe each other's model-view state. State changes made
/// on behalf of a subtree go through the `scoped_*` methods, whose guards restore the previous
/// state when dropped, on every exit path.
pub struct RenderContext<'a> {
    model_view: ModelView,
    instance_depth: u32,
    data: TraversalData,
    sink: &'a mut dyn DrawSink,
}

impl core::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderContext")
            .field("model_view", &self.model_view)
            .field("instance_depth", &self.instance_depth)
            .field("data_depth", &self.data.depth())
            .finish_non_exhaustive()
    }
}

impl<'a> RenderContext<'a> {
    /// Create a context with an identity, fixed root transform and no traversal data.
    pub fn new(sink: &'a mut dyn DrawSink) -> Self {
        Self {
            model_view: ModelView::default(),
            instance_depth: 0,
            data: TraversalData::new(),
            sink,
        }
    }

    /// Use `root` as the outermost ambient transform.
    pub fn with_root_transform(mut self, root: ModelTransform) -> Self {
        self.model_view = ModelView::new(root);
        self
    }

    /// Use `data` as the outermost traversal data.
    pub fn with_data(mut self, data: TraversalData) -> Self {
        self.data = data;
        self
    }

    /// The active model-view transform.
    pub fn get_transform(&self) -> ModelTransform {
        self.model_view.get_transform()
    }

    /// Replace the active model-view transform.
    ///
    /// Prefer [`scoped_transform`](Self::scoped_transform), which restores the previous value.
    pub fn set_transform(&mut self, transform: ModelTransform) {
        self.model_view.set_transform(transform);
    }

    /// Model-view state.
    pub fn model_view(&self) -> &ModelView {
        &self.model_view
    }

    /// Whether the traversal is currently inside an instanced subtree.
    pub fn instancing(&self) -> bool {
        self.instance_depth > 0
    }

    /// Number of instances the traversal is currently nested in.
    pub fn instance_depth(&self) -> u32 {
        self.instance_depth
    }

    /// Traversal data visible at this point.
    pub fn data(&self) -> &TraversalData {
        &self.data
    }

    /// Emit a draw call for `geometry` with the active transform.
    pub fn draw(&mut self, node: NodeId, geometry: GeometryId) {
        let transform = self.get_transform();
        self.sink.draw(DrawCall {
            node,
            geometry,
            transform,
        });
    }

    /// Install `transform` until the returned guard is dropped.
    pub fn scoped_transform(&mut self, transform: ModelTransform) -> TransformScope<'_, 'a> {
        let saved = self.model_view.enter(transform);
        TransformScope { ctx: self, saved }
    }

    /// Mark the traversal as instanced until the returned guard is dropped.
    pub fn scoped_instance(&mut self) -> InstanceScope<'_, 'a> {
        self.instance_depth += 1;
        InstanceScope { ctx: self }
    }

    /// Layer `scope` over the traversal data until the returned guard is dropped.
    pub fn scoped_data(&mut self, scope: Rc<DataScope>) -> DataGuard<'_, 'a> {
        self.data.push(scope);
        DataGuard { ctx: self }
    }
}

/// Restores the previous model-view transform on drop.
#[derive(Debug)]
pub struct TransformScope<'c, 'a> {
    ctx: &'c mut RenderContext<'a>,
    saved: ModelTransform,
}

impl<'a> Deref for TransformScope<'_, 'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for TransformScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for TransformScope<'_, '_> {
    fn drop(&mut self) {
        self.ctx.model_view.leave(self.saved);
    }
}

/// Leaves one level of instancing on drop.
#[derive(Debug)]
pub struct InstanceScope<'c, 'a> {
    ctx: &'c mut RenderContext<'a>,
}

impl<'a> Deref for InstanceScope<'_, 'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for InstanceScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for InstanceScope<'_, '_> {
    fn drop(&mut self) {
        self.ctx.instance_depth = self.ctx.instance_depth.saturating_sub(1);
    }
}

/// Pops one traversal data scope on drop.
#[derive(Debug)]
pub struct DataGuard<'c, 'a> {
    ctx: &'c mut RenderContext<'a>,
}

impl<'a> Deref for DataGuard<'_, 'a> {
    type Target = RenderContext<'a>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for DataGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for DataGuard<'_, '_> {
    fn drop(&mut self) {
        self.ctx.data.pop();
    }
}
