// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw calls emitted by traversal.

use alloc::vec::Vec;

use crate::model_view::ModelTransform;
use crate::types::{GeometryId, NodeId};

/// A request to draw `geometry` with `transform`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    /// The geometry node that emitted the call.
    pub node: NodeId,
    /// Backend geometry handle.
    pub geometry: GeometryId,
    /// Model-view transform active at the geometry node.
    pub transform: ModelTransform,
}

/// Receiver of draw calls; the rendering backend implements this.
pub trait DrawSink {
    /// Record one draw call.
    fn draw(&mut self, call: DrawCall);
}

impl DrawSink for Vec<DrawCall> {
    fn draw(&mut self, call: DrawCall) {
        self.push(call);
    }
}
