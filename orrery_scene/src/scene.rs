// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene arena: structure, node access, and traversal.

use alloc::rc::Rc;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::memo::MemoLevel;
use crate::model_view::CachedTransform;
use crate::transform::QuaternionNode;
use crate::types::{NodeFlags, NodeId, NodeKind, TransformKind};

/// Maximum number of nested instances in one traversal path.
///
/// An instance that reaches itself (directly or through other instances) fails with
/// [`RenderError::InstanceDepthExceeded`] once this depth is exceeded.
pub const MAX_INSTANCE_DEPTH: u32 = 32;

/// A retained scene graph.
///
/// Nodes live in a generational arena; removing a node makes its [`NodeId`] stale. Structure is a
/// tree of parent/child links, and [`NodeKind::Instance`] nodes additionally reference other
/// subtrees, which turns rendering into a walk over a DAG.
///
/// ## Example
///
/// ```rust
/// use orrery_rotation::AxisAngle;
/// use orrery_scene::{
///     DrawCall, GeometryId, MemoLevel, NodeKind, QuaternionConfig, QuaternionNode,
///     RenderContext, Scene,
/// };
///
/// let mut scene = Scene::new();
/// let spin = scene.insert(
///     None,
///     QuaternionNode::fixed(QuaternionConfig::new(AxisAngle::new(0.0, 1.0, 0.0, 90.0))),
/// );
/// scene.insert(Some(spin), NodeKind::Geometry(GeometryId(0)));
///
/// let mut calls: Vec<DrawCall> = Vec::new();
/// let mut ctx = RenderContext::new(&mut calls);
/// scene.render(&mut ctx).unwrap();
/// scene.render(&mut ctx).unwrap();
/// drop(ctx);
///
/// assert_eq!(scene.memo_level(spin), Some(MemoLevel::FullyFixed));
/// assert_eq!(calls.len(), 2);
/// assert_eq!(calls[0].transform, calls[1].transform);
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    flags: NodeFlags,
}

impl Node {
    fn new(generation: u32, kind: NodeKind) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            kind,
            flags: NodeFlags::default(),
        }
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` is ignored and the node is inserted as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, kind: impl Into<NodeKind>) -> NodeId {
        let kind = kind.into();
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree.
    ///
    /// Instances that target a removed node fail with [`RenderError::StaleNode`] when rendered.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (or make it a root).
    ///
    /// Cached transforms below `id` are revalidated against their new ambient transform on the
    /// next visit. A stale `new_parent` makes `id` a root. Moving `id` under itself or one of its
    /// descendants would create a cycle and leaves the scene unchanged.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && self.is_ancestor_or_self(id, p)
        {
            log::debug!("ignoring reparent of {id:?} into its own subtree at {p:?}");
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|node| node.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |node| &node.children)
    }

    /// Live root nodes in slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for (i, slot) in self.nodes.iter().enumerate() {
            if let Some(n) = slot
                && n.parent.is_none()
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId stores 32-bit slot indices."
                )]
                roots.push(NodeId::new(i as u32, n.generation));
            }
        }
        roots
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|node| node.flags)
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    /// The node's kind, if live.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node_opt(id).map(|node| &node.kind)
    }

    /// The node's kind, mutably, if live.
    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.node_opt_mut(id).map(|node| &mut node.kind)
    }

    /// The transform held by a live transform node.
    pub fn transform(&self, id: NodeId) -> Option<&TransformKind> {
        match self.kind(id)? {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// The transform held by a live transform node, mutably.
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut TransformKind> {
        match self.kind_mut(id)? {
            NodeKind::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// The quaternion node at `id`, if it is one.
    pub fn quaternion(&self, id: NodeId) -> Option<&QuaternionNode> {
        match self.transform(id)? {
            TransformKind::Quaternion(q) => Some(q),
            _ => None,
        }
    }

    /// The quaternion node at `id`, mutably, if it is one.
    pub fn quaternion_mut(&mut self, id: NodeId) -> Option<&mut QuaternionNode> {
        match self.transform_mut(id)? {
            TransformKind::Quaternion(q) => Some(q),
            _ => None,
        }
    }

    /// Memoization level of a transform node.
    pub fn memo_level(&self, id: NodeId) -> Option<MemoLevel> {
        self.transform(id).map(|t| t.as_spatial().memo_level())
    }

    /// Transform a transform node composed on its most recent visit.
    pub fn cached_transform(&self, id: NodeId) -> Option<&CachedTransform> {
        self.transform(id).and_then(|t| t.as_spatial().cached())
    }

    /// Number of completed or attempted [`Scene::render`] calls.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Render every root, in slot order.
    ///
    /// On error the traversal stops; `ctx` is left exactly as it was before the call.
    pub fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        self.epoch += 1;
        log::trace!("render pass {}", self.epoch);
        for root in self.roots() {
            self.render_node(root, ctx).inspect_err(|err| {
                log::debug!("render pass {} aborted: {err}", self.epoch);
            })?;
        }
        Ok(())
    }

    /// Render the subtree rooted at `root`.
    pub fn render_subtree(
        &mut self,
        root: NodeId,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.render_node(root, ctx)
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    // Walks up from `node` towards the root.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent_of(n);
        }
        false
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn render_node(&mut self, id: NodeId, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        let node = self.node_opt_mut(id).ok_or(RenderError::StaleNode(id))?;
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return Ok(());
        }
        match &mut node.kind {
            NodeKind::Group => self.render_children(id, ctx),
            NodeKind::Symbol => Ok(()),
            NodeKind::Transform(transform) => {
                let spatial = transform.as_spatial_mut();
                spatial
                    .prepare(ctx.data())
                    .map_err(|source| RenderError::Config { node: id, source })?;
                let composed = spatial.compose(ctx.get_transform(), ctx.instancing());
                let mut scope = ctx.scoped_transform(composed);
                self.render_children(id, &mut scope)
            }
            NodeKind::Instance(target) => {
                let target = *target;
                if ctx.instance_depth() >= MAX_INSTANCE_DEPTH {
                    return Err(RenderError::InstanceDepthExceeded {
                        node: id,
                        limit: MAX_INSTANCE_DEPTH,
                    });
                }
                let mut scope = ctx.scoped_instance();
                self.render_instance_target(target, &mut scope)
            }
            NodeKind::Data(data) => {
                let data = Rc::clone(data);
                let mut scope = ctx.scoped_data(data);
                self.render_children(id, &mut scope)
            }
            NodeKind::Geometry(geometry) => {
                let geometry = *geometry;
                ctx.draw(id, geometry);
                self.render_children(id, ctx)
            }
        }
    }

    fn render_instance_target(
        &mut self,
        target: NodeId,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let node = self
            .node_opt(target)
            .ok_or(RenderError::StaleNode(target))?;
        if matches!(node.kind, NodeKind::Symbol) {
            if !node.flags.contains(NodeFlags::VISIBLE) {
                return Ok(());
            }
            self.render_children(target, ctx)
        } else {
            self.render_node(target, ctx)
        }
    }

    fn render_children(
        &mut self,
        id: NodeId,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let children: SmallVec<[NodeId; 8]> = self.children_of(id).iter().copied().collect();
        for child in children {
            self.render_node(child, ctx)?;
        }
        Ok(())
    }
}
