// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for configuration and traversal.

use alloc::string::String;

use crate::types::NodeId;

/// A configuration value could not be applied to a node.
///
/// Absent fields fall back to their documented defaults; only present fields of the wrong type
/// produce this error.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A traversal data entry had an unexpected type.
    #[error("`{key}` should be {expected}, found {found}")]
    WrongType {
        /// Lookup key.
        key: String,
        /// Expected kind of value.
        expected: &'static str,
        /// Kind of value that was found.
        found: &'static str,
    },
}

/// A traversal failed.
///
/// The model-view state of the [`RenderContext`](crate::RenderContext) is restored at every
/// level before the error reaches the caller.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// A node identifier (a child, a root, or an instance target) is no longer live.
    #[error("node {0:?} is not live")]
    StaleNode(NodeId),
    /// A dynamic configuration could not be evaluated.
    #[error("configuring node {node:?} failed")]
    Config {
        /// Node whose configuration failed.
        node: NodeId,
        /// Underlying error.
        #[source]
        source: ConfigError,
    },
    /// Instances nested deeper than the limit, usually because an instance reaches itself.
    #[error("instance nesting exceeded {limit} levels at node {node:?}")]
    InstanceDepthExceeded {
        /// Instance node where the limit was hit.
        node: NodeId,
        /// The nesting limit.
        limit: u32,
    },
}
