// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoization of a transform node's local and composed matrices.

use glam::Mat4;

use crate::model_view::{CachedTransform, ModelTransform};

/// How much of a transform node's per-visit work may be skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemoLevel {
    /// The local matrix must be recomputed before the next visit composes.
    #[default]
    Dirty,
    /// The local matrix is valid; the composed matrix is recomputed on each visit.
    LocallyFixed,
    /// Both matrices are valid and reused verbatim while the ambient transform is unchanged.
    FullyFixed,
}

#[derive(Clone, Debug)]
pub(crate) struct TransformMemo {
    level: MemoLevel,
    local_matrix: Mat4,
    composed: Option<CachedTransform>,
    // Ambient matrix that `composed` was built on.
    composed_against: Mat4,
}

impl TransformMemo {
    pub(crate) fn new() -> Self {
        Self {
            level: MemoLevel::Dirty,
            local_matrix: Mat4::IDENTITY,
            composed: None,
            composed_against: Mat4::IDENTITY,
        }
    }

    pub(crate) fn level(&self) -> MemoLevel {
        self.level
    }

    pub(crate) fn invalidate(&mut self) {
        self.level = MemoLevel::Dirty;
    }

    pub(crate) fn local_matrix(&self) -> Option<Mat4> {
        (self.level != MemoLevel::Dirty).then_some(self.local_matrix)
    }

    pub(crate) fn cached(&self) -> Option<&CachedTransform> {
        self.composed.as_ref()
    }

    /// Store a freshly computed local matrix.
    pub(crate) fn refresh_local(&mut self, local_matrix: Mat4) {
        self.local_matrix = local_matrix;
        self.level = MemoLevel::LocallyFixed;
    }

    /// Compose the local matrix with `ambient`, reusing the cached result when allowed.
    ///
    /// A fully fixed result is reused only while the ambient transform is fixed, instancing is
    /// inactive, and the ambient matrix is bit-equal to the one it was composed against.
    /// Otherwise the node drops back to [`MemoLevel::LocallyFixed`] and recomputes.
    pub(crate) fn compose(
        &mut self,
        ambient: ModelTransform,
        fixed_params: bool,
        instancing: bool,
    ) -> ModelTransform {
        debug_assert_ne!(
            self.level,
            MemoLevel::Dirty,
            "local matrix must be refreshed before composing"
        );
        if self.level == MemoLevel::FullyFixed {
            if let Some(cached) = &self.composed
                && ambient.fixed
                && !instancing
                && ambient.matrix == self.composed_against
            {
                return cached.model();
            }
            log::debug!("fixed transform demoted: ambient changed or instancing is active");
            self.level = MemoLevel::LocallyFixed;
        }

        let fixed = ambient.fixed && fixed_params && !instancing;
        let composed = CachedTransform {
            local_matrix: self.local_matrix,
            matrix: ambient.matrix * self.local_matrix,
            fixed,
        };
        self.composed = Some(composed);
        self.composed_against = ambient.matrix;
        if fixed && self.level == MemoLevel::LocallyFixed {
            log::trace!("transform promoted to fully fixed");
            self.level = MemoLevel::FullyFixed;
        }
        composed.model()
    }
}
