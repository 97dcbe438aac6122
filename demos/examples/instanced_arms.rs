// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instanced arms: one shared symbol placed three times under a spinning turntable.
//!
//! This example shows how to combine:
//! - static transform nodes, which settle at `FullyFixed` after the first frame,
//! - a quaternion node mutated between frames, which drops back to `Dirty` and recomputes,
//! - a symbol rendered only through instances, whose nodes stay at `LocallyFixed`,
//! - a dynamic joint that reads its rotation from traversal data.
//!
//! Run:
//! - `cargo run -p orrery_demos --example instanced_arms`

use glam::Vec3;
use orrery_rotation::AxisAngle;
use orrery_scene::{
    DataScope, DrawCall, GeometryId, NodeKind, QuaternionConfig, QuaternionNode, RenderContext,
    ScaleConfig, ScaleNode, Scene, TranslateConfig, TranslateNode, TraversalData,
};

fn main() {
    let mut scene = Scene::new();

    // Turntable at the root, tilted slightly toward the viewer.
    let turntable = scene.insert(
        None,
        QuaternionNode::fixed(QuaternionConfig::new(AxisAngle::new(1.0, 0.0, 0.0, 15.0))),
    );
    let base = scene.insert(
        Some(turntable),
        ScaleNode::fixed(ScaleConfig {
            x: 2.0,
            y: 0.25,
            z: 2.0,
        }),
    );
    scene.insert(Some(base), GeometryId(0));

    // The arm: a joint driven by traversal data, then a segment offset along +X.
    let arm = scene.insert(None, NodeKind::Symbol);
    let joint = scene.insert(Some(arm), QuaternionNode::from_data());
    let segment = scene.insert(
        Some(joint),
        TranslateNode::fixed(TranslateConfig {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        }),
    );
    scene.insert(Some(segment), GeometryId(1));

    for x in [-3.0, 0.0, 3.0] {
        let mount = scene.insert(
            Some(turntable),
            TranslateNode::fixed(TranslateConfig { x, y: 0.5, z: 0.0 }),
        );
        scene.insert(Some(mount), NodeKind::Instance(arm));
    }

    for frame in 0..4 {
        let elbow = 30.0 * frame as f32;
        let data = TraversalData::from_scope(DataScope::new().with("z", 1.0).with("angle", elbow));

        let mut calls: Vec<DrawCall> = Vec::new();
        let mut ctx = RenderContext::new(&mut calls).with_data(data);
        if let Err(err) = scene.render(&mut ctx) {
            eprintln!("frame {frame}: render failed: {err}");
            return;
        }
        drop(ctx);

        println!(
            "frame {frame} (elbow {elbow} deg): {} draw calls",
            calls.len()
        );
        for call in &calls {
            let origin = call.transform.matrix.transform_point3(Vec3::ZERO);
            println!(
                "  geometry {:>2} at ({:>6.2}, {:>6.2}, {:>6.2}) fixed={}",
                call.geometry.0, origin.x, origin.y, origin.z, call.transform.fixed
            );
        }
        println!(
            "  memo: turntable={:?} base={:?} joint={:?} segment={:?}",
            scene.memo_level(turntable),
            scene.memo_level(base),
            scene.memo_level(joint),
            scene.memo_level(segment),
        );

        // Spin the turntable for the next frame.
        if let Some(node) = scene.quaternion_mut(turntable) {
            node.rotate(AxisAngle::new(0.0, 1.0, 0.0, 45.0));
        }
    }
}
