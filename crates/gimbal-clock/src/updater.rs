//! Per-frame transform update.

use gimbal_engine::scene::SceneGraph;

use crate::assembly::ClockNodes;
use crate::dial::{indicator_transform, tick_angle, Hand, WallTime, TICK_OFFSET};
use crate::pointer::PointerOffset;
use crate::rings::{RingKind, RingStates};

/// Drives the ring, hand and tick nodes once per displayed frame.
///
/// Rings keep automatic matrix recomposition and only get their Euler
/// rotation written. Hands and ticks get their local matrix assigned
/// directly.
#[derive(Debug)]
pub struct FrameUpdater {
    nodes: ClockNodes,
    rings: RingStates,
}

impl FrameUpdater {
    pub fn new(nodes: ClockNodes) -> Self {
        Self {
            nodes,
            rings: RingStates::new(),
        }
    }

    pub fn rings(&self) -> &RingStates {
        &self.rings
    }

    pub fn nodes(&self) -> &ClockNodes {
        &self.nodes
    }

    /// Advances ring smoothing and places every hand and tick for `time`.
    pub fn update(&mut self, scene: &mut SceneGraph, pointer: PointerOffset, time: WallTime) {
        self.rings.step(pointer);

        for kind in RingKind::ALL {
            scene.node_mut(self.nodes.ring(kind)).rotation = self.rings.get(kind).euler();
        }

        let inner = self.rings.get(RingKind::Inner);

        for hand in Hand::ALL {
            let m = indicator_transform(inner, hand.angle(time), hand.offset());
            scene.set_matrix(self.nodes.hand(hand), m);
        }

        for (i, &tick) in self.nodes.ticks.iter().enumerate() {
            scene.set_matrix(tick, indicator_transform(inner, tick_angle(i), TICK_OFFSET));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::build_clock;
    use crate::dial::TICK_COUNT;
    use glam::{Mat3, Vec3, Vec4};

    fn setup() -> (SceneGraph, FrameUpdater) {
        let mut scene = SceneGraph::new();
        let nodes = build_clock(&mut scene);
        (scene, FrameUpdater::new(nodes))
    }

    fn world_origin(scene: &SceneGraph, id: gimbal_engine::scene::NodeId) -> Vec3 {
        (scene.node(id).world_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0)).truncate()
    }

    #[test]
    fn first_frame_moves_rings_five_percent() {
        let (mut scene, mut updater) = setup();
        let pointer = PointerOffset::new(0.5, 0.25);
        updater.update(&mut scene, pointer, WallTime::new(0, 0, 0));

        let inner = updater.rings().get(RingKind::Inner);
        assert!((inner.yaw - 0.5 * 1.2 * 0.05).abs() < 1e-6);
        assert!((inner.pitch - 0.25 * 1.2 * 0.05).abs() < 1e-6);

        let node = scene.node(updater.nodes().ring(RingKind::Outer));
        assert!((node.rotation.y - 0.5 * -0.2 * 0.05).abs() < 1e-6);
        assert!(node.matrix_auto_update);
    }

    #[test]
    fn hands_follow_wall_time_at_rest() {
        let (mut scene, mut updater) = setup();
        updater.update(&mut scene, PointerOffset::ZERO, WallTime::new(6, 15, 45));
        scene.update_world_transforms();

        let hour = world_origin(&scene, updater.nodes().hand(Hand::Hour));
        assert!((hour - Vec3::new(0.0, -1.0, -0.1)).length() < 1e-5);

        let minute = world_origin(&scene, updater.nodes().hand(Hand::Minute));
        assert!((minute - Vec3::new(0.8, 0.0, 0.0)).length() < 1e-5);

        let second = world_origin(&scene, updater.nodes().hand(Hand::Second));
        assert!((second - Vec3::new(-0.75, 0.0, 0.1)).length() < 1e-5);
    }

    #[test]
    fn ticks_circle_the_dial() {
        let (mut scene, mut updater) = setup();
        updater.update(&mut scene, PointerOffset::ZERO, WallTime::default());
        scene.update_world_transforms();

        for i in 0..TICK_COUNT {
            let p = world_origin(&scene, updater.nodes().ticks[i]);
            assert!((p.truncate().length() - 1.75).abs() < 1e-5);
            assert!((p.z - 0.15).abs() < 1e-6);
        }
        let twelve = world_origin(&scene, updater.nodes().ticks[0]);
        assert!((twelve - Vec3::new(0.0, 1.75, 0.15)).length() < 1e-5);
    }

    #[test]
    fn indicators_tilt_with_inner_ring() {
        let (mut scene, mut updater) = setup();
        for _ in 0..300 {
            updater.update(&mut scene, PointerOffset::new(0.4, 0.0), WallTime::default());
        }
        scene.update_world_transforms();

        // Yaw about Y moves the twelve o'clock tick (at +Y) only through its depth.
        let inner = updater.rings().get(RingKind::Inner);
        assert!((inner.yaw - 0.48).abs() < 1e-3);

        let m = scene.node(updater.nodes().hand(Hand::Second)).local_matrix();
        assert!(!scene.node(updater.nodes().hand(Hand::Second)).matrix_auto_update);
        let r = Mat3::from_mat4(m);
        assert!((r.determinant() - 1.0).abs() < 1e-5);
        assert!((r.transpose() * r).abs_diff_eq(Mat3::IDENTITY, 1e-5));

        let tick = world_origin(&scene, updater.nodes().ticks[0]);
        assert!((tick.y - 1.75).abs() < 1e-5);
        assert!((tick.x - 0.15 * inner.yaw.sin()).abs() < 1e-5);
    }
}
