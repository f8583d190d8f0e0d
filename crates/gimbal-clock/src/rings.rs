//! Damped ring orientation.

use glam::{Mat4, Vec3};

use gimbal_engine::scene::euler_xyz;

use crate::pointer::PointerOffset;

/// Weight of the target in each smoothing step.
pub const SMOOTHING: f32 = 0.05;

/// The three concentric rings, inner to outer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RingKind {
    Inner,
    Middle,
    Outer,
}

impl RingKind {
    pub const ALL: [RingKind; 3] = [RingKind::Inner, RingKind::Middle, RingKind::Outer];

    /// Target rotation per unit of pointer offset. The outer ring counter-rotates.
    pub fn sensitivity(self) -> f32 {
        match self {
            RingKind::Inner => 1.2,
            RingKind::Middle => 0.3,
            RingKind::Outer => -0.2,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Ring orientation in radians: pitch about X follows pointer `y`, yaw about Y
/// follows pointer `x`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RingRotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl RingRotation {
    #[inline]
    pub const fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Orientation the ring settles at for a constant `offset`.
    pub fn target(offset: PointerOffset, sensitivity: f32) -> Self {
        Self {
            pitch: offset.y * sensitivity,
            yaw: offset.x * sensitivity,
        }
    }

    /// One exponential smoothing step toward [`target`](Self::target).
    pub fn step(&mut self, offset: PointerOffset, sensitivity: f32) {
        let target = Self::target(offset, sensitivity);
        self.pitch = self.pitch * (1.0 - SMOOTHING) + target.pitch * SMOOTHING;
        self.yaw = self.yaw * (1.0 - SMOOTHING) + target.yaw * SMOOTHING;
    }

    /// Euler angles (XYZ order) for a scene node.
    #[inline]
    pub fn euler(self) -> Vec3 {
        Vec3::new(self.pitch, self.yaw, 0.0)
    }

    /// `Rx(pitch) · Ry(yaw)`.
    pub fn matrix(self) -> Mat4 {
        Mat4::from_quat(euler_xyz(self.euler()))
    }
}

/// Persistent rotation state of all three rings.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RingStates {
    states: [RingRotation; 3],
}

impl RingStates {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, kind: RingKind) -> RingRotation {
        self.states[kind.index()]
    }

    /// Advances every ring one smoothing step toward its target for `offset`.
    pub fn step(&mut self, offset: PointerOffset) {
        for kind in RingKind::ALL {
            self.states[kind.index()].step(offset, kind.sensitivity());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(a: RingRotation, b: RingRotation) -> f32 {
        ((a.pitch - b.pitch).powi(2) + (a.yaw - b.yaw).powi(2)).sqrt()
    }

    #[test]
    fn converges_monotonically_toward_scaled_offset() {
        let offset = PointerOffset::new(0.3, -0.2);
        let mut states = RingStates::new();

        for kind in RingKind::ALL {
            let target = RingRotation::target(offset, kind.sensitivity());
            let mut prev = dist(states.get(kind), target);
            let mut s = states.get(kind);
            for _ in 0..200 {
                s.step(offset, kind.sensitivity());
                let d = dist(s, target);
                assert!(d <= prev * 0.95 + 1e-6, "{kind:?}: {d} > 0.95 * {prev}");
                prev = d;
            }
            assert!(prev < 1e-4, "{kind:?} did not converge");
            states.states[kind.index()] = s;
        }

        let inner = states.get(RingKind::Inner);
        assert!((inner.pitch - (-0.24)).abs() < 1e-4);
        assert!((inner.yaw - 0.36).abs() < 1e-4);
    }

    #[test]
    fn remaining_distance_shrinks_by_095_per_step() {
        let offset = PointerOffset::new(0.5, 0.5);
        let target = RingRotation::target(offset, 1.2);
        let mut s = RingRotation::default();

        let before = dist(s, target);
        s.step(offset, 1.2);
        let after = dist(s, target);
        assert!((after / before - 0.95).abs() < 1e-5);
    }

    #[test]
    fn zero_offset_returns_to_rest() {
        let mut states = RingStates::new();
        for kind in RingKind::ALL {
            states.states[kind.index()] = RingRotation::new(0.8, -1.1);
        }
        for _ in 0..500 {
            states.step(PointerOffset::ZERO);
        }
        for kind in RingKind::ALL {
            let s = states.get(kind);
            assert!(s.pitch.abs() < 1e-6 && s.yaw.abs() < 1e-6);
        }
    }

    #[test]
    fn outer_ring_counter_rotates() {
        let mut states = RingStates::new();
        states.step(PointerOffset::new(0.4, 0.4));
        assert!(states.get(RingKind::Inner).yaw > 0.0);
        assert!(states.get(RingKind::Middle).yaw > 0.0);
        assert!(states.get(RingKind::Outer).yaw < 0.0);
    }

    #[test]
    fn matrix_is_pitch_then_yaw() {
        let r = RingRotation::new(0.2, -0.4);
        let expected = Mat4::from_rotation_x(0.2) * Mat4::from_rotation_y(-0.4);
        assert!(r.matrix().abs_diff_eq(expected, 1e-6));
    }
}
