use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::PerspectiveCamera;

/// Mouse-driven orbit around a target point.
///
/// Spherical coordinates: `polar` is measured from +Y, `azimuth` around +Y
/// starting at +Z. Dragging across the full viewport height turns a full
/// revolution; each wheel line scales the distance by `zoom_step`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    pub zoom_step: f32,

    home: (f32, f32, f32),
}

impl OrbitControls {
    /// Keeps the camera off the poles, where `look_at` degenerates.
    const POLAR_EPSILON: f32 = 1e-3;

    /// Derives the orbit from the camera's current position and target.
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.length().max(f32::EPSILON);
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();

        Self {
            target: camera.target,
            distance,
            azimuth,
            polar,
            min_distance: 1.0,
            max_distance: 100.0,
            zoom_step: 0.95,
            home: (distance, azimuth, polar),
        }
    }

    /// Applies a pointer drag (logical pixels) over a viewport of `viewport_height`.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.azimuth = (self.azimuth - TAU * dx / viewport_height).rem_euclid(TAU);
        self.polar = (self.polar - TAU * dy / viewport_height)
            .clamp(Self::POLAR_EPSILON, PI - Self::POLAR_EPSILON);
    }

    /// Moves toward the target for positive `lines`, away for negative.
    pub fn dolly(&mut self, lines: f32) {
        if lines == 0.0 {
            return;
        }
        self.distance = (self.distance * self.zoom_step.powf(lines))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Restores the orbit captured by [`from_camera`](Self::from_camera).
    pub fn reset(&mut self) {
        (self.distance, self.azimuth, self.polar) = self.home;
    }

    /// Camera position implied by the current orbit.
    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    /// Writes position and target into `camera`.
    pub fn apply(&self, camera: &mut PerspectiveCamera) {
        camera.position = self.position();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_camera() -> PerspectiveCamera {
        PerspectiveCamera::new(45.0, 1.0, 0.1, 1000.0, Vec3::new(0.0, 0.0, 10.0))
    }

    #[test]
    fn orbit_round_trips_camera_position() {
        let orbit = OrbitControls::from_camera(&front_camera());
        assert!((orbit.distance - 10.0).abs() < 1e-5);
        assert!((orbit.polar - PI / 2.0).abs() < 1e-5);
        assert!((orbit.position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn horizontal_drag_of_quarter_height_turns_quarter() {
        let mut orbit = OrbitControls::from_camera(&front_camera());
        orbit.rotate(-100.0, 0.0, 400.0);
        // Dragging left swings the camera toward +X.
        assert!((orbit.position() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn polar_angle_is_clamped_off_the_poles() {
        let mut orbit = OrbitControls::from_camera(&front_camera());
        orbit.rotate(0.0, 10_000.0, 100.0);
        assert!(orbit.polar >= OrbitControls::POLAR_EPSILON);
        orbit.rotate(0.0, -10_000.0, 100.0);
        assert!(orbit.polar <= PI - OrbitControls::POLAR_EPSILON);
    }

    #[test]
    fn dolly_scales_and_clamps_distance() {
        let mut orbit = OrbitControls::from_camera(&front_camera());
        orbit.dolly(1.0);
        assert!((orbit.distance - 9.5).abs() < 1e-5);
        orbit.dolly(1_000.0);
        assert_eq!(orbit.distance, orbit.min_distance);
        orbit.dolly(-1_000.0);
        assert_eq!(orbit.distance, orbit.max_distance);
    }

    #[test]
    fn reset_restores_initial_view() {
        let mut orbit = OrbitControls::from_camera(&front_camera());
        orbit.rotate(37.0, -12.0, 300.0);
        orbit.dolly(3.0);
        orbit.reset();

        let mut cam = front_camera();
        cam.position = Vec3::ONE;
        orbit.apply(&mut cam);
        assert!((cam.position - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn zero_height_viewport_is_ignored() {
        let mut orbit = OrbitControls::from_camera(&front_camera());
        let before = orbit;
        orbit.rotate(50.0, 50.0, 0.0);
        assert_eq!(orbit, before);
    }
}
