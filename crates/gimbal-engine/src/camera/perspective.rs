use glam::{Mat4, Vec3};

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    /// Camera at `position` looking at the origin with +Y up.
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32, position: Vec3) -> Self {
        Self {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    /// Updates the aspect ratio; ignored for degenerate values (minimized window).
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn target_projects_to_screen_center() {
        let cam = PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 1000.0, Vec3::new(0.0, 0.0, 10.0));
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn points_beyond_far_plane_are_clipped() {
        let cam = PerspectiveCamera::new(45.0, 1.0, 0.1, 20.0, Vec3::new(0.0, 0.0, 10.0));
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, -50.0, 1.0);
        assert!(clip.z / clip.w > 1.0);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let mut cam = PerspectiveCamera::new(45.0, 2.0, 0.1, 1000.0, Vec3::Z);
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect, 2.0);
        cam.set_aspect(1.5);
        assert_eq!(cam.aspect, 1.5);
    }
}
