//! GPU-side data layouts shared by the mesh pipelines.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::scene::StandardMaterial;

// ── camera uniform ────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz: eye position in world space; w: exposure.
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub(super) fn new(camera: &PerspectiveCamera, exposure: f32) -> Self {
        let p = camera.position;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: [p.x, p.y, p.z, exposure],
        }
    }
}

/// Minimum binding size for the camera uniform buffer.
pub(super) fn camera_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<CameraUniform>() as u64)
}

// ── per-draw instance ─────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct MeshInstance {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model's upper 3×3, padded to vec4 columns.
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
    /// x: roughness, y: metalness, z: environment intensity.
    pub params: [f32; 4],
}

impl MeshInstance {
    const ATTRS: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
        3 => Float32x4,  // model col 0
        4 => Float32x4,  // model col 1
        5 => Float32x4,  // model col 2
        6 => Float32x4,  // model col 3
        7 => Float32x4,  // normal col 0
        8 => Float32x4,  // normal col 1
        9 => Float32x4,  // normal col 2
        10 => Float32x4, // color
        11 => Float32x4  // params
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    pub(super) fn new(world: Mat4, material: &StandardMaterial) -> Self {
        let n = normal_matrix(world);
        let col = |v: Vec3| [v.x, v.y, v.z, 0.0];
        Self {
            model: world.to_cols_array_2d(),
            normal: [col(n.x_axis), col(n.y_axis), col(n.z_axis)],
            color: material.color.to_array(),
            params: [
                material.roughness,
                material.metalness,
                material.env_intensity,
                0.0,
            ],
        }
    }
}

/// Normal transform for `model`; falls back to the plain 3×3 when singular.
pub(super) fn normal_matrix(model: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(model);
    if m.determinant().abs() <= f32::EPSILON {
        m
    } else {
        m.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshInstance>(), 144);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn non_uniform_scale_keeps_normals_perpendicular() {
        let model = Mat4::from_scale(Vec3::new(0.75, 0.75, 1.0))
            * Mat4::from_rotation_x(0.4);
        let tangent = Vec3::new(1.0, 1.0, 0.0).normalize();
        let normal = Vec3::new(1.0, -1.0, 0.0).normalize();

        let t = model.transform_vector3(tangent);
        let n = normal_matrix(model) * normal;
        assert!(t.dot(n).abs() < 1e-5);
    }

    #[test]
    fn singular_model_does_not_produce_nan() {
        let model = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let n = normal_matrix(model);
        assert!(n.is_finite());
    }
}
