use std::f32::consts::TAU;

use glam::Vec3;

use super::{MeshData, Vertex3d};

/// Flat annulus in the XY plane facing +Z.
///
/// `theta_segments` is clamped to at least 3.
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> MeshData {
    let segments = theta_segments.max(3);
    let mut mesh = MeshData::default();

    for radius in [inner_radius, outer_radius] {
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let (x, y) = (radius * cos, radius * sin);
            mesh.vertices.push(Vertex3d::new(
                [x, y, 0.0],
                [0.0, 0.0, 1.0],
                [(x / outer_radius + 1.0) * 0.5, (y / outer_radius + 1.0) * 0.5],
            ));
        }
    }

    let stride = segments + 1;
    for i in 0..segments {
        let a = i;
        let b = i + stride;
        let c = i + stride + 1;
        let d = i + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    mesh
}

/// Cylinder along Y from `-height/2` to `+height/2`.
///
/// `open_ended` omits the two caps. `radial_segments` is clamped to at least 3.
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    open_ended: bool,
) -> MeshData {
    let segments = radial_segments.max(3);
    let half = height * 0.5;
    let slope = if height != 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };
    let mut mesh = MeshData::default();

    // Side wall: one row at the top, one at the bottom.
    for (row, radius) in [(0.0_f32, radius_top), (1.0, radius_bottom)] {
        let y = half - row * height;
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize_or_zero();
            mesh.vertices.push(Vertex3d::new(
                [radius * sin, y, radius * cos],
                normal.to_array(),
                [u, 1.0 - row],
            ));
        }
    }

    let stride = segments + 1;
    for x in 0..segments {
        let a = x;
        let b = x + stride;
        let c = x + stride + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if !open_ended {
        if radius_top > 0.0 {
            mesh.append(cap(radius_top, half, segments, true));
        }
        if radius_bottom > 0.0 {
            mesh.append(cap(radius_bottom, -half, segments, false));
        }
    }

    mesh
}

/// Disc closing one end of a cylinder. One center vertex per segment keeps
/// the cap UVs seamless.
fn cap(radius: f32, y: f32, segments: u32, top: bool) -> MeshData {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = [0.0, sign, 0.0];
    let mut mesh = MeshData::default();

    for _ in 0..segments {
        mesh.vertices.push(Vertex3d::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    }

    for x in 0..=segments {
        let u = x as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        mesh.vertices.push(Vertex3d::new(
            [radius * sin, y, radius * cos],
            normal,
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        ));
    }

    for x in 0..segments {
        let center = x;
        let i = segments + x;
        if top {
            mesh.indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, center]);
        }
    }

    mesh
}

/// Axis-aligned box centered on the origin, 4 vertices per face.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    // (normal, u axis, v axis) with u × v = normal so faces wind counter-clockwise.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let half = Vec3::new(width, height, depth) * 0.5;
    let mut mesh = MeshData::default();

    for (n, u, v) in FACES {
        let (n, u, v) = (Vec3::from(n), Vec3::from(u), Vec3::from(v));
        let base = mesh.vertices.len() as u32;

        for (su, sv) in CORNERS {
            let p = (n + u * su + v * sv) * half;
            mesh.vertices.push(Vertex3d::new(
                p.to_array(),
                n.to_array(),
                [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
            ));
        }

        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle's geometric normal must agree with its vertex normals.
    fn assert_outward_winding(mesh: &MeshData) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let (pa, pb, pc) = (Vec3::from(a.position), Vec3::from(b.position), Vec3::from(c.position));
            let face = (pb - pa).cross(pc - pa);
            let shading = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
            assert!(face.dot(shading) > 0.0, "triangle {tri:?} winds against its normals");
        }
    }

    fn assert_unit_normals(mesh: &MeshData) {
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");
        }
    }

    fn assert_indices_in_range(mesh: &MeshData) {
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn ring_counts_and_extent() {
        let mesh = ring(2.0, 2.65, 70);
        assert_eq!(mesh.vertices.len(), 2 * 71);
        assert_eq!(mesh.triangle_count(), 2 * 70);
        assert_indices_in_range(&mesh);
        assert_outward_winding(&mesh);

        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 2.0).abs() < 1e-4 || (r - 2.65).abs() < 1e-4);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn open_cylinder_has_only_a_wall() {
        let mesh = cylinder(2.0, 2.0, 0.25, 70, true);
        assert_eq!(mesh.vertices.len(), 2 * 71);
        assert_eq!(mesh.triangle_count(), 2 * 70);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);

        let (min_y, max_y) = mesh.vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
            (lo.min(v.position[1]), hi.max(v.position[1]))
        });
        assert!((min_y + 0.125).abs() < 1e-6);
        assert!((max_y - 0.125).abs() < 1e-6);
    }

    #[test]
    fn capped_cylinder_adds_two_discs() {
        let segments = 20;
        let mesh = cylinder(0.05, 0.05, 0.07, segments, false);
        let wall = 2 * (segments as usize + 1);
        let caps = 2 * (segments as usize + segments as usize + 1);
        assert_eq!(mesh.vertices.len(), wall + caps);
        assert_eq!(mesh.triangle_count(), 2 * segments as usize + 2 * segments as usize);
        assert_indices_in_range(&mesh);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let mesh = cuboid(0.15, 0.4, 0.07);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);

        for v in &mesh.vertices {
            assert!((v.position[0].abs() - 0.075).abs() < 1e-6);
            assert!((v.position[1].abs() - 0.2).abs() < 1e-6);
            assert!((v.position[2].abs() - 0.035).abs() < 1e-6);
        }
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = cuboid(1.0, 1.0, 1.0);
        a.append(cuboid(1.0, 1.0, 1.0));
        assert_eq!(a.vertices.len(), 48);
        assert_eq!(a.indices[36], 24);
        assert_indices_in_range(&a);
    }
}
