//! One-time construction of the clock scene.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use gimbal_engine::geometry;
use gimbal_engine::paint::Color;
use gimbal_engine::scene::{MaterialId, MeshId, NodeId, SceneGraph, Side, StandardMaterial};

use crate::dial::{Hand, TICK_COUNT};
use crate::rings::RingKind;

/// Radius of the inner edge of every ring before scaling.
const RING_RADIUS: f32 = 2.0;
/// Depth of a ring along Z.
const RING_DEPTH: f32 = 0.25;
const RING_SEGMENTS: u32 = 70;
const CAP_SEGMENTS: u32 = 20;

/// Shape and look of one ring.
struct RingStyle {
    thickness: f32,
    color: Color,
    scale: Vec3,
}

fn ring_style(kind: RingKind) -> RingStyle {
    match kind {
        RingKind::Inner => RingStyle {
            thickness: 0.65,
            color: Color::cyan(),
            scale: Vec3::new(0.75, 0.75, 1.0),
        },
        RingKind::Middle => RingStyle {
            thickness: 0.35,
            color: Color::teal(),
            scale: Vec3::new(1.05, 1.05, 1.0),
        },
        RingKind::Outer => RingStyle {
            thickness: 0.15,
            color: Color::cyan(),
            scale: Vec3::new(1.3, 1.3, 1.0),
        },
    }
}

/// `(width, height, depth)` of a rounded bar.
type BarSize = (f32, f32, f32);

const TICK_SIZE: BarSize = (0.075, 0.1, 0.025);

fn hand_style(hand: Hand) -> (BarSize, Color) {
    match hand {
        Hand::Hour => ((0.15, 0.4, 0.07), Color::WHITE),
        Hand::Minute => ((0.135, 0.8, 0.07), Color::WHITE),
        Hand::Second => ((0.075, 1.0, 0.07), Color::dark_turquoise()),
    }
}

/// Handles to the nodes the per-frame update drives.
#[derive(Debug, Clone)]
pub struct ClockNodes {
    /// Ring groups, indexed like [`RingKind::ALL`].
    pub rings: [NodeId; 3],
    /// Hand groups, indexed like [`Hand::ALL`].
    pub hands: [NodeId; 3],
    pub ticks: [NodeId; TICK_COUNT],
}

impl ClockNodes {
    pub fn ring(&self, kind: RingKind) -> NodeId {
        self.rings[kind as usize]
    }

    pub fn hand(&self, hand: Hand) -> NodeId {
        self.hands[hand as usize]
    }
}

/// Populates `scene` with the rings, hands and ticks.
pub fn build_clock(scene: &mut SceneGraph) -> ClockNodes {
    let rings = RingKind::ALL.map(|kind| add_ring(scene, kind));

    let tick_group = scene.add_group("ticks", None);
    let tick_bar = BarMeshes::new(scene, TICK_SIZE, Color::WHITE);
    let ticks: [NodeId; TICK_COUNT] =
        std::array::from_fn(|i| tick_bar.instantiate(scene, &format!("tick {i}"), Some(tick_group)));

    let hands = Hand::ALL.map(|hand| {
        let (size, color) = hand_style(hand);
        BarMeshes::new(scene, size, color).instantiate(scene, &format!("{hand:?} hand"), None)
    });

    log::debug!(
        "clock scene built: {} nodes, {} meshes",
        scene.len(),
        scene.meshes().len()
    );

    ClockNodes { rings, hands, ticks }
}

/// Front and back annuli joined by inner and outer cylindrical walls.
fn add_ring(scene: &mut SceneGraph, kind: RingKind) -> NodeId {
    let style = ring_style(kind);
    let outer_radius = RING_RADIUS + style.thickness;

    let base = StandardMaterial::new(style.color)
        .with_roughness(0.0)
        .with_metalness(0.4)
        .with_env_intensity(1.0);
    let front_mat = scene.add_material(base.with_side(Side::Front));
    let back_mat = scene.add_material(base.with_side(Side::Back));
    let wall_mat = scene.add_material(base.with_side(Side::Double));

    let face = scene.add_mesh(geometry::ring(RING_RADIUS, outer_radius, RING_SEGMENTS));
    let outer_wall = scene.add_mesh(geometry::cylinder(
        outer_radius,
        outer_radius,
        RING_DEPTH,
        RING_SEGMENTS,
        true,
    ));
    let inner_wall = scene.add_mesh(geometry::cylinder(
        RING_RADIUS,
        RING_RADIUS,
        RING_DEPTH,
        RING_SEGMENTS,
        true,
    ));

    let group = scene.add_group(format!("{kind:?} ring"), None);
    {
        let node = scene.node_mut(group);
        node.translation.z = RING_DEPTH / 2.0;
        node.scale = style.scale;
    }

    scene.add_mesh_node("front face", Some(group), face, front_mat);

    for (name, mesh) in [("outer wall", outer_wall), ("inner wall", inner_wall)] {
        let wall = scene.add_mesh_node(name, Some(group), mesh, wall_mat);
        let node = scene.node_mut(wall);
        node.rotation.x = FRAC_PI_2;
        node.translation.z = -RING_DEPTH / 2.0;
    }

    let back = scene.add_mesh_node("back face", Some(group), face, back_mat);
    scene.node_mut(back).translation.z = -RING_DEPTH;

    group
}

/// Meshes and material of a rounded bar: a box with a cylinder across each end.
struct BarMeshes {
    size: BarSize,
    body: MeshId,
    cap: MeshId,
    material: MaterialId,
}

impl BarMeshes {
    fn new(scene: &mut SceneGraph, size: BarSize, color: Color) -> Self {
        let (w, h, d) = size;
        let material = scene.add_material(
            StandardMaterial::new(color)
                .with_roughness(0.0)
                .with_metalness(0.4)
                .with_env_intensity(1.5)
                .with_side(Side::Double),
        );
        Self {
            size,
            body: scene.add_mesh(geometry::cuboid(w, h, d)),
            cap: scene.add_mesh(geometry::cylinder(w / 2.0, w / 2.0, d, CAP_SEGMENTS, false)),
            material,
        }
    }

    /// Adds a bar group (body + caps); the group's matrix is set per frame.
    fn instantiate(&self, scene: &mut SceneGraph, name: &str, parent: Option<NodeId>) -> NodeId {
        let (_, h, _) = self.size;
        let group = scene.add_group(name, parent);

        scene.add_mesh_node("body", Some(group), self.body, self.material);
        for y in [h / 2.0, -h / 2.0] {
            let cap = scene.add_mesh_node("cap", Some(group), self.cap, self.material);
            let node = scene.node_mut(cap);
            node.rotation.x = FRAC_PI_2;
            node.translation.y = y;
        }

        group
    }
}
