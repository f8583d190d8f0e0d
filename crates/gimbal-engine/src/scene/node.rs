use glam::{Mat4, Quat, Vec3};

use super::graph::{MaterialId, MeshId};

/// Handle to a node inside a [`SceneGraph`](super::SceneGraph).
///
/// Handles are never invalidated: nodes are not removed once created.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rotation from Euler angles applied in XYZ order: `Rx(x) · Ry(y) · Rz(z)`.
#[inline]
pub fn euler_xyz(angles: Vec3) -> Quat {
    Quat::from_rotation_x(angles.x) * Quat::from_rotation_y(angles.y) * Quat::from_rotation_z(angles.z)
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    pub translation: Vec3,
    /// Euler angles in radians, see [`euler_xyz`].
    pub rotation: Vec3,
    pub scale: Vec3,

    /// When set, `local` is recomposed from translation/rotation/scale before
    /// world transforms are propagated. Cleared by `SceneGraph::set_matrix`.
    pub matrix_auto_update: bool,

    pub(crate) local: Mat4,
    pub(crate) world: Mat4,

    pub(crate) mesh: Option<(MeshId, MaterialId)>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            matrix_auto_update: true,
            local: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            mesh: None,
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Local transform as of the last propagation (or `set_matrix`).
    #[inline]
    pub fn local_matrix(&self) -> Mat4 {
        self.local
    }

    /// World transform as of the last propagation.
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    /// `T · R · S` from the node's component fields.
    pub fn compose(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, euler_xyz(self.rotation), self.translation)
    }
}
