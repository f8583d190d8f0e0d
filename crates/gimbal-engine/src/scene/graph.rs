use glam::Mat4;

use crate::geometry::MeshData;

use super::material::StandardMaterial;
use super::node::{Node, NodeId};

/// Handle to a mesh stored in a [`SceneGraph`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(pub(crate) u32);

impl MeshId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a material stored in a [`SceneGraph`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MaterialId(pub(crate) u32);

impl MaterialId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One drawable node, resolved for rendering.
#[derive(Debug, Copy, Clone)]
pub struct Drawable<'a> {
    pub node: NodeId,
    pub world: Mat4,
    pub mesh: MeshId,
    pub material: &'a StandardMaterial,
}

/// Owner of all nodes, meshes and materials of a scene.
///
/// Invariant: a node's parent always has a smaller index than the node, so a
/// single forward pass propagates world transforms.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    meshes: Vec<MeshData>,
    materials: Vec<StandardMaterial>,
}

impl SceneGraph {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        self.meshes.push(mesh);
        MeshId((self.meshes.len() - 1) as u32)
    }

    pub fn add_material(&mut self, material: StandardMaterial) -> MaterialId {
        self.materials.push(material);
        MaterialId((self.materials.len() - 1) as u32)
    }

    /// Adds an empty group node.
    pub fn add_group(&mut self, name: impl Into<String>, parent: Option<NodeId>) -> NodeId {
        self.push_node(Node::new(name, parent))
    }

    /// Adds a node drawing `mesh` with `material`.
    pub fn add_mesh_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        mesh: MeshId,
        material: MaterialId,
    ) -> NodeId {
        debug_assert!(mesh.index() < self.meshes.len(), "mesh handle from another graph");
        debug_assert!(material.index() < self.materials.len(), "material handle from another graph");

        let mut node = Node::new(name, parent);
        node.mesh = Some((mesh, material));
        self.push_node(node)
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    /// Panics if `id` was issued by a different graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutable access to a node's transform fields.
    ///
    /// # Panics
    /// Panics if `id` was issued by a different graph.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Sets the node's local matrix and disables recomposition from its
    /// translation/rotation/scale fields.
    pub fn set_matrix(&mut self, id: NodeId, matrix: Mat4) {
        let node = &mut self.nodes[id.index()];
        node.local = matrix;
        node.matrix_auto_update = false;
    }

    #[inline]
    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    #[inline]
    pub fn materials(&self) -> &[StandardMaterial] {
        &self.materials
    }

    /// Recomposes auto-updating local matrices and propagates world matrices.
    pub fn update_world_transforms(&mut self) {
        for i in 0..self.nodes.len() {
            if self.nodes[i].matrix_auto_update {
                self.nodes[i].local = self.nodes[i].compose();
            }

            let parent_world = match self.nodes[i].parent {
                Some(p) => self.nodes[p.index()].world,
                None => Mat4::IDENTITY,
            };

            let node = &mut self.nodes[i];
            node.world = parent_world * node.local;
        }
    }

    /// Iterates drawable nodes with their world transforms from the last
    /// [`update_world_transforms`](Self::update_world_transforms).
    pub fn drawables(&self) -> impl Iterator<Item = Drawable<'_>> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, node)| {
            let (mesh, material) = node.mesh?;
            Some(Drawable {
                node: NodeId(i as u32),
                world: node.world,
                mesh,
                material: &self.materials[material.index()],
            })
        })
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if let Some(parent) = node.parent {
            debug_assert!(parent.index() < self.nodes.len(), "parent must exist before child");
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(node);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry;
    use glam::{Vec3, Vec4};

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    fn graph_with_box() -> (SceneGraph, MeshId, MaterialId) {
        let mut g = SceneGraph::new();
        let mesh = g.add_mesh(geometry::cuboid(1.0, 1.0, 1.0));
        let mat = g.add_material(StandardMaterial::default());
        (g, mesh, mat)
    }

    #[test]
    fn child_world_is_parent_times_local() {
        let (mut g, mesh, mat) = graph_with_box();
        let group = g.add_group("group", None);
        let child = g.add_mesh_node("child", Some(group), mesh, mat);

        g.node_mut(group).translation = Vec3::new(0.0, 0.0, 2.0);
        g.node_mut(group).scale = Vec3::new(2.0, 2.0, 1.0);
        g.node_mut(child).translation = Vec3::new(1.0, 0.0, 0.0);
        g.update_world_transforms();

        let p = g.node(child).world_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((p.truncate() - Vec3::new(2.0, 0.0, 2.0)).length() < 1e-5);
        assert_eq!(g.node(group).children(), &[child]);
        assert_eq!(g.node(child).parent(), Some(group));
    }

    #[test]
    fn euler_fields_rotate_in_xyz_order() {
        let (mut g, mesh, mat) = graph_with_box();
        let n = g.add_mesh_node("n", None, mesh, mat);
        g.node_mut(n).rotation = Vec3::new(0.3, -0.2, 0.0);
        g.update_world_transforms();

        let expected = Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(-0.2);
        assert!(approx_mat(g.node(n).world_matrix(), expected));
    }

    #[test]
    fn manual_matrix_survives_propagation() {
        let (mut g, mesh, mat) = graph_with_box();
        let n = g.add_mesh_node("n", None, mesh, mat);
        let m = Mat4::from_translation(Vec3::new(0.0, 1.75, 0.15));

        g.set_matrix(n, m);
        g.node_mut(n).translation = Vec3::new(9.0, 9.0, 9.0);
        g.update_world_transforms();

        assert!(!g.node(n).matrix_auto_update);
        assert!(approx_mat(g.node(n).local_matrix(), m));
        assert!(approx_mat(g.node(n).world_matrix(), m));
    }

    #[test]
    fn drawables_skip_groups_and_share_meshes() {
        let (mut g, mesh, mat) = graph_with_box();
        let group = g.add_group("ticks", None);
        for i in 0..12 {
            g.add_mesh_node(format!("tick {i}"), Some(group), mesh, mat);
        }
        g.update_world_transforms();

        assert_eq!(g.len(), 13);
        assert_eq!(g.meshes().len(), 1);
        let drawables: Vec<_> = g.drawables().collect();
        assert_eq!(drawables.len(), 12);
        assert!(drawables.iter().all(|d| d.mesh == mesh));
    }
}
