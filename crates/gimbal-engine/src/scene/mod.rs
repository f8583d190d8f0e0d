//! Retained scene graph.
//!
//! Nodes form a forest stored in creation order. A node is either a group
//! (children only) or a drawable (mesh + material). Every node owns a local
//! transform that is either recomposed from its translation / rotation / scale
//! fields each frame or set explicitly through [`SceneGraph::set_matrix`].
//!
//! Meshes and materials live in flat tables inside the graph and are
//! referenced by index handles, so many nodes can share one geometry.

mod graph;
mod material;
mod node;

pub use graph::{Drawable, MaterialId, MeshId, SceneGraph};
pub use material::{Side, StandardMaterial};
pub use node::{euler_xyz, Node, NodeId};
