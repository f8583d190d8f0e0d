//! GPU rendering subsystem.
//!
//! Renderers consume a `scene::SceneGraph` and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers,
//! textures), created lazily on first use.
//!
//! Convention:
//! - world space is right-handed, +Y up; the camera supplies view-projection
//! - shaders output linear color; the sRGB encode is done by the surface format

mod ctx;
pub mod mesh;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::MeshRenderer;
