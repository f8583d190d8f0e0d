//! Cameras and camera controllers.
//!
//! Conventions: right-handed world, +Y up, camera looks down -Z in view space,
//! clip-space depth in `[0, 1]` (wgpu).

mod orbit;
mod perspective;

pub use orbit::OrbitControls;
pub use perspective::PerspectiveCamera;
