//! Gimbal engine crate.
//!
//! Platform + GPU runtime pieces for small forward-shaded 3D scenes: the
//! window/event loop, the wgpu device and surface, input, frame timing, a
//! retained scene graph, procedural geometry, cameras, environment lighting
//! and the mesh renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod geometry;
pub mod scene;
pub mod camera;
pub mod environment;
pub mod render;
