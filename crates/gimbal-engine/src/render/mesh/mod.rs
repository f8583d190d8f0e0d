//! Forward-shaded mesh rendering lit by an environment map.

mod common;
mod environment;
mod renderer;

pub use renderer::MeshRenderer;
