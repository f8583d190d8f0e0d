//! Color model shared between scene materials and renderers.

pub mod color;

pub use color::{srgb_to_linear, Color};
