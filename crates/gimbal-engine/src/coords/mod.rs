//! Screen-space types shared by the runtime, cameras and renderers.
//!
//! Sizes are logical pixels (DPI-aware), origin top-left, +X right, +Y down.

mod viewport;

pub use viewport::Viewport;
