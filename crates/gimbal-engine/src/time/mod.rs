//! Time subsystem.
//!
//! Frame timing utilities, independent of the runtime:
//! - one `FrameClock` per window, `tick()` once per presented frame
//! - `FrameRateMeter` for periodic frame-rate diagnostics

mod frame_clock;

pub use frame_clock::{FrameClock, FrameRateMeter, FrameTime};
