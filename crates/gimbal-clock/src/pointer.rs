//! Pointer position → ring target offset.

use gimbal_engine::coords::Viewport;
use gimbal_engine::input::InputEvent;

/// Radians of ring tilt per logical pixel of pointer offset from the center.
pub const POINTER_SCALE: f32 = 0.001;

/// Pointer displacement from the window center, pre-scaled to small
/// radian-like magnitudes. `y` grows downward, like screen coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f32,
    pub y: f32,
}

impl PointerOffset {
    pub const ZERO: PointerOffset = PointerOffset { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset for a pointer at `(x, y)` logical pixels inside `viewport`.
    pub fn from_position(x: f32, y: f32, viewport: Viewport) -> Self {
        let (cx, cy) = viewport.center();
        Self {
            x: (x - cx) * POINTER_SCALE,
            y: (y - cy) * POINTER_SCALE,
        }
    }
}

/// Owns the current [`PointerOffset`] and updates it from input events.
///
/// The last offset is kept when the pointer leaves the window.
#[derive(Debug, Default)]
pub struct PointerTracker {
    offset: PointerOffset,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn offset(&self) -> PointerOffset {
        self.offset
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport: Viewport) {
        self.offset = PointerOffset::from_position(x, y, viewport);
    }

    /// Applies every pointer move in `events`; the last one wins.
    pub fn apply_events(&mut self, events: &[InputEvent], viewport: Viewport) {
        for ev in events {
            if let InputEvent::PointerMoved(p) = ev {
                self.pointer_moved(p.x, p.y, viewport);
            }
        }
    }
}
