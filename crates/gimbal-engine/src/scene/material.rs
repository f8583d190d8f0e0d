use crate::paint::Color;

/// Which faces of a surface are rendered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    /// Counter-clockwise (front) faces only.
    Front,
    /// Clockwise (back) faces only; the surface normal is flipped for shading.
    Back,
    /// Both; back faces shade with the flipped normal.
    Double,
}

/// Metallic/roughness material lit by the environment map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Linear base color.
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    /// Multiplier applied to all environment lighting.
    pub env_intensity: f32,
    pub side: Side,
}

impl StandardMaterial {
    pub fn new(color: Color) -> Self {
        Self { color, ..Self::default() }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_env_intensity(mut self, intensity: f32) -> Self {
        self.env_intensity = intensity.max(0.0);
        self
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            env_intensity: 1.0,
            side: Side::Front,
        }
    }
}
