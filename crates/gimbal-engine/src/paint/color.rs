/// Linear RGBA color.
///
/// Invariant:
/// - components are in linear space; the sRGB encode happens in the surface
///   format on output.
///
/// Colors authored as sRGB (hex literals, CSS names) go through
/// [`Color::from_srgb_u8`] / [`Color::from_hex`], which linearize.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::linear(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from linear components.
    #[inline]
    pub const fn linear(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a linear color from sRGB-encoded bytes (`0`–`255`).
    ///
    /// Alpha is not gamma encoded and is mapped linearly.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: a as f32 / 255.0,
        }
    }

    /// Creates an opaque linear color from a `0xRRGGBB` sRGB literal.
    #[inline]
    pub fn from_hex(rgb: u32) -> Self {
        Self::from_srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// CSS `cyan` (`#00ffff`).
    #[inline]
    pub fn cyan() -> Self {
        Self::from_hex(0x00ffff)
    }

    /// CSS `teal` (`#008080`).
    #[inline]
    pub fn teal() -> Self {
        Self::from_hex(0x008080)
    }

    /// CSS `darkturquoise` (`#00ced1`).
    #[inline]
    pub fn dark_turquoise() -> Self {
        Self::from_hex(0x00ced1)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to a wgpu clear color.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// sRGB electro-optical transfer function (IEC 61966-2-1).
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
