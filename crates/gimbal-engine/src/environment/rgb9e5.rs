//! Shared-exponent packing for `wgpu::TextureFormat::Rgb9e5Ufloat`.
//!
//! Three 9-bit mantissas share one 5-bit exponent (bias 15). The format is
//! filterable on every backend, which 32-bit float textures are not.

const MANTISSA_BITS: i32 = 9;
const EXP_BIAS: i32 = 15;
const MAX_VALUE: f32 = 65408.0; // (511 / 512) * 2^16

/// Packs a non-negative linear RGB triple. Negative and NaN channels become 0;
/// values above the format maximum saturate.
pub fn pack(rgb: [f32; 3]) -> u32 {
    let [r, g, b] = rgb.map(|c| if c > 0.0 { c.min(MAX_VALUE) } else { 0.0 });
    let max_c = r.max(g).max(b);

    let mut exp = (max_c.log2().floor() as i32).max(-EXP_BIAS - 1) + 1 + EXP_BIAS;
    let max_m = (max_c / exp2(exp - EXP_BIAS - MANTISSA_BITS) + 0.5).floor() as u32;
    if max_m == 1 << MANTISSA_BITS {
        exp += 1;
    }

    let scale = exp2(exp - EXP_BIAS - MANTISSA_BITS);
    let m = |c: f32| ((c / scale + 0.5).floor() as u32).min((1 << MANTISSA_BITS) - 1);

    m(r) | (m(g) << 9) | (m(b) << 18) | ((exp as u32) << 27)
}

/// Inverse of [`pack`].
pub fn unpack(texel: u32) -> [f32; 3] {
    let exp = (texel >> 27) as i32;
    let scale = exp2(exp - EXP_BIAS - MANTISSA_BITS);
    [
        (texel & 0x1ff) as f32 * scale,
        ((texel >> 9) & 0x1ff) as f32 * scale,
        ((texel >> 18) & 0x1ff) as f32 * scale,
    ]
}

#[inline]
fn exp2(e: i32) -> f32 {
    (e as f32).exp2()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3], rel: f32) -> bool {
        let max = b.iter().cloned().fold(0.0_f32, f32::max).max(1e-6);
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= max * rel)
    }

    #[test]
    fn zero_packs_to_zero_mantissas() {
        assert_eq!(unpack(pack([0.0, 0.0, 0.0])), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn exact_values_survive() {
        assert_eq!(unpack(pack([1.0, 0.5, 0.25])), [1.0, 0.5, 0.25]);
    }

    #[test]
    fn hdr_values_keep_relative_precision() {
        let v = [12.7, 3.1, 0.02];
        assert!(close(unpack(pack(v)), v, 1.0 / 256.0));
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        let out = unpack(pack([-4.0, f32::NAN, 2.0]));
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.0);
        assert_eq!(out[2], 2.0);
    }

    #[test]
    fn huge_values_saturate() {
        let out = unpack(pack([1.0e9, 0.0, 0.0]));
        assert_eq!(out[0], MAX_VALUE);
    }

    #[test]
    fn mantissa_rounding_carries_into_exponent() {
        // 511.9 rounds to a 512 mantissa, which must bump the exponent.
        let out = unpack(pack([511.9, 0.0, 0.0]));
        assert!((out[0] - 512.0).abs() < 1.0);
    }
}
