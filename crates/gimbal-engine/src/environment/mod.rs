//! Image-based lighting source data.
//!
//! An [`EnvironmentMap`] is an equirectangular HDR image held on the CPU,
//! together with a small diffuse irradiance map derived from it. GPU upload
//! is the renderer's job; this module has no wgpu dependency beyond the
//! texel packing helpers.
//!
//! Direction convention (shared with `mesh.wgsl`):
//! `u = atan2(d.z, d.x) / 2π + 0.5`, `v = acos(d.y) / π` (row 0 is +Y).

mod error;
pub mod rgb9e5;

pub use error::EnvironmentError;

use std::f32::consts::{PI, TAU};
use std::path::Path;

use glam::Vec3;

/// Size of the derived irradiance map.
pub const IRRADIANCE_WIDTH: u32 = 32;
pub const IRRADIANCE_HEIGHT: u32 = 16;

/// Linear RGB equirectangular image.
#[derive(Debug, Clone, PartialEq)]
pub struct EquirectImage {
    pub width: u32,
    pub height: u32,
    /// Row-major texels, top row first.
    pub texels: Vec<[f32; 3]>,
}

impl EquirectImage {
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> [f32; 3] {
        self.texels[(y * self.width + x) as usize]
    }

    /// Packs every texel for an `Rgb9e5Ufloat` upload.
    pub fn to_rgb9e5(&self) -> Vec<u32> {
        self.texels.iter().map(|&t| rgb9e5::pack(t)).collect()
    }

    /// Box-reduces the image by powers of two until both sides fit `max_dim`.
    pub fn fit_within(&self, max_dim: u32) -> EquirectImage {
        let max_dim = max_dim.max(1);
        let (mut w, mut h) = (self.width, self.height);
        while w > max_dim || h > max_dim {
            w = (w / 2).max(1);
            h = (h / 2).max(1);
        }
        if (w, h) == (self.width, self.height) {
            self.clone()
        } else {
            box_reduce(self, w, h)
        }
    }
}

/// Environment lighting: the radiance image plus its cosine-convolved irradiance.
#[derive(Debug, Clone)]
pub struct EnvironmentMap {
    pub radiance: EquirectImage,
    pub irradiance: EquirectImage,
}

impl EnvironmentMap {
    /// Decodes an equirectangular HDR file (Radiance `.hdr`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvironmentError> {
        let path = path.as_ref();

        let reader = image::ImageReader::open(path)
            .map_err(|source| EnvironmentError::Io { path: path.to_path_buf(), source })?
            .with_guessed_format()
            .map_err(|source| EnvironmentError::Io { path: path.to_path_buf(), source })?;

        let decoded = reader
            .decode()
            .map_err(|source| EnvironmentError::Decode { path: path.to_path_buf(), source })?
            .into_rgb32f();

        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(EnvironmentError::Empty { path: path.to_path_buf() });
        }

        let texels = decoded.pixels().map(|p| p.0).collect();
        let map = Self::from_radiance(EquirectImage { width, height, texels });

        log::info!("environment map {} decoded ({width}x{height})", path.display());
        Ok(map)
    }

    /// Builds the map from an in-memory radiance image.
    pub fn from_radiance(radiance: EquirectImage) -> Self {
        let irradiance = convolve_irradiance(&radiance, IRRADIANCE_WIDTH, IRRADIANCE_HEIGHT);
        Self { radiance, irradiance }
    }
}

/// Unit direction at the center of texel `(x, y)` of a `width`×`height` map.
pub fn texel_direction(x: u32, y: u32, width: u32, height: u32) -> Vec3 {
    let u = (x as f32 + 0.5) / width as f32;
    let v = (y as f32 + 0.5) / height as f32;
    let phi = (u - 0.5) * TAU;
    let theta = v * PI;
    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
}

/// Lambertian irradiance divided by π, so a white diffuse surface facing `n`
/// shades to `sample(n)` directly.
///
/// The source is first box-reduced to at most 64×32 texels; the convolution is
/// then a direct sum over every reduced texel weighted by its solid angle.
fn convolve_irradiance(src: &EquirectImage, out_w: u32, out_h: u32) -> EquirectImage {
    let reduced = box_reduce(src, src.width.min(64), src.height.min(32));

    let samples: Vec<(Vec3, Vec3)> = (0..reduced.height)
        .flat_map(|y| (0..reduced.width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let dir = texel_direction(x, y, reduced.width, reduced.height);
            let theta = (y as f32 + 0.5) / reduced.height as f32 * PI;
            let solid_angle =
                (TAU / reduced.width as f32) * (PI / reduced.height as f32) * theta.sin();
            (dir, Vec3::from(reduced.texel(x, y)) * solid_angle)
        })
        .collect();

    let mut texels = Vec::with_capacity((out_w * out_h) as usize);
    for y in 0..out_h {
        for x in 0..out_w {
            let n = texel_direction(x, y, out_w, out_h);
            let sum = samples
                .iter()
                .map(|(dir, weighted)| *weighted * n.dot(*dir).max(0.0))
                .fold(Vec3::ZERO, |acc, v| acc + v);
            texels.push((sum / PI).to_array());
        }
    }

    EquirectImage { width: out_w, height: out_h, texels }
}

/// Averages `src` down to `w`×`h` (each output texel covers a block of input).
fn box_reduce(src: &EquirectImage, w: u32, h: u32) -> EquirectImage {
    let (w, h) = (w.max(1), h.max(1));
    let mut texels = Vec::with_capacity((w * h) as usize);

    for oy in 0..h {
        let y0 = oy * src.height / h;
        let y1 = ((oy + 1) * src.height / h).max(y0 + 1);
        for ox in 0..w {
            let x0 = ox * src.width / w;
            let x1 = ((ox + 1) * src.width / w).max(x0 + 1);

            let mut sum = Vec3::ZERO;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += Vec3::from(src.texel(x, y));
                }
            }
            let count = ((y1 - y0) * (x1 - x0)) as f32;
            texels.push((sum / count).to_array());
        }
    }

    EquirectImage { width: w, height: h, texels }
}
