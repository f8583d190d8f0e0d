//! Environment textures on the GPU.

use crate::environment::{EnvironmentMap, EquirectImage};

/// Texel format for both environment textures: filterable HDR in 4 bytes.
const ENV_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgb9e5Ufloat;

/// Uploaded radiance + irradiance textures and the bind group sampling them.
pub(super) struct GpuEnvironment {
    pub bind_group: wgpu::BindGroup,
    _radiance: wgpu::Texture,
    _irradiance: wgpu::Texture,
}

pub(super) fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("gimbal environment bgl"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

pub(super) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    env: &EnvironmentMap,
) -> GpuEnvironment {
    let max_dim = device.limits().max_texture_dimension_2d;
    let radiance_src = env.radiance.fit_within(max_dim);
    if radiance_src.width != env.radiance.width {
        log::warn!(
            "environment map {}x{} exceeds the device limit; downsampled to {}x{}",
            env.radiance.width,
            env.radiance.height,
            radiance_src.width,
            radiance_src.height
        );
    }

    let radiance = create_texture(device, queue, "gimbal env radiance", &radiance_src);
    let irradiance = create_texture(device, queue, "gimbal env irradiance", &env.irradiance);

    // Longitude wraps; latitude clamps at the poles.
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("gimbal env sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    let radiance_view = radiance.create_view(&wgpu::TextureViewDescriptor::default());
    let irradiance_view = irradiance.create_view(&wgpu::TextureViewDescriptor::default());

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("gimbal environment bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&radiance_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&irradiance_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    });

    log::debug!(
        "environment uploaded: radiance {}x{}, irradiance {}x{}",
        radiance_src.width,
        radiance_src.height,
        env.irradiance.width,
        env.irradiance.height
    );

    GpuEnvironment {
        bind_group,
        _radiance: radiance,
        _irradiance: irradiance,
    }
}

fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &EquirectImage,
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ENV_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let packed = image.to_rgb9e5();
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(&packed),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.width * 4),
            rows_per_image: Some(image.height),
        },
        size,
    );

    texture
}
