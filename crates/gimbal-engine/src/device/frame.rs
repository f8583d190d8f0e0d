/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Size-dependent attachments shared by every pass of a frame.
///
/// Recreated whenever the surface is resized.
pub(crate) struct FrameTargets {
    pub depth_view: wgpu::TextureView,
    /// Multisampled color target; `None` when MSAA is disabled.
    pub msaa_view: Option<wgpu::TextureView>,
}
