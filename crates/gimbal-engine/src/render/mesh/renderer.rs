use wgpu::util::DeviceExt;

use crate::camera::PerspectiveCamera;
use crate::environment::EnvironmentMap;
use crate::geometry::{MeshData, Vertex3d};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{SceneGraph, Side};

use super::common::{camera_ubo_min_binding_size, CameraUniform, MeshInstance};
use super::environment::{self, GpuEnvironment};

/// Renders every drawable node of a [`SceneGraph`] with image-based lighting.
///
/// GPU resources are created lazily:
/// - pipelines on first use and whenever the surface format or sample count changes
/// - the environment textures on the first frame after [`set_environment`](Self::set_environment)
/// - mesh buffers the first time a mesh index is seen
///
/// Meshes are keyed by their [`MeshId`](crate::scene::MeshId) index, so one
/// renderer serves one scene graph.
pub struct MeshRenderer {
    pipeline_key: Option<(wgpu::TextureFormat, u32)>,
    pipelines: Option<SidePipelines>,

    camera_bgl: Option<wgpu::BindGroupLayout>,
    env_bgl: Option<wgpu::BindGroupLayout>,
    camera_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,

    pending_environment: Option<EnvironmentMap>,
    environment: Option<GpuEnvironment>,

    meshes: Vec<GpuMesh>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    exposure: f32,
    warned_no_environment: bool,
}

struct SidePipelines {
    front: wgpu::RenderPipeline,
    back: wgpu::RenderPipeline,
    double: wgpu::RenderPipeline,
}

impl SidePipelines {
    fn get(&self, side: Side) -> &wgpu::RenderPipeline {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
            Side::Double => &self.double,
        }
    }
}

struct GpuMesh {
    /// `None` for empty meshes.
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    index_count: u32,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            pipeline_key: None,
            pipelines: None,
            camera_bgl: None,
            env_bgl: None,
            camera_ubo: None,
            camera_bind_group: None,
            pending_environment: None,
            environment: None,
            meshes: Vec::new(),
            instance_vbo: None,
            instance_capacity: 0,
            exposure: 1.0,
            warned_no_environment: false,
        }
    }
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `env` for upload on the next [`render`](Self::render).
    pub fn set_environment(&mut self, env: EnvironmentMap) {
        self.pending_environment = Some(env);
    }

    /// True once an environment is uploaded or queued.
    pub fn has_environment(&self) -> bool {
        self.environment.is_some() || self.pending_environment.is_some()
    }

    /// Linear exposure applied before tone mapping.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_exposure(&mut self, exposure: f32) {
        if exposure.is_finite() && exposure > 0.0 {
            self.exposure = exposure;
        }
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    /// Draws all drawables of `scene` as seen by `camera` into `target`.
    ///
    /// World transforms are read as-is; call
    /// [`SceneGraph::update_world_transforms`] first. Nothing is drawn until an
    /// environment has been provided.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &PerspectiveCamera,
        scene: &SceneGraph,
    ) {
        self.ensure_layouts(ctx);
        self.ensure_pipelines(ctx);
        self.ensure_camera_bindings(ctx);
        self.ensure_environment(ctx);
        self.ensure_meshes(ctx, scene.meshes());

        if self.environment.is_none() {
            if !self.warned_no_environment {
                log::warn!("MeshRenderer: no environment map set; skipping mesh pass");
                self.warned_no_environment = true;
            }
            return;
        }

        let draws: Vec<(MeshInstance, Side, usize)> = scene
            .drawables()
            .map(|d| {
                (
                    MeshInstance::new(d.world, d.material),
                    d.material.side,
                    d.mesh.index(),
                )
            })
            .collect();

        if draws.is_empty() {
            return;
        }

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.write_camera_uniform(ctx, camera);
        self.ensure_instance_capacity(ctx, draws.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let raw: Vec<MeshInstance> = draws.iter().map(|(inst, _, _)| *inst).collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&raw));

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(camera_bg) = self.camera_bind_group.as_ref() else { return };
        let Some(env) = self.environment.as_ref() else { return };

        let color = target.color_attachment(wgpu::LoadOp::Load);
        let depth = target.depth_attachment(wgpu::LoadOp::Load);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gimbal mesh pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: Some(depth),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, camera_bg, &[]);
        rpass.set_bind_group(1, &env.bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));

        let mut bound_side = None;
        for (i, (_, side, mesh_index)) in draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(*mesh_index) else { continue };
            let Some((vbo, ibo)) = mesh.buffers.as_ref() else { continue };

            if bound_side != Some(*side) {
                rpass.set_pipeline(pipelines.get(*side));
                bound_side = Some(*side);
            }

            let i = i as u32;
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, i..i + 1);
        }
    }

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bgl.is_some() && self.env_bgl.is_some() {
            return;
        }

        let camera_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gimbal camera bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: camera_ubo_min_binding_size(),
                    },
                    count: None,
                }],
            });

        self.camera_bgl = Some(camera_bgl);
        self.env_bgl = Some(environment::bind_group_layout(ctx.device));

        // Layouts changed: everything bound against them is stale.
        self.pipelines = None;
        self.pipeline_key = None;
        self.camera_bind_group = None;
        self.camera_ubo = None;
        self.environment = None;
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        let key = (ctx.surface_format, ctx.sample_count);
        if self.pipeline_key == Some(key) && self.pipelines.is_some() {
            return;
        }
        let (Some(camera_bgl), Some(env_bgl)) = (self.camera_bgl.as_ref(), self.env_bgl.as_ref())
        else {
            return;
        };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gimbal mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("gimbal mesh pipeline layout"),
                bind_group_layouts: &[camera_bgl, env_bgl],
                immediate_size: 0,
            });

        let build = |label: &str, cull_mode: Option<wgpu::Face>| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex3d::layout(), MeshInstance::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: ctx.depth_format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),

                multisample: wgpu::MultisampleState {
                    count: ctx.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },

                multiview_mask: None,
                cache: None,
            })
        };

        self.pipelines = Some(SidePipelines {
            front: build("gimbal mesh pipeline (front)", Some(wgpu::Face::Back)),
            back: build("gimbal mesh pipeline (back)", Some(wgpu::Face::Front)),
            double: build("gimbal mesh pipeline (double)", None),
        });
        self.pipeline_key = Some(key);

        log::debug!(
            "mesh pipelines built for {:?} x{} samples",
            ctx.surface_format,
            ctx.sample_count
        );
    }

    fn ensure_camera_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bind_group.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.camera_bgl.as_ref() else { return };

        let camera_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gimbal camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gimbal camera bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        });

        self.camera_ubo = Some(camera_ubo);
        self.camera_bind_group = Some(bind_group);
    }

    fn ensure_environment(&mut self, ctx: &RenderCtx<'_>) {
        let Some(bgl) = self.env_bgl.as_ref() else { return };
        if let Some(env) = self.pending_environment.take() {
            self.environment = Some(environment::upload(ctx.device, ctx.queue, bgl, &env));
        }
    }

    fn ensure_meshes(&mut self, ctx: &RenderCtx<'_>, meshes: &[MeshData]) {
        if self.meshes.len() >= meshes.len() {
            return;
        }

        for (i, mesh) in meshes.iter().enumerate().skip(self.meshes.len()) {
            if mesh.indices.is_empty() {
                self.meshes.push(GpuMesh { buffers: None, index_count: 0 });
                continue;
            }

            let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gimbal mesh vbo"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gimbal mesh ibo"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            log::trace!("uploaded mesh {i}: {} triangles", mesh.triangle_count());
            self.meshes.push(GpuMesh {
                buffers: Some((vbo, ibo)),
                index_count: mesh.indices.len() as u32,
            });
        }

        log::debug!("mesh renderer holds {} meshes", self.meshes.len());
    }

    fn write_camera_uniform(&mut self, ctx: &RenderCtx<'_>, camera: &PerspectiveCamera) {
        let Some(ubo) = self.camera_ubo.as_ref() else { return };
        let u = CameraUniform::new(camera, self.exposure);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<MeshInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gimbal mesh instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}
