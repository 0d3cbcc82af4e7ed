//! The render stage: a full-screen quad raymarched in the fragment shader.

use wgpu::util::DeviceExt;

use crate::config::RenderTunables;
use crate::gpu::buffers::PingPongBuffers;
use crate::ping_pong::PingPong;
use crate::uniforms::RenderParameters;

/// Vertices of the full-screen triangle strip.
const QUAD_VERTICES: u32 = 4;

/// A render pipeline drawing from one buffer of the pair.
pub struct PingPongRender {
    pipeline: wgpu::RenderPipeline,
    parameters: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
}

impl PingPongRender {
    /// Bind group `i` exposes the parameters at binding 0 and buffer `i`
    /// read-only at binding 1.
    pub fn new(
        device: &wgpu::Device,
        buffers: &PingPongBuffers,
        source: &str,
        initial_parameters: &[u8],
        format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Worms Render Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let parameters = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Render Parameters"),
            contents: initial_parameters,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Worms Render Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_groups = PingPong::ALL.map(|pp| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Worms Render Bind Group [{}]", pp.index())),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: parameters.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers.current(pp).as_entire_binding(),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Worms Render Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Worms Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            parameters,
            bind_groups,
        }
    }

    pub fn set_parameters(&self, queue: &wgpu::Queue, bytes: &[u8]) {
        queue.write_buffer(&self.parameters, 0, bytes);
    }

    /// Encode one render pass into `view` reading buffer `index`.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, index: PingPong) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Worms Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[index.index()], &[]);
        pass.draw(0..QUAD_VERTICES, 0..1);
    }
}

/// The worm render stage with its host-side parameter block.
pub struct WormsRender {
    stage: PingPongRender,
    parameters: RenderParameters,
}

impl WormsRender {
    pub fn new(
        device: &wgpu::Device,
        buffers: &PingPongBuffers,
        source: &str,
        tunables: &RenderTunables,
        format: wgpu::TextureFormat,
    ) -> Self {
        let parameters = RenderParameters::new(tunables);
        let stage = PingPongRender::new(device, buffers, source, parameters.as_bytes(), format);
        Self { stage, parameters }
    }

    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, index: PingPong) {
        self.stage.draw(encoder, view, index);
    }

    /// Recompute camera, light and viewport, and upload.
    pub fn update(&mut self, queue: &wgpu::Queue, tunables: &RenderTunables) {
        self.parameters = RenderParameters::new(tunables);
        self.stage.set_parameters(queue, self.parameters.as_bytes());
    }

    pub fn parameters(&self) -> &RenderParameters {
        &self.parameters
    }
}
