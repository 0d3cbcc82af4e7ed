//! The compute stage.
//!
//! [`PingPongCompute`] is the generic part: one pipeline, one parameter
//! buffer, and a bind group per alternation index. [`WormsCompute`] adds the
//! host copy of the worm parameter block.

use wgpu::util::DeviceExt;

use crate::config::ComputeTunables;
use crate::gpu::buffers::PingPongBuffers;
use crate::ping_pong::PingPong;
use crate::uniforms::ComputeParameters;

/// Invocations per workgroup, shared with the kernel's `@workgroup_size`.
pub const PER_WORKGROUP: u32 = 64;

/// Workgroups needed to cover `agents` invocations.
#[inline]
pub fn workgroup_count(agents: u32) -> u32 {
    agents.div_ceil(PER_WORKGROUP)
}

/// A compute pipeline that reads one buffer of the pair and writes the other.
pub struct PingPongCompute {
    pipeline: wgpu::ComputePipeline,
    parameters: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
    workgroups: u32,
}

impl PingPongCompute {
    /// Bind group `i` exposes the parameters at binding 0, buffer `i`
    /// read-only at binding 1 and buffer `1 - i` writable at binding 2.
    pub fn new(
        device: &wgpu::Device,
        buffers: &PingPongBuffers,
        source: &str,
        initial_parameters: &[u8],
        workgroups: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Worms Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let parameters = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Compute Parameters"),
            contents: initial_parameters,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Worms Compute Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_groups = PingPong::ALL.map(|pp| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Worms Compute Bind Group [{}]", pp.index())),
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
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffers.next(pp).as_entire_binding(),
                    },
                ],
            })
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Worms Compute Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Worms Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            parameters,
            bind_groups,
            workgroups,
        }
    }

    /// Overwrite the whole parameter buffer.
    pub fn set_parameters(&self, queue: &wgpu::Queue, bytes: &[u8]) {
        queue.write_buffer(&self.parameters, 0, bytes);
    }

    /// Encode one compute pass reading buffer `index`.
    pub fn dispatch(&self, encoder: &mut wgpu::CommandEncoder, index: PingPong) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Worms Compute Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[index.index()], &[]);
        pass.dispatch_workgroups(self.workgroups, 1, 1);
    }

    pub fn workgroups(&self) -> u32 {
        self.workgroups
    }
}

/// The worm compute stage with its host-side parameter block.
pub struct WormsCompute {
    stage: PingPongCompute,
    parameters: ComputeParameters,
}

impl WormsCompute {
    pub fn new(
        device: &wgpu::Device,
        buffers: &PingPongBuffers,
        source: &str,
        tunables: &ComputeTunables,
        agents: u32,
    ) -> Self {
        let parameters = ComputeParameters::new(tunables);
        let stage = PingPongCompute::new(
            device,
            buffers,
            source,
            parameters.as_bytes(),
            workgroup_count(agents),
        );
        Self { stage, parameters }
    }

    /// Write the elapsed time, then encode the dispatch at `index`.
    pub fn encode(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        index: PingPong,
        delta_time: f32,
    ) {
        self.parameters.delta_time = delta_time;
        self.stage.set_parameters(queue, self.parameters.as_bytes());
        self.stage.dispatch(encoder, index);
    }

    /// Replace the tunables. `delta_time` keeps its last value.
    pub fn update(&mut self, queue: &wgpu::Queue, tunables: &ComputeTunables) {
        self.parameters.set_tunables(tunables);
        self.stage.set_parameters(queue, self.parameters.as_bytes());
    }

    pub fn parameters(&self) -> &ComputeParameters {
        &self.parameters
    }

    pub fn stage(&self) -> &PingPongCompute {
        &self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workgroup_count() {
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(20), 1);
        assert_eq!(workgroup_count(64), 1);
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(1000), 16);
    }
}
