//! GPU side of the simulation: device acquisition, the buffer pair, and the
//! compute and render stages wired into one [`FramePasses`] implementation.

mod buffers;
mod compute;
mod render;
mod target;

use std::sync::Arc;

pub use buffers::PingPongBuffers;
pub use compute::{workgroup_count, PingPongCompute, WormsCompute, PER_WORKGROUP};
pub use render::{PingPongRender, WormsRender};
pub use target::{RenderTarget, SurfaceTarget, TargetFrame, TextureTarget};

use crate::config::{WormsConfig, WormsState};
use crate::error::{GpuError, SimulationError};
use crate::ping_pong::PingPong;
use crate::shader;
use crate::simulation::{FramePasses, Simulation};
use crate::spawn::initial_worms;
use crate::time::FrameDriver;

/// An adapter plus the device and queue created from it.
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Pick an adapter (compatible with `surface` if given) and open a device.
    pub async fn request(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, GpuError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Worms Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        Ok(Self {
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Blocking variant for hosts without an async runtime.
    pub fn request_blocking(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, GpuError> {
        pollster::block_on(Self::request(instance, surface))
    }
}

/// Buffers, stages and target of one worm simulation.
pub struct GpuWorms {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    buffers: PingPongBuffers,
    compute: WormsCompute,
    render: WormsRender,
    target: Box<dyn RenderTarget>,
    agents: u32,
}

impl GpuWorms {
    pub fn new(
        context: &GpuContext,
        config: &WormsConfig,
        target: Box<dyn RenderTarget>,
    ) -> Result<Self, SimulationError> {
        if config.agent_count == 0 {
            return Err(SimulationError::NoAgents);
        }
        let agents = config.agent_count;

        let registry = shader::catalog()?;
        let compute_source = shader::compute_source(&registry, PER_WORKGROUP)?;
        let render_source = shader::render_source(&registry, agents)?;

        let worms = initial_worms(agents, config.random_seed);
        let buffers = PingPongBuffers::new(&context.device, &worms);

        let compute = WormsCompute::new(
            &context.device,
            &buffers,
            &compute_source,
            &config.state.compute,
            agents,
        );
        let render = WormsRender::new(
            &context.device,
            &buffers,
            &render_source,
            &config.state.render,
            target.format(),
        );

        log::info!(
            "worm simulation ready: {} agents, {} workgroups",
            agents,
            compute.stage().workgroups()
        );

        Ok(Self {
            device: Arc::clone(&context.device),
            queue: Arc::clone(&context.queue),
            buffers,
            compute,
            render,
            target,
            agents,
        })
    }

    pub fn agents(&self) -> u32 {
        self.agents
    }

    pub fn buffers(&self) -> &PingPongBuffers {
        &self.buffers
    }

    pub fn compute(&self) -> &WormsCompute {
        &self.compute
    }

    pub fn render(&self) -> &WormsRender {
        &self.render
    }
}

impl FramePasses for GpuWorms {
    fn submit(&mut self, index: PingPong, delta_time: f32) -> Result<(), SimulationError> {
        let frame = self.target.acquire()?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Worms Frame Encoder"),
            });

        self.compute.encode(&self.queue, &mut encoder, index, delta_time);
        self.render.draw(&mut encoder, &frame.view, index);

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn update(&mut self, state: &WormsState) {
        self.compute.update(&self.queue, &state.compute);
        self.render.update(&self.queue, &state.render);
    }

    fn release(&mut self) {
        self.buffers.destroy();
    }
}

/// Build a stopped simulation drawing into `target`.
///
/// Fails before any GPU allocation when the agent count is zero or the
/// block catalog is inconsistent.
pub fn make_simulation<D: FrameDriver>(
    context: &GpuContext,
    config: &WormsConfig,
    target: Box<dyn RenderTarget>,
    driver: D,
) -> Result<Simulation<GpuWorms, D>, SimulationError> {
    let passes = GpuWorms::new(context, config, target)?;
    Ok(Simulation::new(passes, driver))
}
