//! Window host: a winit event loop driving one worm simulation.

use std::sync::Arc;
use std::time::Duration;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{Viewport, WormsConfig, WormsState};
use crate::error::{GpuError, SimulationError};
use crate::gpu::{make_simulation, GpuContext, GpuWorms, SurfaceTarget};
use crate::input::{is_play_toggle, OrbitControls};
use crate::simulation::Simulation;
use crate::time::{Clock, FrameDriver};

/// Schedules ticks through the window's redraw requests.
pub struct WindowDriver {
    window: Arc<Window>,
    clock: Clock,
}

impl WindowDriver {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            clock: Clock::new(),
        }
    }
}

impl FrameDriver for WindowDriver {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }

    fn now(&self) -> Duration {
        self.clock.elapsed()
    }
}

struct Running {
    surface: Arc<wgpu::Surface<'static>>,
    surface_config: wgpu::SurfaceConfiguration,
    context: GpuContext,
    simulation: Simulation<GpuWorms, WindowDriver>,
    state: WormsState,
}

impl Running {
    fn new(event_loop: &ActiveEventLoop, config: &WormsConfig) -> Result<Self, SimulationError> {
        let attributes = Window::default_attributes()
            .with_title("SDF Worms")
            .with_inner_size(LogicalSize::new(
                config.state.render.viewport.width,
                config.state.render.viewport.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(GpuError::from)?;
        let context = GpuContext::request_blocking(&instance, Some(&surface))?;

        let capabilities = surface.get_capabilities(&context.adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| capabilities.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);

        let mut config = config.clone();
        config.state.render.viewport =
            Viewport::new(surface_config.width as f32, surface_config.height as f32);

        let surface = Arc::new(surface);
        let target = Box::new(SurfaceTarget::new(Arc::clone(&surface), format));
        let driver = WindowDriver::new(Arc::clone(&window));
        let mut simulation = make_simulation(&context, &config, target, driver)?;
        simulation.play();

        Ok(Self {
            surface,
            surface_config,
            context,
            simulation,
            state: config.state,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.reconfigure();

        self.state.render.viewport = Viewport::new(size.width as f32, size.height as f32);
        self.simulation.update(&self.state);
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.context.device, &self.surface_config);
    }
}

/// The winit application.
pub struct App {
    config: WormsConfig,
    running: Option<Running>,
    controls: OrbitControls,
    error: Option<SimulationError>,
}

impl App {
    pub fn new(config: WormsConfig) -> Self {
        Self {
            config,
            running: None,
            controls: OrbitControls::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SimulationError) {
        log::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match Running::new(event_loop, &self.config) {
            Ok(running) => self.running = Some(running),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                running.simulation.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => running.resize(size),
            WindowEvent::KeyboardInput { ref event, .. } if is_play_toggle(event) => {
                running.simulation.toggle();
            }
            WindowEvent::RedrawRequested => match running.simulation.tick() {
                Ok(_) => {}
                Err(SimulationError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    running.reconfigure();
                }
                Err(SimulationError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    let err = SimulationError::Surface(wgpu::SurfaceError::OutOfMemory);
                    self.fail(event_loop, err);
                }
                Err(err) => log::warn!("frame error: {}", err),
            },
            other => {
                if self.controls.handle_event(&other, &mut running.state.render) {
                    running.simulation.update(&running.state);
                }
            }
        }
    }
}

/// Open a window and run until it is closed.
pub fn run(config: WormsConfig) -> Result<(), SimulationError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
