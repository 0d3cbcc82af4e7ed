//! Error types for sdf-worms.
//!
//! Composition errors come from a malformed block catalog and are never
//! worth retrying. GPU errors are raised while acquiring a device, before any
//! simulation exists. Simulation errors wrap both, plus the per-frame failures
//! a host has to react to (lost or outdated surfaces).

use std::fmt;

/// Errors raised while registering or composing shader blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// The requested entry block is not in the registry.
    UnknownBlock(String),
    /// A block declares a dependency that is not in the registry.
    UnknownDependency {
        /// Block declaring the dependency.
        block: String,
        /// Name that could not be resolved.
        dependency: String,
    },
    /// Two blocks were registered under the same name.
    DuplicateBlock(String),
    /// The dependency graph contains a cycle, so no order exists.
    CircularDependency {
        /// Blocks left unordered when sorting stalled.
        pending: Vec<String>,
    },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::UnknownBlock(name) => write!(f, "Unknown shader block '{}'", name),
            ComposeError::UnknownDependency { block, dependency } => write!(
                f,
                "Shader block '{}' depends on unknown block '{}'",
                block, dependency
            ),
            ComposeError::DuplicateBlock(name) => {
                write!(f, "Shader block '{}' is registered more than once", name)
            }
            ComposeError::CircularDependency { pending } => write!(
                f,
                "Circular dependency detected between shader blocks: {}",
                pending.join(", ")
            ),
        }
    }
}

impl std::error::Error for ComposeError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format for this adapter.
    NoSurfaceFormat,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::NoSurfaceFormat => write!(f, "Surface is not compatible with the selected adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while loading a settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file from disk.
    Io(std::io::Error),
    /// The file is not valid settings JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read settings file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when building or running a simulation.
#[derive(Debug)]
pub enum SimulationError {
    /// Kernel source could not be composed.
    Compose(ComposeError),
    /// A simulation needs at least one agent.
    NoAgents,
    /// The render target could not provide a frame.
    Surface(wgpu::SurfaceError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Settings could not be loaded.
    Config(ConfigError),
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Compose(e) => write!(f, "Shader composition failed: {}", e),
            SimulationError::NoAgents => write!(f, "Agent count must be at least 1"),
            SimulationError::Surface(e) => write!(f, "Render target unavailable: {}", e),
            SimulationError::Gpu(e) => write!(f, "GPU error: {}", e),
            SimulationError::Config(e) => write!(f, "Configuration error: {}", e),
            SimulationError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SimulationError::Window(e) => write!(f, "Failed to create window: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Compose(e) => Some(e),
            SimulationError::NoAgents => None,
            SimulationError::Surface(e) => Some(e),
            SimulationError::Gpu(e) => Some(e),
            SimulationError::Config(e) => Some(e),
            SimulationError::EventLoop(e) => Some(e),
            SimulationError::Window(e) => Some(e),
        }
    }
}

impl From<ComposeError> for SimulationError {
    fn from(e: ComposeError) -> Self {
        SimulationError::Compose(e)
    }
}

impl From<wgpu::SurfaceError> for SimulationError {
    fn from(e: wgpu::SurfaceError) -> Self {
        SimulationError::Surface(e)
    }
}

impl From<GpuError> for SimulationError {
    fn from(e: GpuError) -> Self {
        SimulationError::Gpu(e)
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<winit::error::EventLoopError> for SimulationError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SimulationError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SimulationError {
    fn from(e: winit::error::OsError) -> Self {
        SimulationError::Window(e)
    }
}
