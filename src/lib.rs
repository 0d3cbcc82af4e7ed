//! # SDF Worms
//!
//! A GPU-resident agent simulation: a population of "worms" steered by a
//! compute kernel and drawn by raymarching signed distance fields in a
//! fragment kernel. Agent state never leaves the GPU.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sdf_worms::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let config = WormsConfig::new()
//!         .with_agent_count(200)
//!         .with_compute(|c| c.speed = 6.0);
//!     sdf_worms::window::run(config)
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Kernels from blocks
//!
//! Both kernels are composed from small WGSL blocks with declared
//! dependencies (see [`blocks`] and [`shader`]). Composition emits each
//! needed block once, dependencies first, then fills in placeholders such as
//! the agent count.
//!
//! ### Ping-pong buffers
//!
//! Agents live in two identical storage buffers. On every tick the compute
//! pass reads one and writes the other, and the render pass reads the same
//! one the compute pass read, so the picture trails the simulation by one
//! tick. The alternation index is [`PingPong`].
//!
//! ### The frame loop
//!
//! [`Simulation`] is a `stopped`/`running` state machine ticked by a
//! [`FrameDriver`]. The window host drives it from redraw requests;
//! [`ManualDriver`] drives it by hand.
//!
//! ## Layouts
//!
//! | Struct | Size | Kernel |
//! |--------|------|--------|
//! | [`WormRecord`] | 112 | `Worm` |
//! | [`ComputeParameters`] | 48 | `ComputeParameters` |
//! | [`RenderParameters`] | 112 | `RenderParameters` |

pub mod blocks;
pub mod config;
pub mod error;
pub mod gpu;
pub mod input;
pub mod ping_pong;
pub mod shader;
pub mod simulation;
pub mod spawn;
pub mod spherical;
pub mod time;
pub mod uniforms;
pub mod visuals;
pub mod window;

pub use blocks::{BlockRegistry, ShaderBlock};
pub use config::{ComputeTunables, RenderTunables, Viewport, WormsConfig, WormsState};
pub use error::{ComposeError, ConfigError, GpuError, SimulationError};
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::{make_simulation, GpuContext, GpuWorms, RenderTarget, SurfaceTarget, TextureTarget};
pub use ping_pong::PingPong;
pub use simulation::{FramePasses, Simulation};
pub use spherical::Spherical;
pub use time::{FrameDriver, ManualDriver};
pub use uniforms::{ComputeParameters, RenderParameters, WormRecord};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use sdf_worms::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ComputeTunables, RenderTunables, Viewport, WormsConfig, WormsState};
    pub use crate::error::SimulationError;
    pub use crate::gpu::{make_simulation, GpuContext, TextureTarget};
    pub use crate::ping_pong::PingPong;
    pub use crate::simulation::{FramePasses, Simulation};
    pub use crate::spherical::Spherical;
    pub use crate::time::{FrameDriver, ManualDriver};
    pub use crate::{Vec2, Vec3, Vec4};
}
