//! Simulation configuration and the runtime-tunable state.
//!
//! [`WormsState`] is everything a host may change while the simulation runs.
//! [`WormsConfig`] adds what is fixed at construction: agent count and the
//! seed for the initial agent data.
//!
//! # Example
//!
//! ```ignore
//! let config = WormsConfig::new()
//!     .with_agent_count(200)
//!     .with_seed(7)
//!     .with_compute(|c| c.speed = 4.0)
//!     .with_render(|r| r.viewport = Viewport::new(1920.0, 1080.0));
//! ```

use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::spherical::Spherical;

/// Tunables consumed by the compute kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeTunables {
    /// How far a worm may turn per second, in radians.
    pub delta_rotation: f32,
    /// Body length multiplier applied to the trailing samples.
    pub exaggeration: f32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Per-run random seed mixed into every steering decision.
    pub seed: Vec4,
    /// Downward pull on the heading.
    pub gravity: f32,
}

impl Default for ComputeTunables {
    fn default() -> Self {
        Self {
            delta_rotation: 0.5,
            exaggeration: 5.0,
            speed: 10.0,
            seed: Vec4::new(0.137, 0.821, 0.412, 0.593),
            gravity: 0.0,
        }
    }
}

/// Surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Tunables consumed by the render kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTunables {
    pub camera: Spherical,
    pub light: Spherical,
    pub viewport: Viewport,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Blend radius of the smooth union between worms.
    pub smooth_union: f32,
    /// RGB in `0..=1`.
    pub background: Vec3,
}

impl Default for RenderTunables {
    fn default() -> Self {
        Self {
            camera: Spherical::from_degrees(0.0, 90.0, 20.0),
            light: Spherical::from_degrees(340.0, 120.0, 25.0),
            viewport: Viewport::default(),
            fov: 80.0,
            smooth_union: 0.08,
            background: Vec3::splat(0.9),
        }
    }
}

/// The full tunable set, applied to both stages at once.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WormsState {
    pub compute: ComputeTunables,
    pub render: RenderTunables,
}

/// Construction-time settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WormsConfig {
    /// Number of simulated worms. Must be at least 1.
    pub agent_count: u32,
    /// Seed for the initial positions and headings.
    pub random_seed: u64,
    pub state: WormsState,
}

impl Default for WormsConfig {
    fn default() -> Self {
        Self {
            agent_count: 20,
            random_seed: 0x5eed,
            state: WormsState::default(),
        }
    }
}

impl WormsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_agent_count(mut self, count: u32) -> Self {
        self.agent_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_state(mut self, state: WormsState) -> Self {
        self.state = state;
        self
    }

    /// Adjust the compute tunables in place.
    pub fn with_compute(mut self, f: impl FnOnce(&mut ComputeTunables)) -> Self {
        f(&mut self.state.compute);
        self
    }

    /// Adjust the render tunables in place.
    pub fn with_render(mut self, f: impl FnOnce(&mut RenderTunables)) -> Self {
        f(&mut self.state.render);
        self
    }
}
