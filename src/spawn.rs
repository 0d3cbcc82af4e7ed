//! Initial agent data.
//!
//! Every worm starts as a single point (all three samples equal) somewhere in
//! the cube `[-10, 10)³`, with one random heading copied into its whole
//! rotation history. Colors come from the rainbow ramp by agent index.
//!
//! The same seed always yields the same buffer contents.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::uniforms::{PaddedVec3, WormRecord};
use crate::visuals::HueRamp;

/// Half-size of the spawn cube.
pub const SPAWN_EXTENT: f32 = 10.0;

/// Body radius every worm starts with.
pub const WORM_RADIUS: f32 = 1.0;

/// Seeded generator for the agent buffer contents.
pub struct Spawner {
    rng: StdRng,
    ramp: HueRamp,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ramp: HueRamp::rainbow(),
        }
    }

    pub fn with_ramp(mut self, ramp: HueRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Uniform in `[-1, 1)`.
    #[inline]
    fn signed(&mut self) -> f32 {
        self.rng.gen_range(-1.0..1.0)
    }

    /// A uniformly random point in the spawn cube.
    pub fn random_position(&mut self) -> Vec3 {
        Vec3::new(self.signed(), self.signed(), self.signed()) * SPAWN_EXTENT
    }

    /// A random `(azimuth, polar)` heading: azimuth in `[-2π, 2π)`, polar in
    /// `[-3π, π)`. Both spans are whole periods.
    pub fn random_heading(&mut self) -> [f32; 2] {
        let polar = self.signed() * TAU - PI;
        let azimuth = self.signed() * TAU;
        [azimuth, polar]
    }

    /// Build the record for agent `index` of `count`.
    pub fn worm(&mut self, index: u32, count: u32) -> WormRecord {
        let position = PaddedVec3::from(self.random_position());
        let heading = self.random_heading();
        WormRecord {
            positions: [position; 3],
            rotations: [heading; 5],
            _padding: [0.0; 2],
            color: self.ramp.color_for(index, count).to_array(),
            radius: WORM_RADIUS,
        }
    }

    /// Records for all `count` agents, in index order.
    pub fn worms(&mut self, count: u32) -> Vec<WormRecord> {
        (0..count).map(|index| self.worm(index, count)).collect()
    }
}

/// Shorthand for `Spawner::new(seed).worms(count)`.
pub fn initial_worms(count: u32, seed: u64) -> Vec<WormRecord> {
    Spawner::new(seed).worms(count)
}
