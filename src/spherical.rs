//! Spherical coordinates for the camera and the light.
//!
//! The polar angle is measured from +Y, the azimuth around +Y starting at +Z:
//! `(azimuth, polar) = (0, π/2)` points along +Z and `(π/2, π/2)` along +X.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A direction or position given as angles (radians) plus an optional radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    /// Rotation around the Y axis.
    pub azimuth: f32,
    /// Angle away from +Y, in `[0, π]`.
    pub polar: f32,
    /// Distance from the origin. `None` means a unit vector.
    #[serde(default)]
    pub radius: Option<f32>,
}

impl Spherical {
    pub fn new(azimuth: f32, polar: f32) -> Self {
        Self {
            azimuth,
            polar,
            radius: None,
        }
    }

    /// Build from angles in degrees.
    pub fn from_degrees(azimuth: f32, polar: f32, radius: f32) -> Self {
        Self {
            azimuth: azimuth.to_radians(),
            polar: polar.to_radians(),
            radius: Some(radius),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// The radius, defaulting to 1.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius.unwrap_or(1.0)
    }

    pub fn to_cartesian(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        let x = sin_polar * self.azimuth.sin();
        let y = self.polar.cos();
        let z = sin_polar * self.azimuth.cos();
        Vec3::new(x, y, z) * self.radius()
    }

    /// Inverse of [`to_cartesian`](Self::to_cartesian).
    ///
    /// The zero vector maps to the +Y pole with radius 0. On the poles the
    /// azimuth is meaningless and comes back as 0.
    pub fn from_cartesian(v: Vec3) -> Self {
        let radius = v.length();
        if radius <= f32::EPSILON {
            return Self {
                azimuth: 0.0,
                polar: 0.0,
                radius: Some(0.0),
            };
        }
        let polar = (v.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = v.x.atan2(v.z);
        Self {
            azimuth,
            polar,
            radius: Some(radius),
        }
    }
}

impl Default for Spherical {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
