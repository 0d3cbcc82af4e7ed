//! Agent colors.
//!
//! Each worm takes its color from a rainbow ramp indexed by its position in
//! the agent list, so neighbouring indices get neighbouring hues. The ramp
//! interpolates in HSL space, hue along the shortest arc.

use glam::Vec3;

/// Ramp stops, evenly spaced over `0..=1`.
pub const RAINBOW: [u32; 7] = [
    0xff0000, // red
    0xff8800, // orange
    0xffee00, // yellow
    0x00ff00, // green
    0x1e90ff, // dodger blue
    0x0000cd, // medium blue
    0x9900ff, // violet
];

/// A piecewise HSL gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct HueRamp {
    stops: Vec<Vec3>,
}

impl HueRamp {
    /// Build a ramp from `0xRRGGBB` stops. An empty list yields white.
    pub fn from_hex(stops: &[u32]) -> Self {
        Self {
            stops: stops.iter().map(|&hex| rgb_from_hex(hex)).collect(),
        }
    }

    pub fn rainbow() -> Self {
        Self::from_hex(&RAINBOW)
    }

    /// Color at `t`, clamped into `0..=1`.
    pub fn sample(&self, t: f32) -> Vec3 {
        match self.stops.len() {
            0 => Vec3::ONE,
            1 => self.stops[0],
            len => {
                let segments = (len - 1) as f32;
                let scaled = t.clamp(0.0, 1.0) * segments;
                let segment = (scaled.floor() as usize).min(len - 2);
                let local = scaled - segment as f32;
                interpolate_hsl(self.stops[segment], self.stops[segment + 1], local)
            }
        }
    }

    /// Color of agent `index` out of `count`.
    pub fn color_for(&self, index: u32, count: u32) -> Vec3 {
        let t = if count > 1 {
            index as f32 / (count - 1) as f32
        } else {
            0.0
        };
        self.sample(t)
    }
}

impl Default for HueRamp {
    fn default() -> Self {
        Self::rainbow()
    }
}

/// `0xRRGGBB` to RGB in `0..=1`.
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// RGB to (hue in degrees, saturation, lightness). Grays get hue 0.
pub fn rgb_to_hsl(rgb: Vec3) -> Vec3 {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let lightness = (max + min) * 0.5;
    let chroma = max - min;

    if chroma <= f32::EPSILON {
        return Vec3::new(0.0, 0.0, lightness);
    }

    let saturation = chroma / (1.0 - (2.0 * lightness - 1.0).abs());
    let hue = if max == rgb.x {
        ((rgb.y - rgb.z) / chroma).rem_euclid(6.0)
    } else if max == rgb.y {
        (rgb.z - rgb.x) / chroma + 2.0
    } else {
        (rgb.x - rgb.y) / chroma + 4.0
    };

    Vec3::new(hue * 60.0, saturation, lightness)
}

/// (hue in degrees, saturation, lightness) to RGB.
pub fn hsl_to_rgb(hsl: Vec3) -> Vec3 {
    let (h, s, l) = (hsl.x.rem_euclid(360.0), hsl.y, hsl.z);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c * 0.5;

    let (r, g, b) = match (h / 60.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

/// Interpolate a hue in degrees along the shorter way around the circle.
pub fn lerp_hue(from: f32, to: f32, t: f32) -> f32 {
    let mut delta = to - from;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    (from + delta * t).rem_euclid(360.0)
}

fn interpolate_hsl(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let a = rgb_to_hsl(from);
    let b = rgb_to_hsl(to);
    hsl_to_rgb(Vec3::new(
        lerp_hue(a.x, b.x, t),
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-3),
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_hex() {
        assert_rgb(rgb_from_hex(0xff8800), Vec3::new(1.0, 136.0 / 255.0, 0.0));
    }

    #[test]
    fn test_hsl_round_trip() {
        for hex in RAINBOW {
            let rgb = rgb_from_hex(hex);
            assert_rgb(hsl_to_rgb(rgb_to_hsl(rgb)), rgb);
        }
    }

    #[test]
    fn test_ramp_hits_stops() {
        let ramp = HueRamp::rainbow();
        for (i, hex) in RAINBOW.iter().enumerate() {
            let t = i as f32 / (RAINBOW.len() - 1) as f32;
            assert_rgb(ramp.sample(t), rgb_from_hex(*hex));
        }
    }

    #[test]
    fn test_ramp_ends() {
        let ramp = HueRamp::rainbow();
        assert_rgb(ramp.color_for(0, 20), Vec3::X);
        assert_rgb(ramp.color_for(19, 20), rgb_from_hex(0x9900ff));
        assert_rgb(ramp.color_for(0, 1), Vec3::X);
        assert_rgb(ramp.sample(4.0), rgb_from_hex(0x9900ff));
    }

    #[test]
    fn test_hue_takes_short_arc() {
        assert!((lerp_hue(350.0, 10.0, 0.5) % 360.0).abs() < 1e-3);
        assert!((lerp_hue(10.0, 350.0, 0.25) - 5.0).abs() < 1e-3);
        assert!((lerp_hue(0.0, 120.0, 0.5) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let hsl = rgb_to_hsl(Vec3::splat(0.5));
        assert_eq!(hsl.y, 0.0);
        assert!((hsl.z - 0.5).abs() < 1e-6);
    }
}
