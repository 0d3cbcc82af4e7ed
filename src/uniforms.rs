//! Host-side mirrors of the kernels' binary layouts, and the packers that
//! fill them.
//!
//! Every struct here has a WGSL twin (`Worm` in `worms_types.wgsl`,
//! `ComputeParameters` in `worms_compute.wgsl`, `RenderParameters` in
//! `worms_render.wgsl`). Field order and byte offsets are listed once in
//! the `*_FIELDS` tables below. The tables are checked against the Rust
//! structs at compile time and against the WGSL declarations in the kernel
//! tests, so a change on either side fails loudly instead of rendering noise.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::config::{ComputeTunables, RenderTunables};
use crate::spherical::Spherical;

/// One named field of a kernel-visible struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

impl Field {
    const fn new(name: &'static str, offset: usize, size: usize) -> Self {
        Self { name, offset, size }
    }
}

// ============================================================================
// Agent record
// ============================================================================

/// A `vec3<f32>` padded to its 16-byte storage stride.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PaddedVec3 {
    pub xyz: [f32; 3],
    pub _pad: f32,
}

impl From<Vec3> for PaddedVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            xyz: v.to_array(),
            _pad: 0.0,
        }
    }
}

/// Per-worm state, identical in both buffers of the pair.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct WormRecord {
    /// Head, middle and tail samples.
    pub positions: [PaddedVec3; 3],
    /// Heading history as `(azimuth, polar)`, newest first.
    pub rotations: [[f32; 2]; 5],
    pub _padding: [f32; 2],
    pub color: [f32; 3],
    pub radius: f32,
}

pub const WORM_RECORD_SIZE: usize = 112;

pub const WORM_FIELDS: &[Field] = &[
    Field::new("positions", 0, 48),
    Field::new("rotations", 48, 40),
    Field::new("color", 96, 12),
    Field::new("radius", 108, 4),
];

const _: () = assert!(size_of::<WormRecord>() == WORM_RECORD_SIZE);
const _: () = assert!(offset_of!(WormRecord, positions) == 0);
const _: () = assert!(offset_of!(WormRecord, rotations) == 48);
const _: () = assert!(offset_of!(WormRecord, color) == 96);
const _: () = assert!(offset_of!(WormRecord, radius) == 108);

// ============================================================================
// Compute parameters
// ============================================================================

/// Uniform block read by the compute kernel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ComputeParameters {
    pub delta_time: f32,
    pub delta_rotation: f32,
    pub exaggeration: f32,
    pub speed: f32,
    pub seed: [f32; 4],
    pub gravity: f32,
    pub _padding: [f32; 3],
}

pub const COMPUTE_PARAMETERS_SIZE: usize = 48;

pub const COMPUTE_FIELDS: &[Field] = &[
    Field::new("delta_time", 0, 4),
    Field::new("delta_rotation", 4, 4),
    Field::new("exaggeration", 8, 4),
    Field::new("speed", 12, 4),
    Field::new("seed", 16, 16),
    Field::new("gravity", 32, 4),
];

const _: () = assert!(size_of::<ComputeParameters>() == COMPUTE_PARAMETERS_SIZE);
const _: () = assert!(offset_of!(ComputeParameters, delta_time) == 0);
const _: () = assert!(offset_of!(ComputeParameters, delta_rotation) == 4);
const _: () = assert!(offset_of!(ComputeParameters, exaggeration) == 8);
const _: () = assert!(offset_of!(ComputeParameters, speed) == 12);
const _: () = assert!(offset_of!(ComputeParameters, seed) == 16);
const _: () = assert!(offset_of!(ComputeParameters, gravity) == 32);

impl ComputeParameters {
    /// Pack tunables, leaving `delta_time` at zero.
    pub fn new(tunables: &ComputeTunables) -> Self {
        let mut parameters = Self::zeroed();
        parameters.set_tunables(tunables);
        parameters
    }

    /// Overwrite every field except `delta_time`.
    pub fn set_tunables(&mut self, tunables: &ComputeTunables) {
        self.delta_rotation = tunables.delta_rotation;
        self.exaggeration = tunables.exaggeration;
        self.speed = tunables.speed;
        self.seed = tunables.seed.to_array();
        self.gravity = tunables.gravity;
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

// ============================================================================
// Render parameters
// ============================================================================

/// Uniform block read by the render kernel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct RenderParameters {
    /// Camera-to-world matrix, column major.
    pub inverse_view: [[f32; 4]; 4],
    pub light: [f32; 3],
    pub _pad0: f32,
    pub background: [f32; 3],
    pub _pad1: f32,
    pub viewport: [f32; 2],
    pub fov: f32,
    pub smooth_union: f32,
}

pub const RENDER_PARAMETERS_SIZE: usize = 112;

pub const RENDER_FIELDS: &[Field] = &[
    Field::new("inverse_view", 0, 64),
    Field::new("light", 64, 12),
    Field::new("background", 80, 12),
    Field::new("viewport", 96, 8),
    Field::new("fov", 104, 4),
    Field::new("smooth_union", 108, 4),
];

const _: () = assert!(size_of::<RenderParameters>() == RENDER_PARAMETERS_SIZE);
const _: () = assert!(offset_of!(RenderParameters, inverse_view) == 0);
const _: () = assert!(offset_of!(RenderParameters, light) == 64);
const _: () = assert!(offset_of!(RenderParameters, background) == 80);
const _: () = assert!(offset_of!(RenderParameters, viewport) == 96);
const _: () = assert!(offset_of!(RenderParameters, fov) == 104);
const _: () = assert!(offset_of!(RenderParameters, smooth_union) == 108);

/// Point the camera orbits and looks at.
const ORIGIN: Vec3 = Vec3::ZERO;
const UP: Vec3 = Vec3::Y;

impl RenderParameters {
    /// Derive the block from camera/light angles and the viewport.
    ///
    /// The light's azimuth is negated before conversion while the camera's
    /// is not; the lighting in the kernel is tuned for that convention.
    pub fn new(tunables: &RenderTunables) -> Self {
        let camera = tunables.camera.to_cartesian();
        let light = Spherical {
            azimuth: -tunables.light.azimuth,
            ..tunables.light
        }
        .to_cartesian();

        let inverse_view = Mat4::look_at_rh(camera, ORIGIN, UP).inverse();

        Self {
            inverse_view: inverse_view.to_cols_array_2d(),
            light: light.to_array(),
            _pad0: 0.0,
            background: tunables.background.to_array(),
            _pad1: 0.0,
            viewport: [tunables.viewport.width, tunables.viewport.height],
            fov: tunables.fov,
            smooth_union: tunables.smooth_union,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Viewport;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_2;

    fn le(bits: u32) -> [u8; 4] {
        bits.to_le_bytes()
    }

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn check_table(fields: &[Field], size: usize) {
        for pair in fields.windows(2) {
            assert!(pair[0].offset + pair[0].size <= pair[1].offset);
        }
        let last = fields.last().unwrap();
        assert!(last.offset + last.size <= size);
    }

    #[test]
    fn test_tables_are_ordered_and_fit() {
        check_table(WORM_FIELDS, WORM_RECORD_SIZE);
        check_table(COMPUTE_FIELDS, COMPUTE_PARAMETERS_SIZE);
        check_table(RENDER_FIELDS, RENDER_PARAMETERS_SIZE);
    }

    #[test]
    fn test_compute_parameters_golden_bytes() {
        let tunables = ComputeTunables {
            delta_rotation: 0.5,
            exaggeration: 5.0,
            speed: 10.0,
            seed: Vec4::new(1.0, 2.0, 3.0, 4.0),
            gravity: -1.0,
        };
        let mut parameters = ComputeParameters::new(&tunables);
        parameters.delta_time = 0.25;

        let mut expected = Vec::new();
        expected.extend_from_slice(&le(0x3E80_0000)); // delta_time 0.25
        expected.extend_from_slice(&le(0x3F00_0000)); // delta_rotation 0.5
        expected.extend_from_slice(&le(0x40A0_0000)); // exaggeration 5
        expected.extend_from_slice(&le(0x4120_0000)); // speed 10
        expected.extend_from_slice(&le(0x3F80_0000)); // seed.x 1
        expected.extend_from_slice(&le(0x4000_0000)); // seed.y 2
        expected.extend_from_slice(&le(0x4040_0000)); // seed.z 3
        expected.extend_from_slice(&le(0x4080_0000)); // seed.w 4
        expected.extend_from_slice(&le(0xBF80_0000)); // gravity -1
        expected.extend_from_slice(&[0u8; 12]);

        assert_eq!(parameters.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_set_tunables_keeps_delta_time() {
        let mut parameters = ComputeParameters::new(&ComputeTunables::default());
        parameters.delta_time = 0.016;
        parameters.set_tunables(&ComputeTunables {
            speed: 2.0,
            ..ComputeTunables::default()
        });
        assert_eq!(parameters.delta_time, 0.016);
        assert_eq!(parameters.speed, 2.0);
    }

    fn render_tunables() -> RenderTunables {
        RenderTunables {
            camera: Spherical::new(0.0, FRAC_PI_2).with_radius(2.0),
            // On the pole the light converts to exactly (+0, r, +0) once its
            // azimuth is negated to +1.
            light: Spherical::new(-1.0, 0.0).with_radius(3.0),
            viewport: Viewport::new(800.0, 600.0),
            fov: 90.0,
            smooth_union: 0.5,
            background: Vec3::new(0.25, 0.5, 1.0),
        }
    }

    #[test]
    fn test_render_parameters_golden_bytes() {
        let parameters = RenderParameters::new(&render_tunables());
        let bytes = parameters.as_bytes();
        assert_eq!(bytes.len(), RENDER_PARAMETERS_SIZE);

        let mut expected = Vec::new();
        expected.extend_from_slice(&le(0x0000_0000)); // light.x 0
        expected.extend_from_slice(&le(0x4040_0000)); // light.y 3
        expected.extend_from_slice(&le(0x0000_0000)); // light.z 0
        expected.extend_from_slice(&le(0x0000_0000)); // pad
        expected.extend_from_slice(&le(0x3E80_0000)); // background.r 0.25
        expected.extend_from_slice(&le(0x3F00_0000)); // background.g 0.5
        expected.extend_from_slice(&le(0x3F80_0000)); // background.b 1
        expected.extend_from_slice(&le(0x0000_0000)); // pad
        expected.extend_from_slice(&le(0x4448_0000)); // width 800
        expected.extend_from_slice(&le(0x4416_0000)); // height 600
        expected.extend_from_slice(&le(0x42B4_0000)); // fov 90
        expected.extend_from_slice(&le(0x3F00_0000)); // smooth_union 0.5

        assert_eq!(&bytes[64..], expected.as_slice());
    }

    #[test]
    fn test_inverse_view_places_camera() {
        let parameters = RenderParameters::new(&render_tunables());
        let bytes = parameters.as_bytes();

        // Column 3 of the camera-to-world matrix is the camera position.
        let translation = Vec3::new(read_f32(bytes, 48), read_f32(bytes, 52), read_f32(bytes, 56));
        assert!(translation.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-4));
        assert!((read_f32(bytes, 60) - 1.0).abs() < 1e-6);

        // Looking down -Z from +Z: the camera axes line up with the world's.
        let inverse_view = Mat4::from_cols_array_2d(&parameters.inverse_view);
        let forward = inverse_view.transform_vector3(Vec3::NEG_Z);
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn test_light_azimuth_is_negated() {
        let mut tunables = render_tunables();
        tunables.light = Spherical::new(FRAC_PI_2, FRAC_PI_2);
        tunables.camera = Spherical::new(FRAC_PI_2, FRAC_PI_2).with_radius(5.0);

        let parameters = RenderParameters::new(&tunables);
        let light = Vec3::from_array(parameters.light);
        let camera = Mat4::from_cols_array_2d(&parameters.inverse_view).w_axis.truncate();

        assert!(light.abs_diff_eq(Vec3::NEG_X, 1e-4));
        assert!(camera.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
    }
}
