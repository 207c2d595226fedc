//! Display coordinate to scene-space sample point.
//!
//! Each pixel is sampled at a single point on a plane `FOCAL` units along the
//! orbit from the camera. There is no per-pixel direction and no stepping
//! along a ray: the SDF stage decides hit or miss from that one point.

use super::camera::CameraOrbit;
use super::fixed_math::{q, FixedNum, FixedVec3};

/// Pixel pitch as a left shift of the raw offset: 1 px = 4/256 = 1/64 unit.
pub const PIXEL_SHIFT: u32 = 2;

/// Distance from the camera to the sample plane (4.0).
pub const FOCAL: FixedNum = q(0x0400);

/// Fixed light direction, roughly unit length: (-0.3125, 0.375, -0.875).
pub const LIGHT_DIR: FixedVec3 = FixedVec3::from_bits(-0x0050, 0x0060, -0x00e0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayGenerator {
    center_x: i16,
    center_y: i16,
}

impl RayGenerator {
    /// Generator for a `width` x `height` raster, centred on the middle pixel.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            center_x: (width / 2) as i16,
            center_y: (height / 2) as i16,
        }
    }

    /// Scene-space point for display coordinate `(x, y)`; y grows downward.
    pub fn sample_point(&self, coord: (u16, u16), camera: &CameraOrbit) -> FixedVec3 {
        let u = (coord.0 as i16).wrapping_sub(self.center_x).wrapping_shl(PIXEL_SHIFT);
        let v = self.center_y.wrapping_sub(coord.1 as i16).wrapping_shl(PIXEL_SHIFT);
        camera.sample_origin(FOCAL) + FixedVec3::new(FixedNum::from_bits(u), FixedNum::from_bits(v), FixedNum::ZERO)
    }

    pub fn light_dir(&self) -> FixedVec3 {
        LIGHT_DIR
    }
}
