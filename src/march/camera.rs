//! Camera orbit driven by the Minsky circle recurrence (HAKMEM item 149).
//!
//! `(c, s)` rotates by about `2^-CAMERA_SHIFT` radians per frame using two
//! shifted adds. The update is not norm preserving; the slow wobble in orbit
//! radius is the intended look and is reproduced exactly.

use serde::{Deserialize, Serialize};

use super::fixed_math::{asr, negate, q, FixedNum, FixedVec3};

/// Per-frame rotation shift. Five gives ~1/32 rad per frame.
pub const CAMERA_SHIFT: u32 = 5;

/// Distance from the orbit centre to the camera (5.0).
pub const ORBIT_RADIUS: FixedNum = q(0x0500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraOrbit {
    pub c: FixedNum,
    pub s: FixedNum,
}

impl Default for CameraOrbit {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl CameraOrbit {
    /// `(1.0, 0.0)`: camera on the negative z axis, five units from the origin.
    pub const INITIAL: Self = Self { c: q(0x0100), s: q(0) };

    /// Advance one frame. `s` reads the already-updated `c`.
    pub fn advance(&mut self) {
        self.c = self.c.wrapping_sub(asr(self.s, CAMERA_SHIFT));
        self.s = self.s.wrapping_add(asr(self.c, CAMERA_SHIFT));
    }

    pub fn reset(&mut self) {
        *self = Self::INITIAL;
    }

    /// Camera position `(R*s, 0, -R*c)`.
    ///
    /// The orbit angle is measured from the negative z axis, so the rest state
    /// sits at `(0, 0, -5)`. The products are by the constant orbit radius.
    pub fn position(&self) -> FixedVec3 {
        FixedVec3::new(
            ORBIT_RADIUS.wrapping_mul(self.s),
            FixedNum::ZERO,
            negate(ORBIT_RADIUS.wrapping_mul(self.c)),
        )
    }

    /// Centre of the sample plane: `focal` along the orbit towards the origin,
    /// `((R - focal)*s, 0, -(R - focal)*c)`.
    ///
    /// The plane itself stays parallel to x/y. Only its centre follows the
    /// orbit, so it sits a constant distance from the origin and the scene
    /// stays in view for the whole revolution. Both products are by constants.
    pub fn sample_origin(&self, focal: FixedNum) -> FixedVec3 {
        let position = self.position();
        FixedVec3::new(
            position.x.wrapping_sub(focal.wrapping_mul(self.s)),
            FixedNum::ZERO,
            position.z.wrapping_add(focal.wrapping_mul(self.c)),
        )
    }

    /// Raw `c² + s²`, for drift checks.
    pub fn norm_squared_bits(&self) -> i32 {
        let (c, s) = (self.c.to_bits() as i32, self.s.to_bits() as i32);
        c * c + s * s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitude(cam: &CameraOrbit) -> f64 {
        (cam.norm_squared_bits() as f64).sqrt()
    }

    #[test]
    fn test_rest_position() {
        let cam = CameraOrbit::default();
        assert_eq!(cam.position().to_bits(), [0, 0, -0x0500]);
        assert_eq!(cam.position().z.to_bits() as u16, 0xFB00);
    }

    #[test]
    fn test_first_steps_turn_counter_clockwise() {
        let mut cam = CameraOrbit::default();
        cam.advance();
        assert_eq!((cam.c.to_bits(), cam.s.to_bits()), (256, 8));
        cam.advance();
        assert_eq!((cam.c.to_bits(), cam.s.to_bits()), (256, 16));
        assert_eq!(cam.position().x.to_bits(), 80);
    }

    #[test]
    fn test_quarter_turn_takes_about_fifty_frames() {
        let mut cam = CameraOrbit::default();
        for _ in 0..51 {
            cam.advance();
        }
        assert_eq!((cam.c.to_bits(), cam.s.to_bits()), (32, 256));
    }

    #[test]
    fn test_magnitude_drift_is_bounded_over_64_frames() {
        let mut cam = CameraOrbit::default();
        for frame in 0..64 {
            cam.advance();
            let m = magnitude(&cam);
            assert!((m - 256.0).abs() <= 256.0 * 0.05, "frame {frame}: |(c, s)| = {m}");
        }
    }

    #[test]
    fn test_long_run_neither_spirals_out_nor_collapses() {
        let mut cam = CameraOrbit::default();
        for frame in 0..4096 {
            cam.advance();
            let m = magnitude(&cam);
            assert!((192.0..=320.0).contains(&m), "frame {frame}: |(c, s)| = {m}");
        }
    }

    #[test]
    fn test_sample_origin_keeps_constant_distance() {
        let mut cam = CameraOrbit::default();
        assert_eq!(cam.sample_origin(q(0x0400)).to_bits(), [0, 0, -0x0100]);

        for _ in 0..51 {
            cam.advance();
        }
        // (c, s) = (32, 256): 5*256 - 4*256 and -5*32 + 4*32.
        assert_eq!(cam.sample_origin(q(0x0400)).to_bits(), [256, 0, -32]);

        for frame in 0..256 {
            cam.advance();
            let [x, _, z] = cam.sample_origin(q(0x0400)).to_bits().map(|v| v as f64);
            let distance = (x * x + z * z).sqrt();
            assert!((192.0..=320.0).contains(&distance), "frame {frame}: {distance}");
        }
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut cam = CameraOrbit::default();
        for _ in 0..17 {
            cam.advance();
        }
        cam.reset();
        assert_eq!(cam, CameraOrbit::INITIAL);
    }
}
