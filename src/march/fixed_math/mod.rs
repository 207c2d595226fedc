//! Q8.8 fixed-point primitives for the shift-add datapath.
//!
//! Every operation here is an add, a subtract, or an arithmetic shift. Sums
//! wrap at 16 bits and nothing saturates.

use fixed::types::I8F8;

pub use vec::{FixedVec2, FixedVec3};

mod vec;

/// Fixed-point scalar used throughout the renderer.
///
/// I8F8: 8 integer bits, 8 fractional bits. Range is about [-128, 127.996]
/// with a resolution of 1/256.
pub type FixedNum = I8F8;

/// Build a scalar from its raw Q8.8 bits, e.g. `q(0x0180)` is 1.5.
#[inline]
pub const fn q(bits: i16) -> FixedNum {
    FixedNum::from_bits(bits)
}

/// Sign-extending shift right (floor division by 2^n).
#[inline]
pub fn asr(v: FixedNum, n: u32) -> FixedNum {
    v >> n
}

/// True two's-complement negate, wrapping `-128.0` onto itself.
#[inline]
pub fn negate(v: FixedNum) -> FixedNum {
    v.wrapping_neg()
}

/// One's complement, `-v - 1` in raw bits.
///
/// The CORDIC paths use this in place of [`negate`] to flip a vector that the
/// pre-rotation left pointing along negative x. `invert(invert(v)) == v` but
/// `invert(v) != negate(v)`; the one-LSB bias shows up in every rendered frame.
#[inline]
pub fn invert(v: FixedNum) -> FixedNum {
    !v
}

/// CORDIC gain correction, `x * 0.625` as `(x >> 1) + (x >> 3)`.
#[inline]
pub fn gain_correct(v: FixedNum) -> FixedNum {
    asr(v, 1).wrapping_add(asr(v, 3))
}

/// Sign bit of a scalar. Zero counts as non-negative.
#[inline]
pub fn sign(v: FixedNum) -> bool {
    v.is_negative()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asr_rounds_toward_negative_infinity() {
        assert_eq!(asr(q(5), 1).to_bits(), 2);
        assert_eq!(asr(q(-5), 1).to_bits(), -3);
        assert_eq!(asr(q(-1), 4).to_bits(), -1);
        assert_eq!(asr(q(0x0100), 8).to_bits(), 1);
    }

    #[test]
    fn test_invert_is_off_by_one_negate() {
        for bits in [-300i16, -1, 0, 1, 77, 0x0100, i16::MAX] {
            let v = q(bits);
            assert_eq!(invert(v).to_bits(), negate(v).to_bits().wrapping_sub(1));
            assert_eq!(invert(invert(v)), v);
        }
    }

    #[test]
    fn test_negate_wraps_at_minimum() {
        assert_eq!(negate(FixedNum::MIN), FixedNum::MIN);
        assert_eq!(negate(q(0x0100)).to_bits(), -0x0100);
    }

    #[test]
    fn test_gain_correct_matches_shift_add() {
        assert_eq!(gain_correct(q(256)).to_bits(), 160);
        assert_eq!(gain_correct(q(262)).to_bits(), 131 + 32);
        // Each shift floors on its own, so negative inputs are not mirrored.
        assert_eq!(gain_correct(q(-256)).to_bits(), -160);
        assert_eq!(gain_correct(q(-3)).to_bits(), -2 + -1);
    }

    #[test]
    fn test_wrapping_add_reproduces_16_bit_overflow() {
        let big = q(i16::MAX);
        assert_eq!(big.wrapping_add(q(1)), FixedNum::MIN);
    }
}
