//! Hand-authored character scenes, built as unions of the two templates.

use crate::march::fixed_math::{q, FixedNum, FixedVec3};

use super::primitives::{sphere, torus};
use super::SdfResult;

/// One primitive of a model, placed by translation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    Sphere {
        center: FixedVec3,
        radius: FixedNum,
    },
    Torus {
        center: FixedVec3,
        major: FixedNum,
        minor: FixedNum,
    },
}

impl Part {
    pub fn evaluate(&self, point: FixedVec3, light: FixedVec3) -> SdfResult {
        match *self {
            Part::Sphere { center, radius } => sphere(point - center, light, radius),
            Part::Torus { center, major, minor } => torus(point - center, light, major, minor),
        }
    }
}

/// Round character: body, two stubby arms, two feet.
pub const MODEL_A: &[Part] = &[
    Part::Sphere { center: FixedVec3::from_bits(0, 0, 0), radius: q(0x0140) },
    Part::Sphere { center: FixedVec3::from_bits(-0x0140, 0x0040, 0), radius: q(0x0066) },
    Part::Sphere { center: FixedVec3::from_bits(0x0140, 0x0040, 0), radius: q(0x0066) },
    Part::Sphere { center: FixedVec3::from_bits(-0x00c0, -0x0120, 0x0040), radius: q(0x0080) },
    Part::Sphere { center: FixedVec3::from_bits(0x00c0, -0x0120, 0x0040), radius: q(0x0080) },
];

/// Eared character: head, two ears, body and a ring for a tail.
pub const MODEL_B: &[Part] = &[
    Part::Sphere { center: FixedVec3::from_bits(0, 0x0040, 0), radius: q(0x0100) },
    Part::Sphere { center: FixedVec3::from_bits(-0x00c0, 0x0160, 0), radius: q(0x0060) },
    Part::Sphere { center: FixedVec3::from_bits(0x00c0, 0x0160, 0), radius: q(0x0060) },
    Part::Sphere { center: FixedVec3::from_bits(0, -0x0140, 0x0040), radius: q(0x00e0) },
    Part::Torus {
        center: FixedVec3::from_bits(0x0140, -0x0100, 0x0080),
        major: q(0x0080),
        minor: q(0x0020),
    },
];

/// Minimum-distance union. The first part wins ties; its light goes with it.
pub fn union(parts: &[Part], point: FixedVec3, light: FixedVec3) -> SdfResult {
    parts
        .iter()
        .map(|part| part.evaluate(point, light))
        .fold(SdfResult::MISS, |best, candidate| {
            if candidate.distance < best.distance {
                candidate
            } else {
                best
            }
        })
}
