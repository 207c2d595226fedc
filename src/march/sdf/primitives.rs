use crate::march::cordic::{cordic2, cordic3};
use crate::march::fixed_math::{q, FixedNum, FixedVec2, FixedVec3};

use super::SdfResult;

/// Surface threshold: distances strictly below 0.5 count as a hit.
pub const HIT_THRESHOLD: FixedNum = q(0x0080);

/// Radius of the single-sphere scene (1.5).
pub const SPHERE_RADIUS: FixedNum = q(0x0180);

/// Major radius of the torus scene, centre of the ring tube (1.25).
pub const TORUS_MAJOR: FixedNum = q(0x0140);

/// Minor radius of the torus scene, tube radius (0.5).
pub const TORUS_MINOR: FixedNum = q(0x0080);

/// Sphere of `radius` at the origin.
///
/// The first pass folds (x, y) into a planar length while carrying the light's
/// (x, y) components; the second folds that length with z, carrying the partial
/// light with the light's z. The second pass's auxiliary output is the full
/// `dot(normal, light)`.
pub fn sphere(point: FixedVec3, light: FixedVec3, radius: FixedNum) -> SdfResult {
    let planar = cordic3(point.xy(), light.xy());
    let full = cordic2(
        FixedVec2::new(planar.length, point.z),
        FixedVec2::new(planar.aux, light.z),
    );
    SdfResult::classify(full.length.wrapping_sub(radius), full.aux)
}

/// Torus around the y axis with ring radius `major` and tube radius `minor`.
///
/// The horizontal pass measures distance from the axis in the x/z plane, which
/// minus `major` is the signed offset from the ring. The second pass folds y
/// with that offset to get the distance to the tube centre line. Operand order
/// matters: y goes first, and the light's y pairs with the carried term.
pub fn torus(point: FixedVec3, light: FixedVec3, major: FixedNum, minor: FixedNum) -> SdfResult {
    let horizontal = cordic3(point.xz(), light.xz());
    let ring_offset = horizontal.length.wrapping_sub(major);
    let tube = cordic2(
        FixedVec2::new(point.y, ring_offset),
        FixedVec2::new(light.y, horizontal.aux),
    );
    SdfResult::classify(tube.length.wrapping_sub(minor), tube.aux)
}
