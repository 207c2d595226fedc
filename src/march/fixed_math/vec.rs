use serde::{Deserialize, Serialize};

use super::FixedNum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVec2 {
    pub x: FixedNum,
    pub y: FixedNum,
}

impl FixedVec2 {
    pub const ZERO: Self = Self { x: FixedNum::ZERO, y: FixedNum::ZERO };

    pub const fn new(x: FixedNum, y: FixedNum) -> Self {
        Self { x, y }
    }

    pub const fn from_bits(x: i16, y: i16) -> Self {
        Self {
            x: FixedNum::from_bits(x),
            y: FixedNum::from_bits(y),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVec3 {
    pub x: FixedNum,
    pub y: FixedNum,
    pub z: FixedNum,
}

impl FixedVec3 {
    pub const ZERO: Self = Self {
        x: FixedNum::ZERO,
        y: FixedNum::ZERO,
        z: FixedNum::ZERO,
    };

    pub const fn new(x: FixedNum, y: FixedNum, z: FixedNum) -> Self {
        Self { x, y, z }
    }

    /// Construct from raw Q8.8 components.
    pub const fn from_bits(x: i16, y: i16, z: i16) -> Self {
        Self {
            x: FixedNum::from_bits(x),
            y: FixedNum::from_bits(y),
            z: FixedNum::from_bits(z),
        }
    }

    /// Return raw Q8.8 components.
    pub fn to_bits(self) -> [i16; 3] {
        [self.x.to_bits(), self.y.to_bits(), self.z.to_bits()]
    }

    pub fn xy(self) -> FixedVec2 {
        FixedVec2::new(self.x, self.y)
    }

    pub fn xz(self) -> FixedVec2 {
        FixedVec2::new(self.x, self.z)
    }
}

impl std::ops::Add for FixedVec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.wrapping_add(rhs.x),
            y: self.y.wrapping_add(rhs.y),
            z: self.z.wrapping_add(rhs.z),
        }
    }
}

impl std::ops::Sub for FixedVec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.wrapping_sub(rhs.x),
            y: self.y.wrapping_sub(rhs.y),
            z: self.z.wrapping_sub(rhs.z),
        }
    }
}
