//! Signed distance evaluators for the fixed scene set.
//!
//! Every evaluator is a pure function of `(point, light)` built from one or
//! two CORDIC passes. The scene selector only routes; it holds no state.

use serde::{Deserialize, Serialize};

use super::fixed_math::{FixedNum, FixedVec3};

pub mod models;
pub mod primitives;

pub use models::{union, Part, MODEL_A, MODEL_B};
pub use primitives::{sphere, torus, HIT_THRESHOLD, SPHERE_RADIUS, TORUS_MAJOR, TORUS_MINOR};

/// Outcome of one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SdfResult {
    /// `distance < HIT_THRESHOLD`. A distance equal to the threshold is a miss.
    pub hit: bool,
    /// `dot(normal, light)` clamped to zero.
    pub light: FixedNum,
    /// Signed distance, negative inside.
    pub distance: FixedNum,
}

impl SdfResult {
    /// Nothing there: used for undecodable selectors and as the union seed.
    pub const MISS: Self = Self {
        hit: false,
        light: FixedNum::ZERO,
        distance: FixedNum::MAX,
    };

    /// Apply the hit and light policy to a raw distance and light term.
    pub fn classify(distance: FixedNum, light: FixedNum) -> Self {
        Self {
            hit: distance < HIT_THRESHOLD,
            light: light.max(FixedNum::ZERO),
            distance,
        }
    }
}

/// The four hand-authored scenes, in selector order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    #[default]
    Sphere,
    Torus,
    ModelA,
    ModelB,
}

impl Scene {
    pub const ALL: [Scene; 4] = [Scene::Sphere, Scene::Torus, Scene::ModelA, Scene::ModelB];

    /// Map a selector value onto a scene. Anything past 3 is not a scene.
    pub fn decode(bits: u8) -> Option<Scene> {
        Self::ALL.get(bits as usize).copied()
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Scene {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Scene::Sphere => "sphere",
            Scene::Torus => "torus",
            Scene::ModelA => "model_a",
            Scene::ModelB => "model_b",
        }
    }
}

/// Evaluate one scene at `point`.
pub fn evaluate(scene: Scene, point: FixedVec3, light: FixedVec3) -> SdfResult {
    match scene {
        Scene::Sphere => sphere(point, light, SPHERE_RADIUS),
        Scene::Torus => torus(point, light, TORUS_MAJOR, TORUS_MINOR),
        Scene::ModelA => union(MODEL_A, point, light),
        Scene::ModelB => union(MODEL_B, point, light),
    }
}

/// Evaluate by raw selector; an unknown selector yields [`SdfResult::MISS`].
pub fn evaluate_select(bits: u8, point: FixedVec3, light: FixedVec3) -> SdfResult {
    match Scene::decode(bits) {
        Some(scene) => evaluate(scene, point, light),
        None => SdfResult::MISS,
    }
}
