//! Multiplier-free SDF renderer, one sample per pixel tick.
//!
//! Leaves first: [`fixed_math`] and [`cordic`] are the arithmetic, [`sdf`] and
//! [`ray`] turn a pixel into a hit and a light value, [`pipeline`] and
//! [`camera`] hold the only clocked state, and [`engine`] ties them into a
//! single `tick()`. [`display`], [`capture`] and [`viewer`] are the world
//! around the engine.

use bevy::prelude::*;

pub mod camera;
pub mod capture;
pub mod config;
pub mod cordic;
pub mod display;
pub mod engine;
pub mod fixed_math;
pub mod pipeline;
pub mod profiling;
pub mod ray;
pub mod sdf;
pub mod viewer;

use config::MarchConfigPlugin;
use viewer::{MarchCorePlugin, ViewerPlugin};

pub struct MarchPlugin;

impl Plugin for MarchPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MarchConfigPlugin,
            MarchCorePlugin,
            ViewerPlugin,
        ));
    }
}
