/// Resource definitions for the viewer.
///
/// The render state wraps the engine and its frame buffer; everything else
/// here is bookkeeping for logging and the on-screen texture.

use bevy::prelude::*;
use std::time::Duration;

use crate::march::config::InitialConfig;
use crate::march::display::{ControlInputs, FrameBuffer, FrameScanner};
use crate::march::engine::PixelEngine;
use crate::march::ray::RayGenerator;

// ============================================================================
// Frame Tracking
// ============================================================================

/// Number of frames rendered since startup.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounter(pub u64);

impl FrameCounter {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

/// Cost and coverage of the most recent frame.
#[derive(Resource, Debug, Default)]
pub struct FramePerformance {
    pub last_duration: Duration,
    pub last_hit_count: usize,
}

// ============================================================================
// Render State
// ============================================================================

/// The engine plus everything needed to scan one frame through it.
#[derive(Resource)]
pub struct RenderState {
    pub engine: PixelEngine,
    pub scanner: FrameScanner,
    pub framebuffer: FrameBuffer,
    pub controls: ControlInputs,
}

impl RenderState {
    pub fn from_config(config: &InitialConfig) -> Self {
        let geometry = config.geometry();
        Self {
            engine: PixelEngine::new(RayGenerator::new(geometry.width, geometry.height)),
            scanner: FrameScanner::new(geometry),
            framebuffer: FrameBuffer::new(geometry),
            controls: config.controls(),
        }
    }

    /// Scan one full frame into the frame buffer.
    pub fn render(&mut self) {
        let Self { engine, scanner, framebuffer, controls } = self;
        scanner.render_frame(engine, controls, framebuffer);
    }
}

/// Texture the frame buffer is uploaded into each frame.
#[derive(Resource)]
pub struct FrameTarget(pub Handle<Image>);
