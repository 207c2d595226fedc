//! Top-level tick controller.
//!
//! [`PixelEngine`] owns the only mutable state in the renderer: the pipeline
//! slots and the camera orbit. Everything it calls is a pure function of the
//! tick's inputs.

use super::camera::CameraOrbit;
use super::pipeline::{PixelOut, PixelPipeline, PIPELINE_DEPTH};
use super::ray::RayGenerator;
use super::sdf::{evaluate_select, SdfResult};

/// Inputs supplied by the display timing collaborator for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Display-space sample coordinate.
    pub coord: (u16, u16),
    /// Raw scene selector; values without a scene render as a miss.
    pub scene: u8,
    /// Frame boundary pulse, high on the last tick of a frame.
    pub frame_end: bool,
    /// Animation enable as sampled on this tick; only read on a frame boundary.
    pub animation_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct PixelEngine {
    rays: RayGenerator,
    pipeline: PixelPipeline<PIPELINE_DEPTH>,
    camera: CameraOrbit,
    ticks: u64,
    frames: u64,
}

impl PixelEngine {
    pub fn new(rays: RayGenerator) -> Self {
        Self {
            rays,
            pipeline: PixelPipeline::new(),
            camera: CameraOrbit::INITIAL,
            ticks: 0,
            frames: 0,
        }
    }

    /// Combinational half of a tick: the SDF result for `input` under the
    /// current camera, before it enters the pipeline.
    pub fn evaluate(&self, input: &TickInput) -> SdfResult {
        let point = self.rays.sample_point(input.coord, &self.camera);
        evaluate_select(input.scene, point, self.rays.light_dir())
    }

    /// Advance one tick and return the sample admitted `PIPELINE_DEPTH` ticks ago.
    ///
    /// Order is fixed: evaluate, shift the pipeline, emit, then on a frame
    /// boundary advance the camera if this tick's input enables animation.
    pub fn tick(&mut self, input: TickInput) -> PixelOut {
        let fresh = PixelOut::from_sdf(&self.evaluate(&input));
        let out = self.pipeline.tick(fresh);
        self.ticks += 1;

        if input.frame_end {
            self.frames += 1;
            if input.animation_enabled {
                self.camera.advance();
            }
        }
        out
    }

    /// Synchronous reset: pipeline to misses, camera to its rest orientation.
    /// The tick and frame counters keep counting.
    pub fn reset(&mut self) {
        self.pipeline.reset();
        self.camera.reset();
    }

    pub fn camera(&self) -> &CameraOrbit {
        &self.camera
    }

    pub fn pipeline(&self) -> &PixelPipeline<PIPELINE_DEPTH> {
        &self.pipeline
    }

    pub fn rays(&self) -> &RayGenerator {
        &self.rays
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::march::sdf::Scene;

    fn engine() -> PixelEngine {
        PixelEngine::new(RayGenerator::new(640, 480))
    }

    fn at(x: u16, y: u16, scene: Scene) -> TickInput {
        TickInput { coord: (x, y), scene: scene.bits(), ..Default::default() }
    }

    fn frame_edge(x: u16, y: u16, animation_enabled: bool) -> TickInput {
        TickInput { frame_end: true, animation_enabled, ..at(x, y, Scene::Sphere) }
    }

    #[test]
    fn test_camera_only_moves_on_frame_end_with_animation() {
        let mut engine = engine();
        engine.tick(frame_edge(0, 0, false));
        assert_eq!(*engine.camera(), CameraOrbit::INITIAL);
        assert_eq!(engine.frames(), 1);

        engine.tick(TickInput { animation_enabled: true, ..at(0, 0, Scene::Sphere) });
        assert_eq!(*engine.camera(), CameraOrbit::INITIAL);

        engine.tick(frame_edge(0, 0, true));
        assert_ne!(*engine.camera(), CameraOrbit::INITIAL);
    }

    #[test]
    fn test_frame_boundary_reads_enable_from_its_own_tick() {
        let mut engine = engine();
        // Enabled mid-frame but low on the boundary tick: no advance.
        engine.tick(TickInput { animation_enabled: true, ..at(0, 0, Scene::Sphere) });
        engine.tick(frame_edge(0, 0, false));
        assert_eq!(*engine.camera(), CameraOrbit::INITIAL);

        // Low all frame, high only on the boundary tick: advances.
        engine.tick(at(0, 0, Scene::Sphere));
        engine.tick(frame_edge(0, 0, true));
        let mut expected = CameraOrbit::INITIAL;
        expected.advance();
        assert_eq!(*engine.camera(), expected);
    }

    #[test]
    fn test_frame_end_sample_uses_pre_advance_camera() {
        let mut engine = engine();
        for _ in 0..20 {
            engine.tick(frame_edge(0, 0, true));
        }
        let input = frame_edge(320, 240, true);
        let expected = PixelOut::from_sdf(&engine.evaluate(&input));
        engine.tick(input);
        for _ in 1..PIPELINE_DEPTH {
            engine.tick(at(0, 0, Scene::Sphere));
        }
        assert_eq!(engine.tick(at(0, 0, Scene::Sphere)), expected);
    }

    #[test]
    fn test_reset_restores_camera_and_pipeline() {
        let mut engine = engine();
        for _ in 0..10 {
            engine.tick(frame_edge(320, 240, true));
        }
        engine.reset();
        assert_eq!(*engine.camera(), CameraOrbit::INITIAL);
        assert_eq!(engine.pipeline().output(), PixelOut::MISS);
        assert!(engine.pipeline().slots().all(|s| s == PixelOut::MISS));
        assert_eq!(engine.ticks(), 10);
    }

    #[test]
    fn test_unknown_scene_selector_emits_miss() {
        let mut engine = engine();
        let bogus = TickInput { coord: (320, 240), scene: 9, ..Default::default() };
        for _ in 0..=PIPELINE_DEPTH {
            assert_eq!(engine.tick(bogus), PixelOut::MISS);
        }
    }
}
