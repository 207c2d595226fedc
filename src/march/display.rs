//! Display-side collaborator: mode selection, RGB332 encoding and the raster
//! scan that feeds the engine one coordinate per tick.

use bevy::log::warn;
use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use super::engine::{PixelEngine, TickInput};
use super::pipeline::{PixelOut, PIPELINE_DEPTH};
use super::sdf::Scene;

/// Output modes, in `ui_in[1:0]` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    TestPattern,
    #[default]
    Render,
    Debug,
    Solid,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::TestPattern,
        DisplayMode::Render,
        DisplayMode::Debug,
        DisplayMode::Solid,
    ];

    pub fn decode(bits: u8) -> DisplayMode {
        Self::ALL[(bits & 0b11) as usize]
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> DisplayMode {
        Self::decode(self.bits() + 1)
    }
}

/// Control byte as presented on the input pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlInputs {
    pub mode: DisplayMode,
    /// Raw 2-bit scene selector.
    pub scene: u8,
    pub animation_enabled: bool,
}

impl ControlInputs {
    /// `ui_in[1:0]` mode, `ui_in[3:2]` scene, `ui_in[4]` animation enable.
    pub fn from_ui_in(ui_in: u8) -> Self {
        Self {
            mode: DisplayMode::decode(ui_in),
            scene: (ui_in >> 2) & 0b11,
            animation_enabled: ui_in & 0b1_0000 != 0,
        }
    }

    pub fn to_ui_in(self) -> u8 {
        self.mode.bits() | (self.scene & 0b11) << 2 | (self.animation_enabled as u8) << 4
    }
}

/// 3-3-2 colour as driven on the RGB pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb332 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb332 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(7, 7, 3);
    pub const BACKGROUND: Self = Self::new(0, 0, 1);
    pub const GRID: Self = Self::new(2, 0, 0);
    pub const SOLID: Self = Self::new(7, 0, 3);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r: r & 0b111, g: g & 0b111, b: b & 0b11 }
    }

    /// Expand to 8 bits per channel the way the capture harness does.
    pub fn to_rgb888(self) -> [u8; 3] {
        [
            (self.r as u16 * 255 / 7) as u8,
            (self.g as u16 * 255 / 7) as u8,
            (self.b as u16 * 255 / 3) as u8,
        ]
    }

    pub fn to_byte(self) -> u8 {
        self.r | self.g << 3 | self.b << 6
    }

    pub fn from_byte(byte: u8) -> Self {
        Self::new(byte, byte >> 3, byte >> 6)
    }
}

/// Per-channel right shifts applied to the 6-bit luma; `None` keeps a channel dark.
#[derive(Clone, Copy, Debug)]
struct Palette {
    r: Option<u32>,
    g: Option<u32>,
    b: Option<u32>,
}

impl Palette {
    fn for_scene(scene: Option<Scene>) -> Palette {
        match scene {
            Some(Scene::Sphere) => Palette { r: Some(3), g: Some(3), b: Some(4) },
            Some(Scene::Torus) => Palette { r: None, g: Some(3), b: Some(4) },
            Some(Scene::ModelA) => Palette { r: Some(3), g: Some(4), b: Some(4) },
            Some(Scene::ModelB) => Palette { r: Some(3), g: Some(3), b: None },
            None => Palette { r: None, g: None, b: None },
        }
    }

    fn shade(&self, luma: u8) -> Rgb332 {
        let channel = |shift: Option<u32>| shift.map_or(0, |s| luma >> s);
        Rgb332::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u16,
    pub height: u16,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self { width: 640, height: 480 }
    }
}

impl FrameGeometry {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raster coordinate of a linear pixel index. A zero width is treated as one.
    pub fn coord(&self, index: usize) -> (u16, u16) {
        let width = self.width.max(1) as usize;
        ((index % width) as u16, (index / width) as u16)
    }
}

/// Colour for one emitted sample. `coord` is the coordinate the sample was
/// admitted with, not the one currently entering the pipeline.
pub fn encode(
    controls: &ControlInputs,
    geometry: &FrameGeometry,
    coord: (u16, u16),
    out: PixelOut,
) -> Rgb332 {
    match controls.mode {
        DisplayMode::TestPattern => {
            let bar = (coord.0 as u32 * 8 / geometry.width.max(1) as u32) as u8;
            Rgb332::new(
                if bar & 0b100 != 0 { 7 } else { 0 },
                if bar & 0b010 != 0 { 7 } else { 0 },
                if bar & 0b001 != 0 { 3 } else { 0 },
            )
        }
        DisplayMode::Render => {
            if out.hit {
                Palette::for_scene(Scene::decode(controls.scene)).shade(out.luma)
            } else {
                Rgb332::BACKGROUND
            }
        }
        DisplayMode::Debug => {
            if out.hit {
                Rgb332::new(out.luma >> 3, out.luma >> 3, out.luma >> 4)
            } else if coord.0 % 64 == 0 || coord.1 % 64 == 0 {
                Rgb332::GRID
            } else {
                Rgb332::BLACK
            }
        }
        DisplayMode::Solid => Rgb332::SOLID,
    }
}

/// One captured frame plus the hit mask the pipeline produced for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    geometry: FrameGeometry,
    pixels: Vec<Rgb332>,
    hits: FixedBitSet,
}

impl FrameBuffer {
    pub fn new(geometry: FrameGeometry) -> Self {
        let count = geometry.pixel_count();
        Self {
            geometry,
            pixels: vec![Rgb332::BLACK; count],
            hits: FixedBitSet::with_capacity(count),
        }
    }

    pub fn from_parts(geometry: FrameGeometry, pixels: Vec<Rgb332>, hits: FixedBitSet) -> Self {
        Self { geometry, pixels, hits }
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn set(&mut self, index: usize, color: Rgb332, hit: bool) {
        self.pixels[index] = color;
        self.hits.set(index, hit);
    }

    pub fn pixel(&self, x: u16, y: u16) -> Rgb332 {
        self.pixels[y as usize * self.geometry.width as usize + x as usize]
    }

    pub fn is_hit(&self, x: u16, y: u16) -> bool {
        self.hits.contains(y as usize * self.geometry.width as usize + x as usize)
    }

    pub fn pixels(&self) -> &[Rgb332] {
        &self.pixels
    }

    pub fn hits(&self) -> &FixedBitSet {
        &self.hits
    }

    pub fn hit_count(&self) -> usize {
        self.hits.count_ones(..)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgb332::BLACK);
        self.hits.clear();
    }

    /// RGBA8 bytes, row-major, for texture upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            let [r, g, b] = pixel.to_rgb888();
            data.extend_from_slice(&[r, g, b, 255]);
        }
        data
    }
}

/// Raster-order driver: one coordinate per tick, no blanking.
///
/// Every visible pixel is admitted once, followed by `PIPELINE_DEPTH` flush
/// ticks on a blank coordinate. The sample emitted at tick `t` lands on pixel
/// `t - PIPELINE_DEPTH`, so the pipeline latency never shifts the image.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameScanner {
    pub geometry: FrameGeometry,
}

impl FrameScanner {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self { geometry }
    }

    /// Scan one frame. A buffer sized for a different geometry is replaced
    /// with one that matches the scanner before any pixel is written.
    pub fn render_frame(&self, engine: &mut PixelEngine, controls: &ControlInputs, fb: &mut FrameBuffer) {
        if fb.geometry() != self.geometry {
            warn!(
                "Frame buffer is {:?}, scanner is {:?}; reallocating",
                fb.geometry(),
                self.geometry
            );
            *fb = FrameBuffer::new(self.geometry);
        }
        let count = self.geometry.pixel_count();

        for t in 0..count + PIPELINE_DEPTH {
            let coord = if t < count { self.geometry.coord(t) } else { (0, 0) };
            let out = engine.tick(TickInput {
                coord,
                scene: controls.scene,
                frame_end: t + 1 == count,
                animation_enabled: controls.animation_enabled,
            });

            if let Some(index) = t.checked_sub(PIPELINE_DEPTH) {
                let color = encode(controls, &self.geometry, self.geometry.coord(index), out);
                fb.set(index, color, out.hit);
            }
        }
    }
}
