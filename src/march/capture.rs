//! Frame capture: PPM and PNG images for viewing, gzipped bincode dumps for
//! differential checks against stored renders.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use bevy::log::info;
use fixedbitset::FixedBitSet;
use image::{ImageBuffer, RgbImage};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::display::{ControlInputs, FrameBuffer, FrameGeometry, Rgb332};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame encoding failed: {0}")]
    Encode(#[from] bincode::Error),
    #[error("png encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("golden frame has {found} pixel bytes, expected {expected}")]
    PixelsTruncated { expected: usize, found: usize },
    #[error("golden frame has {found} hit mask bytes, expected {expected}")]
    HitsTruncated { expected: usize, found: usize },
}

/// Write `fb` as a plain (P3) PPM, one raster line per text line.
pub fn write_ppm<W: Write>(fb: &FrameBuffer, mut writer: W) -> Result<(), CaptureError> {
    let geometry = fb.geometry();
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", geometry.width, geometry.height)?;
    writeln!(writer, "255")?;

    for row in fb.pixels().chunks(geometry.width.max(1) as usize) {
        for pixel in row {
            let [r, g, b] = pixel.to_rgb888();
            write!(writer, "{r} {g} {b} ")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_ppm(fb: &FrameBuffer, path: &Path) -> Result<(), CaptureError> {
    write_ppm(fb, BufWriter::new(File::create(path)?))?;
    info!("Saved {} pixels to {}", fb.pixels().len(), path.display());
    Ok(())
}

/// Write `fb` as an 8-bit RGB PNG, expanded the same way as the PPM.
pub fn save_png(fb: &FrameBuffer, path: &Path) -> Result<(), CaptureError> {
    let geometry = fb.geometry();
    let data: Vec<u8> = fb.pixels().iter().flat_map(|p| p.to_rgb888()).collect();
    let img: RgbImage = ImageBuffer::from_vec(geometry.width as u32, geometry.height as u32, data)
        .ok_or(CaptureError::PixelsTruncated {
            expected: geometry.pixel_count(),
            found: fb.pixels().len(),
        })?;
    img.save(path)?;
    info!("Saved {}x{} png to {}", geometry.width, geometry.height, path.display());
    Ok(())
}

/// Re-encode an existing P3 PPM as PNG.
pub fn convert_ppm_to_png(ppm: &Path, png: &Path) -> Result<(), CaptureError> {
    let img = image::open(ppm)?.to_rgb8();
    img.save(png)?;
    info!("Converted {} -> {}", ppm.display(), png.display());
    Ok(())
}

/// Serialisable snapshot of a rendered frame and the controls that made it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenFrame {
    pub geometry: FrameGeometry,
    pub controls: ControlInputs,
    /// Frame index the snapshot was taken at.
    pub frame: u64,
    /// One RGB332 byte per pixel.
    pub pixels: Vec<u8>,
    /// Hit mask packed into bytes, LSB first.
    pub hits: Vec<u8>,
}

impl GoldenFrame {
    pub fn from_frame(fb: &FrameBuffer, controls: ControlInputs, frame: u64) -> Self {
        let count = fb.pixels().len();
        let mut hits = vec![0u8; count.div_ceil(8)];
        for index in fb.hits().ones() {
            hits[index / 8] |= 1 << (index % 8);
        }
        Self {
            geometry: fb.geometry(),
            controls,
            frame,
            pixels: fb.pixels().iter().map(|p| p.to_byte()).collect(),
            hits,
        }
    }

    pub fn to_frame(&self) -> Result<FrameBuffer, CaptureError> {
        let count = self.geometry.pixel_count();
        if self.pixels.len() != count {
            return Err(CaptureError::PixelsTruncated { expected: count, found: self.pixels.len() });
        }
        if self.hits.len() < count.div_ceil(8) {
            return Err(CaptureError::HitsTruncated { expected: count.div_ceil(8), found: self.hits.len() });
        }
        let mut hits = FixedBitSet::with_capacity(count);
        for index in 0..count {
            hits.set(index, self.hits[index / 8] & (1 << (index % 8)) != 0);
        }
        let pixels = self.pixels.iter().map(|&b| Rgb332::from_byte(b)).collect();
        Ok(FrameBuffer::from_parts(self.geometry, pixels, hits))
    }
}

pub fn save_golden(golden: &GoldenFrame, path: &Path) -> Result<(), CaptureError> {
    let mut encoder = GzEncoder::new(BufWriter::new(File::create(path)?), Compression::default());
    bincode::serialize_into(&mut encoder, golden)?;
    encoder.finish()?.flush()?;
    Ok(())
}

pub fn load_golden(path: &Path) -> Result<GoldenFrame, CaptureError> {
    let decoder = GzDecoder::new(BufReader::new(File::open(path)?));
    Ok(bincode::deserialize_from(decoder)?)
}

/// Pixel-level comparison of two frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameDiff {
    pub mismatched_pixels: usize,
    pub mismatched_hits: usize,
    pub first_mismatch: Option<(u16, u16)>,
}

impl FrameDiff {
    pub fn is_identical(&self) -> bool {
        self.mismatched_pixels == 0 && self.mismatched_hits == 0
    }
}

/// Compare two frames of the same geometry; a geometry mismatch counts every
/// pixel of the larger frame as different.
pub fn diff_frames(a: &FrameBuffer, b: &FrameBuffer) -> FrameDiff {
    if a.geometry() != b.geometry() {
        let count = a.pixels().len().max(b.pixels().len());
        return FrameDiff {
            mismatched_pixels: count,
            mismatched_hits: count,
            first_mismatch: Some((0, 0)),
        };
    }

    let geometry = a.geometry();
    let mut diff = FrameDiff::default();
    for (index, (pa, pb)) in a.pixels().iter().zip(b.pixels()).enumerate() {
        let hit_differs = a.hits().contains(index) != b.hits().contains(index);
        if pa != pb {
            diff.mismatched_pixels += 1;
        }
        if hit_differs {
            diff.mismatched_hits += 1;
        }
        if (pa != pb || hit_differs) && diff.first_mismatch.is_none() {
            diff.first_mismatch = Some(geometry.coord(index));
        }
    }
    diff
}
