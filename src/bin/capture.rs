//! Headless capture of the standard frame set.
//!
//! Renders the test pattern and each scene from a freshly reset engine and
//! writes `<name>.ppm`, `<name>.png` and `<name>.golden.gz` into the capture directory
//! (first argument, or `capture_dir` from the initial config).

use std::path::PathBuf;
use std::time::Instant;

use bevy::log::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cordicmarch::march::capture::{save_golden, save_png, save_ppm, CaptureError, GoldenFrame};
use cordicmarch::march::config::{InitialConfig, INITIAL_CONFIG_PATH};
use cordicmarch::march::display::{ControlInputs, DisplayMode, FrameBuffer, FrameScanner};
use cordicmarch::march::engine::PixelEngine;
use cordicmarch::march::ray::RayGenerator;
use cordicmarch::march::sdf::Scene;

fn main() -> Result<(), CaptureError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cordicmarch=info,capture=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let config = InitialConfig::read_or_default(INITIAL_CONFIG_PATH);
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.capture_dir));
    std::fs::create_dir_all(&out_dir)?;

    let geometry = config.geometry();
    let mut shots = vec![(
        "test_pattern",
        ControlInputs { mode: DisplayMode::TestPattern, scene: 0, animation_enabled: false },
    )];
    shots.extend(Scene::ALL.iter().map(|&scene| {
        (
            scene.name(),
            ControlInputs { mode: DisplayMode::Render, scene: scene.bits(), animation_enabled: false },
        )
    }));

    for (name, controls) in shots {
        info!("Capturing {}...", name);
        let start = Instant::now();

        let mut engine = PixelEngine::new(RayGenerator::new(geometry.width, geometry.height));
        let mut fb = FrameBuffer::new(geometry);
        FrameScanner::new(geometry).render_frame(&mut engine, &controls, &mut fb);

        save_ppm(&fb, &out_dir.join(format!("{name}.ppm")))?;
        save_png(&fb, &out_dir.join(format!("{name}.png")))?;
        save_golden(
            &GoldenFrame::from_frame(&fb, controls, engine.frames()),
            &out_dir.join(format!("{name}.golden.gz")),
        )?;
        info!("  {} hits, {:?}", fb.hit_count(), start.elapsed());
    }

    info!("Frames written to {}", out_dir.display());
    Ok(())
}
