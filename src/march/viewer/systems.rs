/// Viewer systems.
///
/// Startup builds the render state and the on-screen sprite. Each update
/// applies key presses to the control byte, scans one frame through the
/// engine, and uploads the result.

use std::path::PathBuf;
use std::time::Instant;

use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use crate::march::profiling::profile;

use crate::march::capture::{save_golden, save_ppm, GoldenFrame};
use crate::march::config::{InitialConfig, ViewerConfig, ViewerConfigHandle};
use crate::march::sdf::Scene;

use super::resources::*;

// ============================================================================
// Startup
// ============================================================================

pub fn init_render_state(mut commands: Commands, config: Res<InitialConfig>) {
    let state = RenderState::from_config(&config);
    info!(
        "Render state ready: {}x{}, controls {:?}",
        state.framebuffer.geometry().width,
        state.framebuffer.geometry().height,
        state.controls
    );
    commands.insert_resource(state);
}

pub fn setup_view(mut commands: Commands, mut images: ResMut<Assets<Image>>, config: Res<InitialConfig>) {
    let geometry = config.geometry();
    let size = Extent3d {
        width: geometry.width as u32,
        height: geometry.height as u32,
        depth_or_array_layers: 1,
    };
    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    // Keep the pixels square and hard-edged when the window scales them.
    image.sampler = ImageSampler::nearest();
    let handle = images.add(image);

    commands.spawn(Camera2d);
    commands.spawn(Sprite {
        image: handle.clone(),
        custom_size: Some(Vec2::new(
            geometry.width as f32 * config.window_scale,
            geometry.height as f32 * config.window_scale,
        )),
        ..default()
    });
    commands.insert_resource(FrameTarget(handle));
}

// ============================================================================
// Input
// ============================================================================

/// Apply viewer key bindings to the control byte and the engine.
pub fn handle_controls(
    keys: Res<ButtonInput<KeyCode>>,
    config_handle: Option<Res<ViewerConfigHandle>>,
    viewer_configs: Res<Assets<ViewerConfig>>,
    mut state: ResMut<RenderState>,
) {
    let fallback = ViewerConfig::default();
    let config = config_handle
        .and_then(|handle| viewer_configs.get(&handle.0))
        .unwrap_or(&fallback);

    if keys.just_pressed(config.key_next_scene) {
        let next = Scene::decode(state.controls.scene).unwrap_or_default().next();
        state.controls.scene = next.bits();
        info!("Scene -> {:?}", next);
    }
    if keys.just_pressed(config.key_next_mode) {
        state.controls.mode = state.controls.mode.next();
        info!("Mode -> {:?}", state.controls.mode);
    }
    if keys.just_pressed(config.key_toggle_animation) {
        state.controls.animation_enabled = !state.controls.animation_enabled;
        info!("Animation {}", if state.controls.animation_enabled { "on" } else { "off" });
    }
    if keys.just_pressed(config.key_reset) {
        state.engine.reset();
        info!("Engine reset");
    }
}

pub fn update_from_viewer_config(
    config_handle: Res<ViewerConfigHandle>,
    viewer_configs: Res<Assets<ViewerConfig>>,
    mut events: MessageReader<AssetEvent<ViewerConfig>>,
) {
    for event in events.read() {
        if event.is_modified(config_handle.0.id()) || event.is_loaded_with_dependencies(config_handle.0.id()) {
            if let Some(config) = viewer_configs.get(&config_handle.0) {
                info!("Viewer config loaded/updated: {:?}", config);
            }
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Scan one frame through the engine.
#[profile(16)]
pub fn render_frame(
    mut state: ResMut<RenderState>,
    mut frame: ResMut<FrameCounter>,
    mut perf: ResMut<FramePerformance>,
) {
    let start = Instant::now();
    state.render();
    frame.increment();

    perf.last_duration = start.elapsed();
    perf.last_hit_count = state.framebuffer.hit_count();

    use crate::profile_log;
    profile_log!(frame, "[FRAME] {} | hits: {} | camera: {:?} | took {:?}",
        frame.0, perf.last_hit_count, state.engine.camera(), perf.last_duration);
}

pub fn upload_frame(state: Res<RenderState>, target: Res<FrameTarget>, mut images: ResMut<Assets<Image>>) {
    if let Some(image) = images.get_mut(&target.0) {
        image.data = Some(state.framebuffer.to_rgba8());
    }
}

/// Save the current frame as PPM plus a golden dump on the capture key.
pub fn capture_on_key(
    keys: Res<ButtonInput<KeyCode>>,
    config_handle: Option<Res<ViewerConfigHandle>>,
    viewer_configs: Res<Assets<ViewerConfig>>,
    initial: Res<InitialConfig>,
    state: Res<RenderState>,
    frame: Res<FrameCounter>,
) {
    let fallback = ViewerConfig::default();
    let config = config_handle
        .and_then(|handle| viewer_configs.get(&handle.0))
        .unwrap_or(&fallback);
    if !keys.just_pressed(config.key_capture) {
        return;
    }

    let dir = PathBuf::from(&initial.capture_dir);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        error!("Failed to create {}: {}", dir.display(), e);
        return;
    }
    let stem = format!("frame_{:06}", frame.0);
    let golden = GoldenFrame::from_frame(&state.framebuffer, state.controls, frame.0);
    let result = save_ppm(&state.framebuffer, &dir.join(format!("{stem}.ppm")))
        .and_then(|_| save_golden(&golden, &dir.join(format!("{stem}.golden.gz"))));
    if let Err(e) = result {
        error!("Capture failed: {}", e);
    }
}
