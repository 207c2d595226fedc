/// Viewer layer - drives the engine once per displayed frame.
///
/// This module is organized into:
/// - **resources**: render state, frame counter, texture target
/// - **systems**: startup, key handling, frame scan and upload

use bevy::prelude::*;

pub mod resources;
pub mod systems;

pub use resources::*;

/// Ordering for everything the viewer schedules.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum MarchSet {
    Config,  // Startup: InitialConfig becomes available
    Setup,   // Startup: buffers and textures sized from it
    Input,   // Key presses into control changes
    Render,  // One frame scanned through the engine
    Present, // Upload and capture
}

/// Render state and the per-frame scan. Runs headless.
pub struct MarchCorePlugin;

impl Plugin for MarchCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameCounter>();
        app.init_resource::<FramePerformance>();

        app.configure_sets(Startup, (MarchSet::Config, MarchSet::Setup).chain());
        app.configure_sets(Update, (
            MarchSet::Input,
            MarchSet::Render,
            MarchSet::Present,
        ).chain());

        app.add_systems(Startup, systems::init_render_state.in_set(MarchSet::Setup));
        app.add_systems(Update, systems::render_frame.in_set(MarchSet::Render));
    }
}

/// Window, texture and keyboard handling on top of [`MarchCorePlugin`].
pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, systems::setup_view.in_set(MarchSet::Setup));
        app.add_systems(Update, (
            systems::handle_controls.in_set(MarchSet::Input),
            systems::update_from_viewer_config.in_set(MarchSet::Input),
            systems::upload_frame.in_set(MarchSet::Present),
            systems::capture_on_key.in_set(MarchSet::Present),
        ));
    }
}
