use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

use super::display::{ControlInputs, DisplayMode, FrameGeometry};
use super::sdf::Scene;
use super::viewer::MarchSet;

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration read once at startup. Geometry cannot change without
/// rebuilding the frame buffer, so none of this is hot-reloaded.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    // Raster
    pub width: u16,
    pub height: u16,
    pub window_scale: f32,

    // Control byte at power-on
    pub mode: DisplayMode,
    pub scene: Scene,
    pub animation_enabled: bool,

    // Capture
    pub capture_dir: String,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            window_scale: 1.0,
            mode: DisplayMode::Render,
            scene: Scene::Sphere,
            animation_enabled: false,
            capture_dir: "output".to_string(),
        }
    }
}

impl InitialConfig {
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry { width: self.width.max(1), height: self.height.max(1) }
    }

    pub fn controls(&self) -> ControlInputs {
        ControlInputs {
            mode: self.mode,
            scene: self.scene.bits(),
            animation_enabled: self.animation_enabled,
        }
    }

    /// Parse `path`, falling back to defaults (with an error logged) when the
    /// file is missing or malformed.
    pub fn read_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str::<InitialConfig>(&contents) {
                Ok(config) => {
                    info!("Loaded initial config from {}", path);
                    config
                }
                Err(e) => {
                    error!("Failed to parse initial config: {}", e);
                    error!("Using default InitialConfig");
                    InitialConfig::default()
                }
            },
            Err(e) => {
                error!("Failed to read {}: {}", path, e);
                error!("Using default InitialConfig");
                InitialConfig::default()
            }
        }
    }
}

/// Viewer settings that can be edited while the window is open.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct ViewerConfig {
    pub key_next_scene: KeyCode,
    pub key_next_mode: KeyCode,
    pub key_toggle_animation: KeyCode,
    pub key_reset: KeyCode,
    pub key_capture: KeyCode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            key_next_scene: KeyCode::Tab,
            key_next_mode: KeyCode::KeyM,
            key_toggle_animation: KeyCode::Space,
            key_reset: KeyCode::KeyR,
            key_capture: KeyCode::KeyC,
        }
    }
}

#[derive(Resource)]
pub struct ViewerConfigHandle(pub Handle<ViewerConfig>);

pub struct MarchConfigPlugin;

impl Plugin for MarchConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<ViewerConfig>::new(&["viewer.ron"]))
            .add_systems(Startup, (load_initial_config, setup_viewer_config).chain().in_set(MarchSet::Config));
    }
}

/// Insert [`InitialConfig`] before anything that sizes buffers from it.
pub fn load_initial_config(mut commands: Commands) {
    commands.insert_resource(InitialConfig::read_or_default(INITIAL_CONFIG_PATH));
}

fn setup_viewer_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("default.viewer.ron");
    commands.insert_resource(ViewerConfigHandle(handle));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config: InitialConfig = ron::from_str("(scene: Torus, animation_enabled: true)").unwrap();
        assert_eq!(config.scene, Scene::Torus);
        assert!(config.animation_enabled);
        assert_eq!(config.width, 640);
        assert_eq!(config.controls().scene, 1);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = InitialConfig::read_or_default("does/not/exist.ron");
        assert_eq!(config, InitialConfig::default());
    }

    #[test]
    fn test_zero_geometry_is_clamped() {
        let config = InitialConfig { width: 0, height: 0, ..Default::default() };
        assert_eq!(config.geometry(), FrameGeometry { width: 1, height: 1 });
    }
}
