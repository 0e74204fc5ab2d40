//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering and geometry settings.
    pub render: RenderConfig,
    /// Orbit camera tuning.
    pub camera: CameraConfig,
    /// Animation gains and effect constants.
    pub simulation: SimulationConfig,
    /// Scene content: seed, starfield and catalog source.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Icosphere subdivision level for body meshes.
    pub sphere_subdivisions: u32,
    /// Segments per orbit guide. Values below 128 are raised to 128.
    pub orbit_segments: u32,
    /// Segments around a planetary ring.
    pub ring_segments: u32,
}

/// Orbit camera tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting distance from the star.
    pub initial_radius: f32,
    /// Starting azimuth in radians.
    pub initial_azimuth: f32,
    /// Starting polar angle in radians, measured from +Y.
    pub initial_polar: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Keeps the polar angle inside `[margin, PI - margin]`.
    pub polar_margin: f32,
    /// Radians per pixel of pointer drag.
    pub drag_sensitivity: f32,
    /// Radius change per unit of wheel delta.
    pub zoom_sensitivity: f32,
    /// Auto-rotation rate in radians per second at speed 1.
    pub auto_rotate_speed: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// A drag travelling further than this (pixels) swallows the following click.
    pub click_slop_px: f32,
}

/// Animation driver gains and effect constants.
///
/// The gains scale catalog speeds into on-screen motion. They are presentation
/// parameters, not physics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub orbit_gain: f32,
    pub rotation_gain: f32,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    pub drift_amplitude: f32,
    pub drift_frequency: f32,
    /// Hard cap on asteroid points regardless of the requested particle count.
    pub asteroid_cap: u32,
    pub asteroid_inner_radius: f32,
    pub asteroid_outer_radius: f32,
    /// Total vertical spread of the belt.
    pub asteroid_thickness: f32,
    /// Belt spin in radians per second at time speed 1.
    pub asteroid_spin_rate: f32,
}

/// Scene content configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// RNG seed for initial orbit angles, starfield and asteroids. `None` picks one at startup.
    pub seed: Option<u64>,
    pub star_count: u32,
    pub starfield_inner_radius: f32,
    pub starfield_outer_radius: f32,
    /// Optional RON catalog replacing the built-in solar system.
    pub catalog: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            sphere_subdivisions: 3,
            orbit_segments: 128,
            ring_segments: 64,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_radius: 25.0,
            initial_azimuth: 0.0,
            initial_polar: std::f32::consts::FRAC_PI_4,
            min_radius: 5.0,
            max_radius: 100.0,
            polar_margin: 0.1,
            drag_sensitivity: 0.01,
            zoom_sensitivity: 0.01,
            auto_rotate_speed: 0.2,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 2000.0,
            click_slop_px: 3.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            orbit_gain: 10.0,
            rotation_gain: 20.0,
            pulse_amplitude: 0.2,
            pulse_frequency: 2.0,
            drift_amplitude: 0.5,
            drift_frequency: 1.0,
            asteroid_cap: 2000,
            asteroid_inner_radius: 8.5,
            asteroid_outer_radius: 9.5,
            asteroid_thickness: 0.5,
            asteroid_spin_rate: 0.06,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            star_count: 10_000,
            starfield_inner_radius: 500.0,
            starfield_outer_radius: 1500.0,
            catalog: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info,wgpu=warn,naga=warn".to_string(),
            log_to_file: cfg!(debug_assertions),
        }
    }
}

// --- Load / Save / Reload ---

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first if
    /// the file does not exist.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let write_error = |source| ConfigError::Write {
            path: config_path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(write_error)
    }

    /// Re-read `config.ron`. Returns `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("orbit_gain: 10.0"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.scene.seed = Some(42);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let ron_str = "(simulation: (orbit_gain: 4.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.simulation.orbit_gain, 4.0);
        assert_eq!(config.simulation.rotation_gain, 20.0);
        assert_eq!(config.simulation.asteroid_cap, 2000);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_camera_defaults_match_rig_constants() {
        let camera = CameraConfig::default();
        assert_eq!(camera.initial_radius, 25.0);
        assert_eq!(camera.min_radius, 5.0);
        assert_eq!(camera.max_radius, 100.0);
        assert!((camera.initial_polar - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.scene.star_count = 500;
        config.scene.catalog = Some(PathBuf::from("bodies.ron"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.simulation.orbit_gain = 2.5;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().simulation.orbit_gain, 2.5);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// orrery settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
