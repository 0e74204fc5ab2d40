//! The live configuration record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use orrery_catalog::{Catalog, Rgb};
use serde::{Deserialize, Serialize};

/// Camera distance the control surface starts with and resets to.
pub const DEFAULT_CAMERA_DISTANCE: f32 = 25.0;

/// Per-frame visual effect. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMode {
    /// Plain orbital motion.
    #[default]
    Orbit,
    /// Bodies breathe in size.
    Pulse,
    /// Bodies bob above and below the orbital plane.
    Drift,
    /// An asteroid belt appears and spins.
    Debris,
}

impl EffectMode {
    pub const ALL: [EffectMode; 4] = [
        EffectMode::Orbit,
        EffectMode::Pulse,
        EffectMode::Drift,
        EffectMode::Debris,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectMode::Orbit => "orbit",
            EffectMode::Pulse => "pulse",
            EffectMode::Drift => "drift",
            EffectMode::Debris => "debris",
        }
    }
}

impl fmt::Display for EffectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect mode {0:?} (expected orbit, pulse, drift or debris)")]
pub struct ParseEffectModeError(pub String);

impl FromStr for EffectMode {
    type Err = ParseEffectModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        EffectMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lower)
            .ok_or_else(|| ParseEffectModeError(s.to_string()))
    }
}

/// Per-body adjustments layered over the catalog values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyOverride {
    pub visible: bool,
    /// Size multiplier, > 0.
    pub size: f32,
    /// Orbital speed multiplier, >= 0.
    pub speed: f32,
    /// Self-rotation multiplier, >= 0.
    pub rotation_speed: f32,
}

impl Default for BodyOverride {
    fn default() -> Self {
        Self {
            visible: true,
            size: 1.0,
            speed: 1.0,
            rotation_speed: 1.0,
        }
    }
}

impl BodyOverride {
    fn sanitized(self) -> Self {
        Self {
            visible: self.visible,
            size: positive_or(self.size, 1.0),
            speed: non_negative_or(self.speed, 1.0),
            rotation_speed: non_negative_or(self.rotation_speed, 1.0),
        }
    }
}

/// Everything the control surface can change while the simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub playing: bool,
    /// Global multiplier on orbital motion, effect time and auto-rotation.
    pub time_speed: f32,
    /// Global multiplier on self-rotation.
    pub rotation_speed: f32,
    /// Uniform scale on body sizes and orbital distances.
    pub scale: f32,
    pub wireframe: bool,
    pub auto_rotate: bool,
    pub show_orbits: bool,
    pub show_stars: bool,
    pub effect: EffectMode,
    /// Requested asteroid count. The scene caps it.
    pub particle_count: u32,
    /// Requested camera distance; the camera rig clamps it.
    pub camera_distance: f32,
    /// Tint of the asteroid field.
    pub particle_color: Rgb,
    /// Keyed by body name.
    pub bodies: BTreeMap<String, BodyOverride>,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            playing: true,
            time_speed: 1.0,
            rotation_speed: 1.0,
            scale: 1.0,
            wireframe: false,
            auto_rotate: false,
            show_orbits: true,
            show_stars: true,
            effect: EffectMode::Orbit,
            particle_count: 1000,
            camera_distance: DEFAULT_CAMERA_DISTANCE,
            particle_color: Rgb(0xffd700),
            bodies: BTreeMap::new(),
        }
    }
}

impl Controls {
    /// Defaults with an override entry for every catalog body.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let bodies = catalog
            .names()
            .map(|name| (name.to_string(), BodyOverride::default()))
            .collect();
        Self {
            bodies,
            ..Self::default()
        }
    }

    /// Override for `name`, or the defaults when the surface never supplied one.
    pub fn body(&self, name: &str) -> BodyOverride {
        self.bodies.get(name).copied().unwrap_or_default()
    }

    pub fn body_mut(&mut self, name: &str) -> &mut BodyOverride {
        self.bodies.entry(name.to_string()).or_default()
    }

    /// Replace unusable numbers: non-finite values fall back to defaults,
    /// negative speeds become zero, non-positive scales become one.
    pub fn sanitized(mut self) -> Self {
        let defaults = Controls::default();
        self.time_speed = non_negative_or(self.time_speed, defaults.time_speed);
        self.rotation_speed = non_negative_or(self.rotation_speed, defaults.rotation_speed);
        self.scale = positive_or(self.scale, defaults.scale);
        if !self.camera_distance.is_finite() {
            self.camera_distance = defaults.camera_distance;
        }
        for value in self.bodies.values_mut() {
            *value = value.sanitized();
        }
        self
    }

    /// Restore playback to its initial state: playing, unit speeds and scale,
    /// default camera distance. Toggles and per-body overrides are kept.
    pub fn reset_playback(&mut self) {
        self.playing = true;
        self.time_speed = 1.0;
        self.rotation_speed = 1.0;
        self.scale = 1.0;
        self.camera_distance = DEFAULT_CAMERA_DISTANCE;
    }
}

fn non_negative_or(value: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        fallback
    } else {
        value.max(0.0)
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let controls = Controls::default();
        assert!(controls.playing);
        assert_eq!(controls.time_speed, 1.0);
        assert_eq!(controls.effect, EffectMode::Orbit);
        assert_eq!(controls.particle_count, 1000);
        assert_eq!(controls.camera_distance, 25.0);
        assert!(controls.show_orbits && controls.show_stars);
        assert!(!controls.wireframe && !controls.auto_rotate);
    }

    #[test]
    fn test_for_catalog_covers_every_body() {
        let catalog = Catalog::solar_system().unwrap();
        let controls = Controls::for_catalog(&catalog);
        assert_eq!(controls.bodies.len(), catalog.bodies.len());
        for name in catalog.names() {
            assert_eq!(controls.bodies[name], BodyOverride::default());
        }
    }

    #[test]
    fn test_missing_override_uses_defaults() {
        let controls = Controls::default();
        assert_eq!(controls.body("Pluto"), BodyOverride::default());
    }

    #[test]
    fn test_sanitized_repairs_bad_numbers() {
        let mut controls = Controls {
            time_speed: f32::NAN,
            rotation_speed: -2.0,
            scale: 0.0,
            camera_distance: f32::INFINITY,
            ..Controls::default()
        };
        controls.body_mut("Mars").size = -1.0;
        controls.body_mut("Mars").speed = f32::NAN;

        let clean = controls.sanitized();
        assert_eq!(clean.time_speed, 1.0);
        assert_eq!(clean.rotation_speed, 0.0);
        assert_eq!(clean.scale, 1.0);
        assert_eq!(clean.camera_distance, 25.0);
        assert_eq!(clean.bodies["Mars"].size, 1.0);
        assert_eq!(clean.bodies["Mars"].speed, 1.0);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let controls = Controls {
            time_speed: 2.5,
            scale: 0.5,
            camera_distance: 300.0,
            ..Controls::default()
        };
        assert_eq!(controls.clone().sanitized(), controls);
    }

    #[test]
    fn test_reset_playback_keeps_toggles() {
        let mut controls = Controls {
            playing: false,
            time_speed: 4.0,
            rotation_speed: 0.0,
            scale: 2.0,
            camera_distance: 60.0,
            wireframe: true,
            effect: EffectMode::Drift,
            ..Controls::default()
        };
        controls.reset_playback();
        assert!(controls.playing);
        assert_eq!(controls.time_speed, 1.0);
        assert_eq!(controls.rotation_speed, 1.0);
        assert_eq!(controls.scale, 1.0);
        assert_eq!(controls.camera_distance, 25.0);
        assert!(controls.wireframe);
        assert_eq!(controls.effect, EffectMode::Drift);
    }

    #[test]
    fn test_effect_mode_parse() {
        assert_eq!("debris".parse::<EffectMode>(), Ok(EffectMode::Debris));
        assert_eq!(" Pulse ".parse::<EffectMode>(), Ok(EffectMode::Pulse));
        assert!("morphing".parse::<EffectMode>().is_err());
        for mode in EffectMode::ALL {
            assert_eq!(mode.to_string().parse::<EffectMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_controls_deserialize_partial() {
        let controls: Controls = ron::from_str("(effect: debris, particle_count: 5000)").unwrap();
        assert_eq!(controls.effect, EffectMode::Debris);
        assert_eq!(controls.particle_count, 5000);
        assert!(controls.playing);
    }
}
