//! Per-frame animation: orbital motion, self-rotation, camera auto-rotation,
//! visual effects and presentation state.

use std::f64::consts::TAU;

use glam::Vec3;
use orrery_camera::CameraRig;
use orrery_config::SimulationConfig;
use orrery_controls::{Controls, EffectMode};
use orrery_scene::{BodyKey, SceneGraph};
use tracing::{debug, instrument};

use crate::clock::FrameTime;

/// Gains and effect constants.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverTuning {
    pub orbit_gain: f64,
    pub rotation_gain: f64,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    pub drift_amplitude: f32,
    pub drift_frequency: f32,
    /// Asteroid belt spin in radians per second at time speed 1.
    pub asteroid_spin_rate: f32,
}

impl From<&SimulationConfig> for DriverTuning {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            orbit_gain: f64::from(config.orbit_gain),
            rotation_gain: f64::from(config.rotation_gain),
            pulse_amplitude: config.pulse_amplitude,
            pulse_frequency: config.pulse_frequency,
            drift_amplitude: config.drift_amplitude,
            drift_frequency: config.drift_frequency,
            asteroid_spin_rate: config.asteroid_spin_rate,
        }
    }
}

impl Default for DriverTuning {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

/// Simulation record of one orbiting body, joined to its scene node by key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub body: BodyKey,
    /// Orbital angle in `[0, 2PI)`.
    pub angle: f64,
    /// Self-rotation angle in `[0, 2PI)`.
    pub spin: f64,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Whether motion advanced (false while paused).
    pub advanced: bool,
    pub effect: EffectMode,
    /// Whether an externally published camera distance was applied.
    pub camera_distance_applied: bool,
}

/// Advances the simulation once per frame from a controls snapshot.
pub struct AnimationDriver {
    orbits: Vec<OrbitState>,
    tuning: DriverTuning,
    last_effect: Option<EffectMode>,
}

impl AnimationDriver {
    /// One orbit record per scene body, starting from the node's initial angle.
    pub fn new(scene: &SceneGraph, tuning: DriverTuning) -> Self {
        let orbits = scene
            .bodies()
            .iter()
            .map(|node| OrbitState {
                body: node.key,
                angle: node.initial_angle.rem_euclid(TAU),
                spin: f64::from(node.spin).rem_euclid(TAU),
            })
            .collect();
        Self {
            orbits,
            tuning,
            last_effect: None,
        }
    }

    pub fn orbits(&self) -> &[OrbitState] {
        &self.orbits
    }

    pub fn orbit(&self, key: BodyKey) -> Option<&OrbitState> {
        self.orbits.iter().find(|o| o.body == key)
    }

    pub fn tuning(&self) -> &DriverTuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: DriverTuning) {
        self.tuning = tuning;
    }

    /// Run one tick.
    ///
    /// The external camera distance and presentation state are applied every
    /// tick. Motion, auto-rotation and effects only run while playing.
    #[instrument(level = "trace", skip_all, fields(frame = time.frame))]
    pub fn tick(
        &mut self,
        time: FrameTime,
        controls: &Controls,
        scene: &mut SceneGraph,
        rig: &mut CameraRig,
    ) -> TickReport {
        let camera_distance_applied = rig.apply_external_distance(controls.camera_distance);

        if controls.playing {
            self.spin_star(controls, scene);
            self.advance_orbits(time.delta, controls, scene);
            if controls.auto_rotate {
                rig.auto_rotate(time.delta as f32, controls.time_speed);
            }
            self.apply_effect(time, controls, scene);
            self.place_bodies(controls, scene);
        }

        self.present(controls, scene);

        TickReport {
            advanced: controls.playing,
            effect: controls.effect,
            camera_distance_applied,
        }
    }

    fn spin_star(&self, controls: &Controls, scene: &mut SceneGraph) {
        let star = scene.star_mut();
        star.spin = (star.spin + star.spin_step * controls.rotation_speed)
            .rem_euclid(std::f32::consts::TAU);
    }

    fn advance_orbits(&mut self, dt: f64, controls: &Controls, scene: &SceneGraph) {
        let time_speed = f64::from(controls.time_speed);
        let rotation_speed = f64::from(controls.rotation_speed);
        for state in &mut self.orbits {
            let Some(node) = scene.body(state.body) else {
                continue;
            };
            let over = controls.body(&node.name);
            if !over.visible {
                continue;
            }
            let orbit_rate = f64::from(node.orbit_speed) * time_speed * f64::from(over.speed);
            let spin_rate =
                f64::from(node.rotation_speed) * rotation_speed * f64::from(over.rotation_speed);
            state.angle = (state.angle + orbit_rate * dt * self.tuning.orbit_gain).rem_euclid(TAU);
            state.spin = (state.spin + spin_rate * dt * self.tuning.rotation_gain).rem_euclid(TAU);
        }
    }

    fn apply_effect(&mut self, time: FrameTime, controls: &Controls, scene: &mut SceneGraph) {
        if self.last_effect != Some(controls.effect) {
            debug!(effect = %controls.effect, "effect mode changed");
            self.last_effect = Some(controls.effect);
        }

        let t = time.elapsed;
        let tuning = &self.tuning;
        match controls.effect {
            EffectMode::Orbit => reset_effects(scene),
            EffectMode::Pulse => {
                for (index, node) in scene.bodies_mut().iter_mut().enumerate() {
                    let wave = effect_wave(t, tuning.pulse_frequency, index);
                    node.pulse = 1.0 + wave * tuning.pulse_amplitude;
                    node.lift = 0.0;
                }
            }
            EffectMode::Drift => {
                for (index, node) in scene.bodies_mut().iter_mut().enumerate() {
                    let wave = effect_wave(t, tuning.drift_frequency, index);
                    node.pulse = 1.0;
                    node.lift = wave * tuning.drift_amplitude;
                }
            }
            EffectMode::Debris => {
                reset_effects(scene);
                let step = tuning.asteroid_spin_rate * controls.time_speed * time.delta as f32;
                let field =
                    scene.ensure_asteroid_field(controls.particle_count, controls.particle_color);
                field.spin = (field.spin + step).rem_euclid(std::f32::consts::TAU);
            }
        }
    }

    fn place_bodies(&self, controls: &Controls, scene: &mut SceneGraph) {
        for state in &self.orbits {
            let Some(node) = scene.body_mut(state.body) else {
                continue;
            };
            if !controls.body(&node.name).visible {
                continue;
            }
            let distance = node.orbit_radius * controls.scale;
            let (sin, cos) = state.angle.sin_cos();
            node.position = Vec3::new(cos as f32 * distance, node.lift, sin as f32 * distance);
            node.spin = state.spin as f32;
        }
    }

    fn present(&self, controls: &Controls, scene: &mut SceneGraph) {
        for node in scene.bodies_mut() {
            let over = controls.body(&node.name);
            node.visible = over.visible;
            node.display_scale = over.size * controls.scale * node.pulse;
            node.wireframe = controls.wireframe;
            if let Some(guide) = node.guide.as_mut() {
                guide.visible = controls.show_orbits && over.visible;
                guide.scale = controls.scale;
            }
        }
        scene.starfield_mut().visible = controls.show_stars;
    }
}

/// `sin(t * frequency + index)`, with the phase kept in f64.
fn effect_wave(elapsed: f64, frequency: f32, index: usize) -> f32 {
    (elapsed * f64::from(frequency) + index as f64).sin() as f32
}

fn reset_effects(scene: &mut SceneGraph) {
    for node in scene.bodies_mut() {
        node.pulse = 1.0;
        node.lift = 0.0;
    }
}
