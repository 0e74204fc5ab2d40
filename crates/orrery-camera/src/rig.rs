//! Spherical orbit camera driven by pointer drags, the wheel and auto-rotation.

use glam::{Vec2, Vec3};
use orrery_config::CameraConfig;
use tracing::trace;

use crate::camera::{Camera, Projection};

/// Camera rig constants.
#[derive(Debug, Clone, PartialEq)]
pub struct RigTuning {
    pub min_radius: f32,
    pub max_radius: f32,
    pub polar_margin: f32,
    pub drag_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub auto_rotate_speed: f32,
    pub click_slop_px: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl From<&CameraConfig> for RigTuning {
    fn from(config: &CameraConfig) -> Self {
        let min_radius = config.min_radius.max(f32::EPSILON);
        Self {
            min_radius,
            max_radius: config.max_radius.max(min_radius),
            polar_margin: config.polar_margin.clamp(1e-3, std::f32::consts::FRAC_PI_2 - 1e-3),
            drag_sensitivity: config.drag_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            auto_rotate_speed: config.auto_rotate_speed,
            click_slop_px: config.click_slop_px.max(0.0),
            fov_y: config.fov_y_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }
}

impl Default for RigTuning {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

/// Radius, azimuth and polar angle around the target. Polar is measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub radius: f32,
    pub azimuth: f32,
    pub polar: f32,
}

impl OrbitState {
    /// Offset from the target: `r * (sin p cos a, cos p, sin p sin a)`.
    pub fn offset(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.radius * Vec3::new(sin_polar * cos_azimuth, cos_polar, sin_polar * sin_azimuth)
    }
}

/// Wrap an angle into `[0, 2PI)`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if wrapped >= std::f32::consts::TAU { 0.0 } else { wrapped }
}

/// Pointer gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        /// Pointer position at the previous move.
        last: Vec2,
        /// Total pointer travel in pixels since the drag started.
        travelled: f32,
    },
}

/// Orbit camera looking at a fixed target.
///
/// The camera position is never stored; it is derived from [`OrbitState`]
/// every time it is needed.
#[derive(Debug, Clone)]
pub struct CameraRig {
    target: Vec3,
    orbit: OrbitState,
    gesture: Gesture,
    suppress_click: bool,
    last_external_distance: Option<f32>,
    tuning: RigTuning,
}

impl CameraRig {
    /// A rig at `initial`, clamped into the tuning's limits.
    pub fn new(tuning: RigTuning, initial: OrbitState) -> Self {
        let mut rig = Self {
            target: Vec3::ZERO,
            orbit: initial,
            gesture: Gesture::Idle,
            suppress_click: false,
            last_external_distance: None,
            tuning,
        };
        rig.orbit.radius = rig.clamp_radius(initial.radius);
        rig.orbit.azimuth = wrap_angle(initial.azimuth);
        rig.orbit.polar = rig.clamp_polar(initial.polar);
        rig
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            RigTuning::from(config),
            OrbitState {
                radius: config.initial_radius,
                azimuth: config.initial_azimuth,
                polar: config.initial_polar,
            },
        )
    }

    pub fn orbit(&self) -> OrbitState {
        self.orbit
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn tuning(&self) -> &RigTuning {
        &self.tuning
    }

    /// Swap tuning (e.g. after a config reload) and re-clamp the current state.
    pub fn set_tuning(&mut self, tuning: RigTuning) {
        self.tuning = tuning;
        self.orbit.radius = self.clamp_radius(self.orbit.radius);
        self.orbit.polar = self.clamp_polar(self.orbit.polar);
    }

    /// Begin a drag at `pointer`. Clears any stale click suppression.
    pub fn drag_start(&mut self, pointer: Vec2) {
        self.gesture = Gesture::Dragging {
            last: pointer,
            travelled: 0.0,
        };
        self.suppress_click = false;
    }

    /// Rotate by the pointer movement since the last call. Returns whether the
    /// orbit changed. Ignored unless a drag is in progress.
    pub fn drag_move(&mut self, pointer: Vec2) -> bool {
        let Gesture::Dragging { last, travelled } = self.gesture else {
            return false;
        };
        let delta = pointer - last;
        if delta == Vec2::ZERO {
            return false;
        }
        self.gesture = Gesture::Dragging {
            last: pointer,
            travelled: travelled + delta.length(),
        };
        let k = self.tuning.drag_sensitivity;
        self.orbit.azimuth = wrap_angle(self.orbit.azimuth - delta.x * k);
        self.orbit.polar = self.clamp_polar(self.orbit.polar + delta.y * k);
        true
    }

    /// Finish the drag. A drag that travelled past the click slop swallows the
    /// click that follows it.
    pub fn drag_end(&mut self) {
        if let Gesture::Dragging { travelled, .. } = self.gesture
            && travelled > self.tuning.click_slop_px
        {
            self.suppress_click = true;
        }
        self.gesture = Gesture::Idle;
    }

    /// Whether a click arriving now should be handled. Consumes the suppression.
    pub fn accept_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }

    /// Zoom by a wheel delta (positive moves away). Returns the new radius.
    pub fn scroll(&mut self, delta_y: f32) -> f32 {
        if delta_y.is_finite() {
            let radius = self.orbit.radius + delta_y * self.tuning.zoom_sensitivity;
            self.orbit.radius = self.clamp_radius(radius);
        }
        self.last_external_distance = Some(self.orbit.radius);
        self.orbit.radius
    }

    /// Advance the azimuth at the auto-rotation rate. Works during a drag.
    pub fn auto_rotate(&mut self, dt: f32, speed: f32) {
        let step = self.tuning.auto_rotate_speed * dt * speed;
        self.orbit.azimuth = wrap_angle(self.orbit.azimuth + step);
    }

    /// Apply a distance published from outside. Only acts when the value differs
    /// from the last one seen or reported, so stale values never undo a zoom.
    pub fn apply_external_distance(&mut self, distance: f32) -> bool {
        if !distance.is_finite() || self.last_external_distance == Some(distance) {
            return false;
        }
        self.last_external_distance = Some(distance);
        let radius = self.clamp_radius(distance);
        if radius == self.orbit.radius {
            return false;
        }
        trace!(radius, "camera distance set externally");
        self.orbit.radius = radius;
        true
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.target + self.orbit.offset()
    }

    /// The camera for a viewport of the given aspect ratio.
    pub fn camera(&self, aspect_ratio: f32) -> Camera {
        Camera::looking_at(
            self.position(),
            self.target,
            Projection::Perspective {
                fov_y: self.tuning.fov_y,
                aspect_ratio,
            },
            self.tuning.near,
            self.tuning.far,
        )
    }

    fn clamp_radius(&self, radius: f32) -> f32 {
        if radius.is_nan() {
            return self.orbit.radius;
        }
        radius.clamp(self.tuning.min_radius, self.tuning.max_radius)
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        let margin = self.tuning.polar_margin;
        polar.clamp(margin, std::f32::consts::PI - margin)
    }
}
