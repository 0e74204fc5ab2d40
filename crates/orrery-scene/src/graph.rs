//! Scene nodes: the star, orbiting bodies with their attachments, background and lights.

use glam::{Mat4, Quat, Vec3};
use orrery_catalog::{FactSheet, Rgb};

use crate::starfield::{AsteroidBelt, AsteroidField, Starfield};

/// Stable index of an orbiting body, equal to its catalog position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyKey(pub usize);

/// What a successful pick reports.
#[derive(Debug, Clone, PartialEq)]
pub struct PickMeta {
    pub name: String,
    pub description: String,
    pub facts: FactSheet,
}

/// Small sphere on the body's surface that makes self-rotation visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Offset in the body's unscaled local frame.
    pub offset: Vec3,
    pub radius: f32,
    pub color: Rgb,
}

/// Flat double-sided annulus in the body's equatorial plane.
#[derive(Debug, Clone, PartialEq)]
pub struct RingNode {
    /// Radii in scene units at display scale 1.
    pub inner: f32,
    pub outer: f32,
    pub color: Rgb,
    pub opacity: f32,
    /// Rotation about local X that lays the annulus flat.
    pub tilt: f32,
}

/// Closed polyline tracing a body's orbit around the star.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitGuide {
    pub radius: f32,
    /// Points at scale 1, first equals last.
    pub points: Vec<Vec3>,
    pub color: Rgb,
    pub opacity: f32,
    pub visible: bool,
    /// Uniform scale applied to `points`.
    pub scale: f32,
}

impl OrbitGuide {
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Render handle of an orbiting body.
#[derive(Debug, Clone)]
pub struct BodyNode {
    pub key: BodyKey,
    pub name: String,
    /// Visual radius from the catalog.
    pub radius: f32,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub rotation_speed: f32,
    pub color: Rgb,
    /// Orbital angle the simulation starts from, in `[0, 2PI)`.
    pub initial_angle: f64,

    pub position: Vec3,
    /// Self-rotation about +Y.
    pub spin: f32,
    /// Size multiplier applied on top of `radius`.
    pub display_scale: f32,
    pub visible: bool,
    pub wireframe: bool,
    /// Pulse effect factor, 1 when idle.
    pub pulse: f32,
    /// Drift effect offset along +Y, 0 when idle.
    pub lift: f32,

    pub marker: Marker,
    pub ring: Option<RingNode>,
    pub guide: Option<OrbitGuide>,
    pub pick: PickMeta,
}

impl BodyNode {
    /// Translation, spin and display scale. Attachments hang off this frame.
    pub fn node_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.display_scale),
            Quat::from_rotation_y(self.spin),
            self.position,
        )
    }

    /// Transform of the unit sphere drawn for the body.
    pub fn sphere_matrix(&self) -> Mat4 {
        self.node_matrix() * Mat4::from_scale(Vec3::splat(self.radius))
    }

    pub fn marker_matrix(&self) -> Mat4 {
        self.node_matrix()
            * Mat4::from_scale_rotation_translation(
                Vec3::splat(self.marker.radius),
                Quat::IDENTITY,
                self.marker.offset,
            )
    }

    /// Transform of a ring mesh whose radii are already in scene units.
    pub fn ring_matrix(&self) -> Option<Mat4> {
        let ring = self.ring.as_ref()?;
        Some(self.node_matrix() * Mat4::from_rotation_x(ring.tilt))
    }

    /// Radius used for picking: what is currently on screen.
    pub fn pick_radius(&self) -> f32 {
        self.radius * self.display_scale
    }
}

/// Translucent shell parented to the star.
#[derive(Debug, Clone, PartialEq)]
pub struct CoronaNode {
    pub radius: f32,
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarNode {
    pub name: String,
    pub radius: f32,
    pub color: Rgb,
    pub spin: f32,
    pub spin_step: f32,
    pub corona: Option<CoronaNode>,
}

impl StarNode {
    pub fn sphere_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.radius),
            Quat::from_rotation_y(self.spin),
            Vec3::ZERO,
        )
    }

    pub fn corona_matrix(&self) -> Option<Mat4> {
        let corona = self.corona.as_ref()?;
        Some(Mat4::from_scale_rotation_translation(
            Vec3::splat(corona.radius),
            Quat::from_rotation_y(self.spin),
            Vec3::ZERO,
        ))
    }
}

/// Point light fading smoothly to zero at `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    pub range: f32,
}

impl PointLight {
    /// Attenuation factor at `distance`: 1 at the light, 0 at and beyond `range`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        if distance >= self.range {
            return 0.0;
        }
        let ratio = distance / self.range;
        let t = (1.0 - ratio * ratio).max(0.0);
        t * t
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, unit length.
    pub direction: Vec3,
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: Rgb,
    pub ambient_intensity: f32,
    pub point: PointLight,
    pub directional: DirectionalLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Rgb(0x404040),
            ambient_intensity: 0.1,
            point: PointLight {
                position: Vec3::ZERO,
                color: Rgb::WHITE,
                intensity: 3.0,
                range: 200.0,
            },
            directional: DirectionalLight {
                direction: -Vec3::new(10.0, 10.0, 5.0).normalize(),
                color: Rgb::WHITE,
                intensity: 0.5,
            },
        }
    }
}

/// Everything drawn each frame. Built once per session, mutated in place by the
/// animation driver, dropped at teardown.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub(crate) star: StarNode,
    pub(crate) bodies: Vec<BodyNode>,
    pub(crate) starfield: Starfield,
    pub(crate) asteroids: Option<AsteroidField>,
    pub(crate) belt: AsteroidBelt,
    pub(crate) lighting: Lighting,
    pub(crate) background: Rgb,
    pub(crate) seed: u64,
}

impl SceneGraph {
    pub fn star(&self) -> &StarNode {
        &self.star
    }

    pub fn star_mut(&mut self) -> &mut StarNode {
        &mut self.star
    }

    pub fn bodies(&self) -> &[BodyNode] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [BodyNode] {
        &mut self.bodies
    }

    pub fn body(&self, key: BodyKey) -> Option<&BodyNode> {
        self.bodies.get(key.0)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut BodyNode> {
        self.bodies.get_mut(key.0)
    }

    pub fn body_by_name(&self, name: &str) -> Option<&BodyNode> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn starfield_mut(&mut self) -> &mut Starfield {
        &mut self.starfield
    }

    pub fn asteroid_field(&self) -> Option<&AsteroidField> {
        self.asteroids.as_ref()
    }

    pub fn asteroid_field_mut(&mut self) -> Option<&mut AsteroidField> {
        self.asteroids.as_mut()
    }

    /// The asteroid field, created on first use with `min(requested, cap)` points.
    /// Later calls return the existing field untouched.
    pub fn ensure_asteroid_field(&mut self, requested: u32, color: Rgb) -> &mut AsteroidField {
        let belt = &self.belt;
        let seed = self.seed.wrapping_add(2);
        self.asteroids.get_or_insert_with(|| {
            let field = belt.generate(requested, color, seed);
            tracing::debug!(points = field.points.len(), "asteroid field created");
            field
        })
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_attenuation() {
        let light = Lighting::default().point;
        assert_eq!(light.attenuation(0.0), 1.0);
        assert_eq!(light.attenuation(200.0), 0.0);
        assert_eq!(light.attenuation(500.0), 0.0);
        let mid = light.attenuation(100.0);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_directional_light_points_at_origin() {
        let light = Lighting::default().directional;
        assert!((light.direction.length() - 1.0).abs() < 1e-6);
        assert!(light.direction.dot(Vec3::new(10.0, 10.0, 5.0)) < 0.0);
    }
}
