//! Ray picking against orbiting bodies.
//!
//! Only body spheres take part. Guides, the starfield, asteroids, markers,
//! rings and the star are never hit.

use glam::Vec2;
use orrery_camera::{Camera, Ray};

use crate::graph::{BodyKey, PickMeta, SceneGraph};

/// Nearest body along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub key: BodyKey,
    /// Distance from the ray origin to the hit.
    pub distance: f32,
}

impl SceneGraph {
    /// Nearest visible body hit by `ray`, using each body's on-screen radius.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        self.bodies
            .iter()
            .filter(|node| node.visible)
            .filter_map(|node| {
                ray.intersect_sphere(node.position, node.pick_radius())
                    .map(|distance| PickHit {
                        key: node.key,
                        distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Pick through a point in normalized device coordinates.
    pub fn pick_at(&self, camera: &Camera, ndc: Vec2) -> Option<&PickMeta> {
        let ray = camera.ray_through_ndc(ndc);
        let hit = self.pick(&ray)?;
        self.body(hit.key).map(|node| &node.pick)
    }
}
