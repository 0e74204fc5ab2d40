//! Renderer-facing view of the scene.
//!
//! [`SceneGraph::draw_list`] flattens the current node state into instances a
//! GPU backend can upload directly. Any type implementing [`SceneRenderer`]
//! can present a scene.

use glam::Mat4;
use orrery_camera::Camera;

use crate::error::RenderError;
use crate::graph::{BodyKey, SceneGraph};

/// Geometry an instance refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Shared unit icosphere.
    Sphere,
    /// The ring mesh belonging to a body.
    Ring(BodyKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Emissive flat color.
    Unlit,
    /// Ambient, point and directional lighting.
    Lit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub mesh: MeshKind,
    pub model: Mat4,
    /// Linear RGBA.
    pub color: [f32; 4],
    pub shading: Shading,
    pub wireframe: bool,
}

/// An orbit guide to draw with its per-frame scale.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideInstance {
    pub body: BodyKey,
    pub model: Mat4,
    pub color: [f32; 4],
}

/// A point cloud's per-frame transform and tint.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsInstance {
    pub model: Mat4,
    pub tint: [f32; 4],
}

/// Everything visible this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub clear_color: [f32; 4],
    pub opaque: Vec<MeshInstance>,
    /// Drawn after opaque geometry without depth writes.
    pub translucent: Vec<MeshInstance>,
    pub guides: Vec<GuideInstance>,
    pub starfield: Option<PointsInstance>,
    pub asteroids: Option<PointsInstance>,
}

/// Presents a scene through a camera.
pub trait SceneRenderer {
    /// Resize render targets. Zero sizes are ignored.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<(), RenderError>;
}

impl SceneGraph {
    pub fn draw_list(&self) -> DrawList {
        let mut opaque = Vec::with_capacity(self.bodies.len() * 2 + 1);
        let mut translucent = Vec::new();
        let mut guides = Vec::with_capacity(self.bodies.len());

        opaque.push(MeshInstance {
            mesh: MeshKind::Sphere,
            model: self.star.sphere_matrix(),
            color: self.star.color.with_alpha(1.0),
            shading: Shading::Unlit,
            wireframe: false,
        });
        if let (Some(corona), Some(model)) = (&self.star.corona, self.star.corona_matrix()) {
            translucent.push(MeshInstance {
                mesh: MeshKind::Sphere,
                model,
                color: corona.color.with_alpha(corona.opacity),
                shading: Shading::Unlit,
                wireframe: false,
            });
        }

        for node in &self.bodies {
            if let Some(guide) = node.guide.as_ref().filter(|g| g.visible) {
                guides.push(GuideInstance {
                    body: node.key,
                    model: Mat4::from_scale(glam::Vec3::splat(guide.scale)),
                    color: guide.color.with_alpha(guide.opacity),
                });
            }
            if !node.visible {
                continue;
            }
            opaque.push(MeshInstance {
                mesh: MeshKind::Sphere,
                model: node.sphere_matrix(),
                color: node.color.with_alpha(1.0),
                shading: Shading::Lit,
                wireframe: node.wireframe,
            });
            opaque.push(MeshInstance {
                mesh: MeshKind::Sphere,
                model: node.marker_matrix(),
                color: node.marker.color.with_alpha(1.0),
                shading: Shading::Unlit,
                wireframe: false,
            });
            if let (Some(ring), Some(model)) = (&node.ring, node.ring_matrix()) {
                translucent.push(MeshInstance {
                    mesh: MeshKind::Ring(node.key),
                    model,
                    color: ring.color.with_alpha(ring.opacity),
                    shading: Shading::Unlit,
                    wireframe: false,
                });
            }
        }

        let starfield = self.starfield.visible.then(|| PointsInstance {
            model: Mat4::IDENTITY,
            tint: [1.0, 1.0, 1.0, self.starfield.opacity],
        });
        let asteroids = self.asteroids.as_ref().map(|field| PointsInstance {
            model: Mat4::from_rotation_y(field.spin),
            tint: field.color.with_alpha(1.0),
        });

        DrawList {
            clear_color: self.background.with_alpha(1.0),
            opaque,
            translucent,
            guides,
            starfield,
            asteroids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{SceneBuilder, SceneSettings};
    use orrery_catalog::{Catalog, Rgb};

    fn scene() -> SceneGraph {
        SceneBuilder::new(SceneSettings {
            star_count: 10,
            ..SceneSettings::default()
        })
        .build(&Catalog::solar_system().unwrap())
        .unwrap()
    }

    #[test]
    fn test_full_scene_instances() {
        let list = scene().draw_list();
        // Star + 8 bodies + 8 markers.
        assert_eq!(list.opaque.len(), 17);
        // Corona + Saturn's ring.
        assert_eq!(list.translucent.len(), 2);
        assert_eq!(list.guides.len(), 8);
        assert!(list.starfield.is_some());
        assert!(list.asteroids.is_none());
    }

    #[test]
    fn test_hidden_body_drops_sphere_marker_and_ring() {
        let mut scene = scene();
        let key = scene.body_by_name("Saturn").unwrap().key;
        scene.body_mut(key).unwrap().visible = false;
        let list = scene.draw_list();
        assert_eq!(list.opaque.len(), 15);
        assert_eq!(list.translucent.len(), 1);
        assert!(
            !list
                .translucent
                .iter()
                .any(|i| i.mesh == MeshKind::Ring(key))
        );
    }

    #[test]
    fn test_hidden_guides_and_stars() {
        let mut scene = scene();
        for node in scene.bodies_mut() {
            if let Some(guide) = node.guide.as_mut() {
                guide.visible = false;
            }
        }
        scene.starfield_mut().visible = false;
        let list = scene.draw_list();
        assert!(list.guides.is_empty());
        assert!(list.starfield.is_none());
    }

    #[test]
    fn test_wireframe_applies_to_bodies_only() {
        let mut scene = scene();
        for node in scene.bodies_mut() {
            node.wireframe = true;
        }
        let list = scene.draw_list();
        let wire = list.opaque.iter().filter(|i| i.wireframe).count();
        assert_eq!(wire, 8);
        assert!(list.opaque.iter().all(|i| !i.wireframe || i.shading == Shading::Lit));
    }

    #[test]
    fn test_asteroids_appear_once_created() {
        let mut scene = scene();
        scene.ensure_asteroid_field(100, Rgb(0xffd700));
        scene.asteroid_field_mut().unwrap().spin = 1.0;
        let list = scene.draw_list();
        let asteroids = list.asteroids.unwrap();
        assert_eq!(asteroids.model, Mat4::from_rotation_y(1.0));
    }
}
