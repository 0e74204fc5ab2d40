//! Builds a [`SceneGraph`] from a catalog.

use glam::Vec3;
use orrery_catalog::{Body, Catalog, Rgb};
use orrery_config::Config;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

use crate::error::SceneError;
use crate::graph::{
    BodyKey, BodyNode, CoronaNode, Lighting, Marker, OrbitGuide, PickMeta, RingNode, SceneGraph,
    StarNode,
};
use crate::mesh::unit_circle;
use crate::starfield::{AsteroidBelt, StarfieldGenerator};

/// Orbit guides never use fewer segments than this.
pub const MIN_ORBIT_SEGMENTS: u32 = 128;

const GUIDE_COLOR: Rgb = Rgb(0x444444);
const GUIDE_OPACITY: f32 = 0.3;
const BACKGROUND: Rgb = Rgb(0x000005);

/// Inputs to [`SceneBuilder`] beyond the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub seed: u64,
    pub orbit_segments: u32,
    pub star_count: u32,
    pub starfield_inner_radius: f32,
    pub starfield_outer_radius: f32,
    pub belt: AsteroidBelt,
}

impl SceneSettings {
    pub fn from_config(config: &Config, seed: u64) -> Self {
        let sim = &config.simulation;
        Self {
            seed,
            orbit_segments: config.render.orbit_segments,
            star_count: config.scene.star_count,
            starfield_inner_radius: config.scene.starfield_inner_radius,
            starfield_outer_radius: config.scene.starfield_outer_radius,
            belt: AsteroidBelt {
                cap: sim.asteroid_cap,
                inner_radius: sim.asteroid_inner_radius,
                outer_radius: sim.asteroid_outer_radius,
                thickness: sim.asteroid_thickness,
            },
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), 0)
    }
}

pub struct SceneBuilder {
    settings: SceneSettings,
}

impl SceneBuilder {
    pub fn new(settings: SceneSettings) -> Self {
        Self { settings }
    }

    /// Build the full scene. Fails without side effects on an invalid catalog.
    #[instrument(skip_all, fields(bodies = catalog.bodies.len(), seed = self.settings.seed))]
    pub fn build(&self, catalog: &Catalog) -> Result<SceneGraph, SceneError> {
        catalog.validate()?;

        let settings = &self.settings;
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let circle = unit_circle(settings.orbit_segments.max(MIN_ORBIT_SEGMENTS));

        let bodies: Vec<BodyNode> = catalog
            .bodies
            .iter()
            .enumerate()
            .map(|(index, body)| {
                let initial_angle = rng.random::<f64>() * std::f64::consts::TAU;
                body_node(BodyKey(index), body, initial_angle, &circle)
            })
            .collect();

        let star = &catalog.star;
        let star = StarNode {
            name: star.name.clone(),
            radius: star.radius,
            color: star.color,
            spin: 0.0,
            spin_step: star.spin_step,
            corona: star.corona.as_ref().map(|c| CoronaNode {
                radius: c.radius,
                color: c.color,
                opacity: c.opacity,
            }),
        };

        let starfield = StarfieldGenerator::new(
            settings.seed.wrapping_add(1),
            settings.star_count,
            settings.starfield_inner_radius,
            settings.starfield_outer_radius,
        )
        .generate();

        info!(
            bodies = bodies.len(),
            stars = starfield.points.len(),
            "scene built"
        );

        Ok(SceneGraph {
            star,
            bodies,
            starfield,
            asteroids: None,
            belt: settings.belt.clone(),
            lighting: Lighting::default(),
            background: BACKGROUND,
            seed: settings.seed,
        })
    }
}

fn body_node(key: BodyKey, body: &Body, initial_angle: f64, circle: &[Vec3]) -> BodyNode {
    let radius = body.radius;
    BodyNode {
        key,
        name: body.name.clone(),
        radius,
        orbit_radius: body.orbit_radius,
        orbit_speed: body.orbit_speed,
        rotation_speed: body.rotation_speed,
        color: body.color,
        initial_angle,
        position: Vec3::new(body.orbit_radius, 0.0, 0.0),
        spin: 0.0,
        display_scale: 1.0,
        visible: true,
        wireframe: false,
        pulse: 1.0,
        lift: 0.0,
        marker: Marker {
            offset: Vec3::new(radius * 0.8, 0.0, 0.0),
            radius: radius * 0.2,
            color: Rgb::WHITE,
        },
        ring: body.ring.as_ref().map(|ring| RingNode {
            inner: ring.inner * radius,
            outer: ring.outer * radius,
            color: ring.color,
            opacity: ring.opacity,
            tilt: std::f32::consts::FRAC_PI_2,
        }),
        guide: Some(OrbitGuide {
            radius: body.orbit_radius,
            points: circle.iter().map(|p| *p * body.orbit_radius).collect(),
            color: GUIDE_COLOR,
            opacity: GUIDE_OPACITY,
            visible: true,
            scale: 1.0,
        }),
        pick: PickMeta {
            name: body.name.clone(),
            description: body.description.clone(),
            facts: body.facts.clone(),
        },
    }
}
