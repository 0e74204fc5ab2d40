//! Background starfield and the lazily created asteroid belt.

use glam::Vec3;
use orrery_catalog::Rgb;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A background star: world position and linear color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPoint {
    pub position: Vec3,
    pub color: [f32; 3],
}

/// Point cloud on a thick spherical shell around the system.
#[derive(Debug, Clone)]
pub struct Starfield {
    pub points: Vec<StarPoint>,
    pub visible: bool,
    pub opacity: f32,
}

/// Generates a deterministic starfield from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    inner_radius: f32,
    outer_radius: f32,
}

impl StarfieldGenerator {
    pub fn new(seed: u64, star_count: u32, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            seed,
            star_count,
            inner_radius,
            outer_radius: outer_radius.max(inner_radius),
        }
    }

    /// Uniform directions on the sphere, radius uniform in the shell, blue-ish hues.
    pub fn generate(&self) -> Starfield {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let span = self.outer_radius - self.inner_radius;
        let points = (0..self.star_count)
            .map(|_| {
                let radius = self.inner_radius + rng.random::<f32>() * span;
                let theta = rng.random::<f32>() * std::f32::consts::TAU;
                let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
                let position = radius
                    * Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());

                let hue = 0.5 + rng.random::<f32>() * 0.2;
                let lightness = 0.55 + rng.random::<f32>() * 0.25;
                StarPoint {
                    position,
                    color: hsl_to_linear(hue, 0.55, lightness),
                }
            })
            .collect();

        Starfield {
            points,
            visible: true,
            opacity: 0.8,
        }
    }
}

/// HSL (all components in `[0, 1]`) to linear RGB.
pub fn hsl_to_linear(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let c = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        c.clamp(0.0, 1.0)
    };
    let srgb = [
        channel(hue + 1.0 / 3.0),
        channel(hue),
        channel(hue - 1.0 / 3.0),
    ];
    let encoded = srgb.map(|c| (c * 255.0).round() as u32);
    Rgb((encoded[0] << 16) | (encoded[1] << 8) | encoded[2]).to_linear()
}

/// Flat belt of points between two radii, spun as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidField {
    pub points: Vec<Vec3>,
    /// Rotation about +Y in radians.
    pub spin: f32,
    pub color: Rgb,
}

/// Shape of the belt created in debris mode.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidBelt {
    /// Maximum number of points regardless of the requested count.
    pub cap: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Total vertical spread.
    pub thickness: f32,
}

impl AsteroidBelt {
    /// Build a field of `min(requested, cap)` points.
    pub fn generate(&self, requested: u32, color: Rgb, seed: u64) -> AsteroidField {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let count = requested.min(self.cap);
        let span = (self.outer_radius - self.inner_radius).max(0.0);
        let points = (0..count)
            .map(|_| {
                let angle = rng.random::<f32>() * std::f32::consts::TAU;
                let radius = self.inner_radius + rng.random::<f32>() * span;
                let height = (rng.random::<f32>() - 0.5) * self.thickness;
                Vec3::new(angle.cos() * radius, height, angle.sin() * radius)
            })
            .collect();
        AsteroidField {
            points,
            spin: 0.0,
            color,
        }
    }
}
