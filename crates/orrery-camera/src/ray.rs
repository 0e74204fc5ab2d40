//! Pointer rays and viewport coordinate conversion.

use glam::{Vec2, Vec3};

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first intersection with a sphere, if any.
    ///
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        if radius <= 0.0 || self.direction == Vec3::ZERO {
            return None;
        }
        let to_origin = self.origin - center;
        let b = to_origin.dot(self.direction);
        let c = to_origin.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

/// Drawable area in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 while the viewport is degenerate.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel position to NDC (`[-1, 1]`, +Y up). `None` for an empty viewport.
    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let size = Vec2::new(self.width as f32, self.height as f32);
        let unit = pixel / size;
        Some(Vec2::new(unit.x * 2.0 - 1.0, 1.0 - unit.y * 2.0))
    }

    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        let size = Vec2::new(self.width as f32, self.height as f32);
        Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5) * size
    }
}
