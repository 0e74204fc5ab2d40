//! Body descriptions: orbiting bodies, the central star, rings and fact sheets.

use serde::{Deserialize, Serialize};

/// A 24-bit sRGB color written as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);

    /// Gamma-encoded channels in `[0, 1]`.
    pub fn to_srgb(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    /// Linear-light channels, suitable for an sRGB render target.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_srgb().map(srgb_to_linear)
    }

    /// Linear RGBA with the given alpha.
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_linear();
        [r, g, b, alpha]
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Rgb)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Facts shown to the user when a body is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSheet {
    pub name: String,
    pub summary: String,
    pub diameter: String,
    pub distance: String,
    pub temperature: String,
    pub day_length: String,
    pub year_length: String,
    pub moons: String,
    pub composition: String,
    pub atmosphere: String,
}

/// A flat ring around a body. Radii are multiples of the body's visual radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingDef {
    pub inner: f32,
    pub outer: f32,
    pub color: Rgb,
    pub opacity: f32,
}

/// A body orbiting the star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    /// Visual radius in scene units.
    pub radius: f32,
    /// Distance from the star in scene units.
    pub orbit_radius: f32,
    /// Base orbital angular speed.
    pub orbit_speed: f32,
    /// Base self-rotation speed.
    pub rotation_speed: f32,
    pub color: Rgb,
    pub description: String,
    #[serde(default)]
    pub ring: Option<RingDef>,
    pub facts: FactSheet,
}

/// Translucent shell drawn around the star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoronaDef {
    pub radius: f32,
    pub color: Rgb,
    pub opacity: f32,
}

/// The central star. It spins in place and is never picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarDef {
    pub name: String,
    pub radius: f32,
    pub color: Rgb,
    /// Spin added each tick at rotation speed 1.
    pub spin_step: f32,
    pub description: String,
    #[serde(default)]
    pub corona: Option<CoronaDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_channels() {
        assert_eq!(Rgb(0xff0080).to_srgb(), [1.0, 0.0, 128.0 / 255.0]);
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Rgb(0x000000).to_linear(), [0.0, 0.0, 0.0]);
        let white = Rgb::WHITE.to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_linear_is_darker_for_midtones() {
        let [r, _, _] = Rgb(0x808080).to_linear();
        assert!(r < 0.5 && r > 0.2);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#FFD700"), Some(Rgb(0xffd700)));
        assert_eq!(Rgb::from_hex("4b70dd"), Some(Rgb(0x4b70dd)));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("zzzzzz"), None);
    }
}
