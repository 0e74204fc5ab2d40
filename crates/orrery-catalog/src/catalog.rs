//! The body catalog: one star plus an ordered list of orbiting bodies.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::body::{Body, StarDef};
use crate::error::CatalogError;

const SOLAR_SYSTEM_RON: &str = include_str!("../assets/solar_system.ron");

/// Static description of everything the scene is built from.
///
/// Order matters: a body's index is its stable key and also phases the
/// pulse and drift effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub star: StarDef,
    pub bodies: Vec<Body>,
}

impl Catalog {
    /// The Sun and the eight planets, validated.
    pub fn solar_system() -> Result<Self, CatalogError> {
        Self::from_ron_str(SOLAR_SYSTEM_RON)
    }

    /// Parse and validate a catalog from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = ron::from_str(text).map_err(CatalogError::Parse)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_ron_str(&text)?;
        log::info!(
            "Loaded catalog with {} bodies from {}",
            catalog.bodies.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Check radii, speeds, names and rings.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_radius(&self.star.name, "radius", self.star.radius)?;
        check_speed(&self.star.name, "spin_step", self.star.spin_step)?;
        if let Some(corona) = &self.star.corona {
            check_radius(&self.star.name, "corona radius", corona.radius)?;
        }

        if self.bodies.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for body in &self.bodies {
            if body.name.trim().is_empty() {
                return Err(CatalogError::UnnamedBody);
            }
            if !seen.insert(body.name.as_str()) {
                return Err(CatalogError::DuplicateName(body.name.clone()));
            }
            check_radius(&body.name, "radius", body.radius)?;
            check_radius(&body.name, "orbit_radius", body.orbit_radius)?;
            check_speed(&body.name, "orbit_speed", body.orbit_speed)?;
            check_speed(&body.name, "rotation_speed", body.rotation_speed)?;

            if let Some(ring) = &body.ring
                && !(ring.inner > 0.0 && ring.inner < ring.outer && ring.outer.is_finite())
            {
                return Err(CatalogError::InvalidRing {
                    body: body.name.clone(),
                    inner: ring.inner,
                    outer: ring.outer,
                });
            }
        }
        Ok(())
    }

    /// Look up a body by exact name.
    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Bodies that carry a ring.
    pub fn ringed(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.ring.is_some())
    }

    /// Names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|b| b.name.as_str())
    }
}

fn check_radius(body: &str, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidRadius {
            body: body.to_string(),
            field,
            value,
        })
    }
}

fn check_speed(body: &str, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidSpeed {
            body: body.to_string(),
            field,
            value,
        })
    }
}
