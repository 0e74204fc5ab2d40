//! Static body descriptions for the orrery.
//!
//! The built-in catalog is embedded RON; any other catalog file in the same
//! format can replace it at startup.

mod body;
mod catalog;
mod error;

pub use body::{Body, CoronaDef, FactSheet, RingDef, Rgb, StarDef};
pub use catalog::Catalog;
pub use error::CatalogError;
