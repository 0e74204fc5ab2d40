//! Catalog error types.

use std::path::PathBuf;

/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[source] ron::error::SpannedError),

    #[error("catalog has no orbiting bodies")]
    Empty,

    #[error("body name must not be empty")]
    UnnamedBody,

    #[error("duplicate body name {0:?}")]
    DuplicateName(String),

    /// A radius is zero, negative or not finite.
    #[error("{body}: {field} must be positive and finite, got {value}")]
    InvalidRadius {
        body: String,
        field: &'static str,
        value: f32,
    },

    /// A speed is negative or not finite.
    #[error("{body}: {field} must be non-negative and finite, got {value}")]
    InvalidSpeed {
        body: String,
        field: &'static str,
        value: f32,
    },

    #[error("{body}: ring inner radius {inner} must be positive and below outer radius {outer}")]
    InvalidRing { body: String, inner: f32, outer: f32 },
}
