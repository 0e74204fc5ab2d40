//! Scene error types.

use orrery_catalog::CatalogError;

/// Errors raised while building the scene. Building is all-or-nothing.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Errors raised while drawing a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The surface was lost and could not be recovered.
    #[error("render surface lost")]
    SurfaceLost,

    #[error("GPU out of memory")]
    OutOfMemory,

    /// The frame was skipped; the next one may succeed.
    #[error("frame skipped: {0}")]
    Skipped(String),
}

impl RenderError {
    /// Whether the session must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::SurfaceLost | RenderError::OutOfMemory)
    }
}
