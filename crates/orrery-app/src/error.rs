use orrery_catalog::CatalogError;
use orrery_controls::ParseEffectModeError;

use crate::platform::PlatformError;

/// Failures that stop the program before or around the event loop.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Effect(#[from] ParseEffectModeError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to spawn event listener: {0}")]
    Listener(#[source] std::io::Error),
}
