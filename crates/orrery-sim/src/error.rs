//! Session error types.

use orrery_scene::SceneError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to build scene: {0}")]
    Scene(#[from] SceneError),
}
