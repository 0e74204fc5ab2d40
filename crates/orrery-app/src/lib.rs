//! Desktop host for the orrery: window, input routing, config directories and
//! the bridge event listener.

pub mod app;
pub mod error;
pub mod events;
pub mod keymap;
pub mod platform;

pub use app::OrreryApp;
pub use error::AppError;
pub use events::spawn_event_logger;
pub use keymap::{KeyAction, action_for};
pub use platform::{PlatformDirs, PlatformError};
