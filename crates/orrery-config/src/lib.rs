//! Configuration for the orrery.
//!
//! Settings persist to disk as `config.ron`. Every section defaults independently,
//! so a partial or older file still loads. CLI arguments (clap) override the file.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CameraConfig, Config, DebugConfig, RenderConfig, SceneConfig, SimulationConfig,
    WindowConfig,
};
pub use error::ConfigError;
