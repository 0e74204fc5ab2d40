//! Command-line argument parsing for the orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Real-time orbital simulation of the solar system")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// RON body catalog to load instead of the built-in solar system.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Seed for initial orbit angles, starfield and asteroid placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial effect mode (orbit, pulse, drift, debris).
    #[arg(long)]
    pub effect: Option<String>,

    /// Start with the animation paused.
    #[arg(long)]
    pub paused: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `effect` and `paused` are live controls rather than config and are read by the host.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref path) = args.catalog {
            self.scene.catalog = Some(path.clone());
        }
        if let Some(seed) = args.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
