//! Opens an orrery window.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p orrery-app -- --seed 7 --effect pulse`.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::{AppError, OrreryApp, PlatformDirs, spawn_event_logger};
use orrery_catalog::Catalog;
use orrery_config::{CliArgs, Config};
use orrery_controls::{ControlBridge, Controls};
use tracing::{error, info};
use winit::event_loop::EventLoop;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("orrery: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let dirs = PlatformDirs::from_override(args.config.as_deref())?;
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), config.debug.log_to_file, Some(&config));

    let catalog = match &config.scene.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::solar_system()?,
    };
    let seed = config.scene.seed.unwrap_or_else(rand::random);
    info!(seed, bodies = catalog.names().count(), "starting orrery");

    let mut controls = Controls::for_catalog(&catalog);
    if let Some(effect) = &args.effect {
        controls.effect = effect.parse()?;
    }
    controls.playing = !args.paused;

    let (bridge, events) = ControlBridge::new(controls);
    let listener = spawn_event_logger(events).map_err(AppError::Listener)?;

    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config, dirs.config_dir, args, catalog, bridge, seed);
    let result = event_loop.run_app(&mut app);

    // Dropping the last bridge handle closes the event channel.
    drop(app);
    match listener.join() {
        Ok(seen) => info!(events = seen, "event listener stopped"),
        Err(_) => error!("event listener panicked"),
    }
    result.map_err(AppError::from)
}
