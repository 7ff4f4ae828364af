mod app_state;
mod cli;
mod headless;
mod scene;
mod setup;
mod shaders;

use std::path::PathBuf;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use ember_common::ConfigError;
use ember_config::schema::EmberConfig;

const DEFAULT_LOG_DIRECTIVE: &str = "ember=info";

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env();
    let filter = match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("invalid log directive `{directive}` ({e}), using {DEFAULT_LOG_DIRECTIVE}");
            match DEFAULT_LOG_DIRECTIVE.parse() {
                Ok(fallback) => filter.add_directive(fallback),
                Err(_) => filter.add_directive(LevelFilter::INFO.into()),
            }
        }
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The file to watch for live reload.
fn watched_config_path(args: &cli::Args) -> Option<PathBuf> {
    args.config
        .clone()
        .or_else(|| ember_config::toml_loader::default_config_path().ok())
}

fn main() {
    let args = cli::parse();

    if args.print_default_config {
        print!("{}", ember_config::default_config_template());
        return;
    }

    // Loaded before logging so the config can pick the log level.
    let loaded: Result<EmberConfig, ConfigError> = ember_config::load_config_from(args.config.as_deref());

    let directive = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.directive().to_string(),
        (None, Err(_)) => DEFAULT_LOG_DIRECTIVE.to_string(),
    };
    init_logging(&directive);

    tracing::info!("Ember v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        EmberConfig::default()
    });
    if let Some(subdivisions) = args.subdivisions {
        tracing::info!("Subdivision override: {subdivisions}");
        config.scene.subdivisions = subdivisions;
    }

    if let Some(frames) = args.headless {
        if let Err(e) = headless::run(&config, frames) {
            tracing::error!("Headless run failed: {e}");
            std::process::exit(1);
        }
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };

    let mut app = app_state::EmberApp::new(config, args.subdivisions);
    if let Some(path) = watched_config_path(&args) {
        app.start_config_reload(path);
    }

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
