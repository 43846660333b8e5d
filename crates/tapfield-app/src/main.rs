//! Tapfield - Main entry point
//!
//! Loads the configured scene resource and presents it in a window.

mod config;

use anyhow::Result;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use std::path::PathBuf;
use tapfield_core::{
    create_scene, load_action_library, FileSceneLoader, InteractiveScene, SceneError,
};
use tapfield_scene::{ActiveScene, TapfieldScenePlugin};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "tapfield")]
#[command(about = "Interactive scene with touch and mouse markers")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "tapfield.toml")]
    config: PathBuf,

    /// Directory holding scene resources
    #[arg(short, long)]
    resources: Option<PathBuf>,

    /// Scene resource to present
    #[arg(short, long)]
    scene: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG directives refine the --log-level default
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(log_level(&args.log_level), &directives))
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Tapfield v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    if let Some(resources) = args.resources {
        config.resources.path = resources;
    }
    if let Some(scene) = args.scene {
        config.resources.scene = scene;
    }

    info!(
        resources = %config.resources.path.display(),
        scene = %config.resources.scene,
        "Configuration loaded"
    );

    // A scene that cannot be created is a configuration error, not a runtime condition
    let scene = match load_interactive_scene(&config.resources) {
        Ok(scene) => scene,
        Err(e) => {
            error!(error = %e, scene = %config.resources.scene, "Failed to load scene");
            std::process::abort();
        }
    };

    let exit = App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: config.window.title.clone(),
                resolution: WindowResolution::new(config.window.width, config.window.height),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(ActiveScene(scene))
        .add_plugins(TapfieldScenePlugin)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("Application exited with code {}", code),
    }
}

fn log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn log_filter(level: Level, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives)
}

/// Create the scene and its action library from the resources directory
fn load_interactive_scene(
    resources: &config::ResourcesConfig,
) -> Result<InteractiveScene, SceneError> {
    let loader = FileSceneLoader::new(&resources.path);
    let scene = create_scene(&loader, &resources.scene)?;
    let actions = load_action_library(&loader, &resources.actions)?;
    Ok(InteractiveScene::new(scene, actions))
}
