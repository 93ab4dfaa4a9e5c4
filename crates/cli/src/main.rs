use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io,
};

use charsheet_core::{
    config::{self, AppConfig},
    CharacterManager, JsonDocumentStore, Shell,
};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_logging()?;

    if let Err(err) = run() {
        tracing::error!("Fatal error: {err:#}");
        return Err(err);
    }
    Ok(())
}

fn run() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    tracing::info!(
        character = %config.character_path.display(),
        recipes = %config.recipes_path.display(),
        "Configuration loaded"
    );

    let store = JsonDocumentStore::from_config(&config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(stdin.lock(), stdout.lock(), CharacterManager::new(store)).run()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("charsheet.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
