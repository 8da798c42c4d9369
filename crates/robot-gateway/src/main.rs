//! House robot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p robot-gateway --bin house-robot
//! ```
//!
//! Reads `settings.json` and `responses.json` from the working directory
//! unless `HOUSE_ROBOT_SETTINGS` / `HOUSE_ROBOT_RESPONSES` point elsewhere.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use robot_common::{
    try_init_tracing_with_config, AppConfig, AppResult, Environment, TracingConfig,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load .env before reading APP_ENV
    let _ = dotenvy::dotenv();

    if let Err(e) = init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e} ({})", e.code());
    }

    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "House robot stopped");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = path_from_env("HOUSE_ROBOT_SETTINGS", "settings.json");
    let responses = path_from_env("HOUSE_ROBOT_RESPONSES", "responses.json");

    let config = load_config(&settings, &responses)
        .with_context(|| format!("Failed to load {}", settings.display()))?;

    info!(
        env = ?config.env,
        guild_id = %config.settings.guild_id,
        "Configuration loaded"
    );

    robot_gateway::run(config).await?;
    Ok(())
}

fn init_tracing() -> AppResult<()> {
    try_init_tracing_with_config(TracingConfig::for_environment(Environment::from_env()))?;
    Ok(())
}

fn load_config(settings: &Path, responses: &Path) -> AppResult<AppConfig> {
    let config = AppConfig::load(settings, responses)?;
    Ok(config)
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    env::var_os(var).map_or_else(|| PathBuf::from(default), PathBuf::from)
}
