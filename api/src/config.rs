//! Configuration loading for the server binary

use anyhow::Context;
use tr_shared::{AppConfig, Environment};

/// Load `.env` files and build the validated application configuration.
///
/// The environment specific file (`.env.development`, ...) is read first so
/// its values win over the plain `.env` fallback. Variables already present
/// in the process environment are never overwritten.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    config
        .validate()
        .with_context(|| format!("invalid configuration for {} environment", config.environment))?;

    Ok(config)
}
