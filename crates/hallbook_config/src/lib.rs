// --- File: crates/hallbook_config/src/lib.rs ---
//! Unified configuration for the Hallbook workspace.
//!
//! Layered loading: `config/default.toml` (optional), then an optional
//! environment-specific file selected by `RUN_ENV`, then `APP_*` environment
//! overrides with `__` as the section separator (e.g. `APP_SERVER__PORT`).
//! Secrets never live in files; each integration reads its own env var.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;

pub mod models;
pub use models::*;

static DOTENV_LOADED: OnceCell<()> = OnceCell::new();

/// Loads `.env` exactly once per process. Missing files are fine.
pub fn ensure_dotenv_loaded() {
    DOTENV_LOADED.get_or_init(|| {
        if dotenv::dotenv().is_err() {
            tracing::debug!("No .env file found, relying on process environment");
        }
    });
}

/// Loads the application configuration from files and environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "default".to_string());

    let config = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    config.try_deserialize()
}
