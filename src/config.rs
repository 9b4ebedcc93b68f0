//! Configuration loader for the `weatherstation-sim` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::{env, path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional path environment variable with a default value.
macro_rules! env_path {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).map(PathBuf::from).unwrap_or($default)
    };
}

/// What `ConfigStore::update` does when the threshold document cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Keep the in-memory change and log the failure.
    BestEffort,
    /// Apply the change only after the write succeeds; report failures to the caller.
    Strict,
}

impl std::str::FromStr for PersistPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            other => Err(anyhow!(
                "'{}' (expected 'best-effort' or 'strict')",
                other
            )),
        }
    }
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// TCP port the HTTP server listens on.
    pub port: u16,

    /// Location of the persisted threshold document.
    pub config_path: PathBuf,

    /// Directory the dashboard's static files are served from.
    pub static_dir: PathBuf,

    /// Period between two sensor advance steps.
    pub update_interval: Duration,

    /// Upper bound on a single threshold document write.
    pub persist_timeout: Duration,

    /// Behavior when a threshold document write fails.
    pub persist_policy: PersistPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            config_path: PathBuf::from("config.json"),
            static_dir: PathBuf::from("public"),
            update_interval: Duration::from_millis(2000),
            persist_timeout: Duration::from_millis(5000),
            persist_policy: PersistPolicy::BestEffort,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `PORT` – HTTP listen port (default: 3000)
/// - `CONFIG_PATH` – threshold document (default: `config.json`)
/// - `STATIC_DIR` – dashboard files (default: `public`)
/// - `UPDATE_INTERVAL_MS` – sensor advance period (default: 2000)
/// - `PERSIST_TIMEOUT_MS` – bound on one config write (default: 5000)
/// - `PERSIST_POLICY` – `best-effort` or `strict` (default: `best-effort`)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let defaults = Config::default();

    let port = parse_env!("PORT", u16, defaults.port);
    let config_path = env_path!("CONFIG_PATH", defaults.config_path);
    let static_dir = env_path!("STATIC_DIR", defaults.static_dir);
    let update_interval_ms = parse_env!(
        "UPDATE_INTERVAL_MS",
        u64,
        defaults.update_interval.as_millis() as u64
    );
    let persist_timeout_ms = parse_env!(
        "PERSIST_TIMEOUT_MS",
        u64,
        defaults.persist_timeout.as_millis() as u64
    );
    let persist_policy = parse_env!("PERSIST_POLICY", PersistPolicy, defaults.persist_policy);

    if update_interval_ms == 0 {
        return Err(anyhow!("Invalid UPDATE_INTERVAL_MS: must be greater than 0"));
    }

    Ok(Config {
        port,
        config_path,
        static_dir,
        update_interval: Duration::from_millis(update_interval_ms),
        persist_timeout: Duration::from_millis(persist_timeout_ms),
        persist_policy,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  PORT               : {}", self.port);
        tracing::info!("  CONFIG_PATH        : {}", self.config_path.display());
        tracing::info!("  STATIC_DIR         : {}", self.static_dir.display());
        tracing::info!("  UPDATE_INTERVAL_MS : {}", self.update_interval.as_millis());
        tracing::info!("  PERSIST_TIMEOUT_MS : {}", self.persist_timeout.as_millis());
        tracing::info!("  PERSIST_POLICY     : {:?}", self.persist_policy);
    }
}
