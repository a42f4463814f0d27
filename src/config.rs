//! Configuration loader for the `crowdcast` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::{env, net::IpAddr, path::PathBuf};

use anyhow::{anyhow, Result};

/// Parse an optional port environment variable with a default value.
macro_rules! parse_env_u16 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional IP address environment variable with a default value.
macro_rules! parse_env_ip {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<IpAddr>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Path of the append-only readings file.
    pub data_file: PathBuf,

    /// Address the HTTP server binds to.
    pub bind_addr: IpAddr,

    /// Port the HTTP server listens on.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `DATA_FILE` – readings store path (default: `data.jsonl`)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0`)
/// - `PORT` – listen port (default: 5000)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let data_file = env::var("DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data.jsonl"));
    let bind_addr = parse_env_ip!("BIND_ADDR", IpAddr::from([0, 0, 0, 0]));
    let port = parse_env_u16!("PORT", 5000);

    Ok(Config {
        data_file,
        bind_addr,
        port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATA_FILE : {}", self.data_file.display());
        tracing::info!("  BIND_ADDR : {}", self.bind_addr);
        tracing::info!("  PORT      : {}", self.port);
    }
}
