//! Service Configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then `TRIP__*`
//! environment variables (`TRIP__SERVER__PORT=9000`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config file read when `TRIP_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "config/service.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model artifact written by `trip-train`
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            model: ModelConfig {
                path: PathBuf::from("models/trip_duration_ridge.bin"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl ServiceConfig {
    /// Load from `TRIP_CONFIG` (or the default file) plus the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var("TRIP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    /// Load from a specific file path; a missing file is not an error
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        Self::load_layered(file, environment())
    }

    fn load_layered(file: &str, env: config::Environment) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("model.path", defaults.model.path.to_string_lossy().into_owned())?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .add_source(config::File::with_name(file).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

/// `TRIP__<SECTION>__<KEY>` variables
fn environment() -> config::Environment {
    config::Environment::with_prefix("TRIP")
        .separator("__")
        .try_parsing(true)
}
