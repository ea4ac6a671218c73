//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `valvehub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use valvehub_domain::config::ValveConfig;
use valvehub_domain::id::ObjectId;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The managed valve instance.
    pub valve: ValveConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration")]
    Validation(#[from] valvehub_domain::error::ConfigError),
}

impl Config {
    /// Load configuration from `valvehub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting valve configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("valvehub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VALVEHUB_ACTUATOR") {
            if let Ok(id) = val.parse::<u32>() {
                self.valve.actuator = ObjectId::new(id);
            }
        }
        if let Ok(val) = std::env::var("VALVEHUB_CYCLE_TIME") {
            if let Ok(seconds) = val.parse() {
                self.valve.cycle_time_seconds = seconds;
            }
        }
        if let Ok(val) = std::env::var("VALVEHUB_MAINTENANCE") {
            if let Ok(enabled) = val.parse() {
                self.valve.maintenance_mode = enabled;
            }
        }
        if let Ok(val) = std::env::var("VALVEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.valve.validate()?;
        Ok(())
    }
}
