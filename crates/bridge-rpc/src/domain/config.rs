//! Bridge configuration with validation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default call timeout (10 seconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default number of identifier draws before giving up on a call.
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 8;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_id_attempts cannot be 0")]
    ZeroIdAttempts,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Identifier generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random UUID v4.
    #[default]
    Uuid,
    /// Random component plus millisecond timestamp.
    Timestamp,
}

impl FromStr for IdStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "timestamp" => Ok(IdStrategy::Timestamp),
            _ => Err(()),
        }
    }
}

/// Correlation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Timeout applied when a call does not specify one. `0` disables it.
    pub default_timeout_ms: u64,
    /// How call identifiers are generated.
    pub id_strategy: IdStrategy,
    /// Identifier draws per call before failing with `IdExhausted`.
    pub max_id_attempts: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            id_strategy: IdStrategy::Uuid,
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BRIDGE_DEFAULT_TIMEOUT_MS`: default call timeout (default: 10000, 0 disables)
    /// - `BRIDGE_ID_STRATEGY`: `uuid` or `timestamp` (default: uuid)
    /// - `BRIDGE_MAX_ID_ATTEMPTS`: identifier draws per call (default: 8)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BRIDGE_DEFAULT_TIMEOUT_MS") {
            config.default_timeout_ms = parse_value("BRIDGE_DEFAULT_TIMEOUT_MS", value)?;
        }
        if let Some(value) = lookup("BRIDGE_ID_STRATEGY") {
            config.id_strategy = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_ID_STRATEGY",
                value,
            })?;
        }
        if let Some(value) = lookup("BRIDGE_MAX_ID_ATTEMPTS") {
            config.max_id_attempts = parse_value("BRIDGE_MAX_ID_ATTEMPTS", value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_id_attempts == 0 {
            return Err(ConfigError::ZeroIdAttempts);
        }
        Ok(())
    }

    /// Default timeout, or `None` when timeouts are disabled by default.
    pub fn default_timeout(&self) -> Option<Duration> {
        match self.default_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
