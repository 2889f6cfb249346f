//! Demo configuration from environment variables.

use bridge_rpc::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Artificial delay the parent waits before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    #[default]
    None,
    Low,
    Medium,
    High,
    /// As long as the default call timeout.
    Timeout,
}

impl Latency {
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(match self {
            Latency::None => 0,
            Latency::Low => 300,
            Latency::Medium => 750,
            Latency::High => 2000,
            Latency::Timeout => 10_000,
        })
    }
}

impl FromStr for Latency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Latency::None),
            "low" => Ok(Latency::Low),
            "medium" => Ok(Latency::Medium),
            "high" => Ok(Latency::High),
            "timeout" => Ok(Latency::Timeout),
            _ => Err(()),
        }
    }
}

/// Demo settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Parent-side latency
    pub latency: Latency,
    /// Initial text served by `getText`
    pub text: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            latency: Latency::None,
            text: "The parent page is loaded".to_string(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BRIDGE_DEMO_LATENCY`: none, low, medium, high or timeout (default: none)
    /// - `BRIDGE_DEMO_TEXT`: text served by `getText`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BRIDGE_DEMO_LATENCY") {
            config.latency = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_DEMO_LATENCY",
                value,
            })?;
        }
        if let Some(text) = lookup("BRIDGE_DEMO_TEXT") {
            config.text = text;
        }

        Ok(config)
    }
}
