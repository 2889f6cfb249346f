//! Per-call options.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOptions {
    /// Time to wait for a response. `None` uses the engine default; zero
    /// waits forever.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl CallOptions {
    /// Use the engine's default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `ms` milliseconds. `0` disables the timeout.
    pub fn timeout_ms(ms: u64) -> Self {
        Self {
            timeout: Some(Duration::from_millis(ms)),
        }
    }

    /// Wait for the given duration. Zero disables the timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Never time out.
    pub fn no_timeout() -> Self {
        Self::with_timeout(Duration::ZERO)
    }

    /// Effective timeout given the engine default. `None` means no timer.
    pub fn resolve(&self, default: Option<Duration>) -> Option<Duration> {
        match self.timeout {
            Some(timeout) if timeout.is_zero() => None,
            Some(timeout) => Some(timeout),
            None => default,
        }
    }
}
