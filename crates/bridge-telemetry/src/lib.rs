//! # Bridge Telemetry
//!
//! Logging setup shared by the binaries that host a bridge.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_tracing(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BRIDGE_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `BRIDGE_JSON_LOGS` | `false` | JSON formatted output |
//! | `BRIDGE_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `OTEL_SERVICE_NAME` | `postbridge` | Service name attached to logs |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}
