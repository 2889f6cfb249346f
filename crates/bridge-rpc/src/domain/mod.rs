//! Domain types for the correlation engine.

pub mod call_id;
pub mod config;
pub mod error;
pub mod options;

pub use call_id::{generator_for, IdGenerator, TimestampIdGenerator, UuidV4Generator};
pub use config::{BridgeConfig, ConfigError, IdStrategy, DEFAULT_MAX_ID_ATTEMPTS, DEFAULT_TIMEOUT_MS};
pub use error::{BridgeError, BridgeResult};
pub use options::CallOptions;
