//! Call identifier generation.
//!
//! Identifiers only need to be unique among the calls pending on one engine
//! (tens at most), so no cryptographic randomness or global counter is used.
//! The engine rejects a generated identifier that is already pending and asks
//! for another, which turns probabilistic uniqueness into exact uniqueness.

use bridge_types::CallId;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::config::IdStrategy;

/// Source of fresh call identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> CallId;
}

/// Random UUID v4 strings (`xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn generate(&self) -> CallId {
        CallId::new(Uuid::new_v4().to_string())
    }
}

/// A random `u32` followed by the current Unix time in milliseconds, digits
/// only.
///
/// Shorter than a UUID. Calls made in the same millisecond differ only in the
/// random part, so it has to be wide enough for a burst of calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn generate(&self) -> CallId {
        let random: u32 = rand::thread_rng().gen();
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        CallId::new(format!("{}{}", random, millis))
    }
}

/// Build the generator selected by configuration.
pub fn generator_for(strategy: IdStrategy) -> Box<dyn IdGenerator> {
    match strategy {
        IdStrategy::Uuid => Box::new(UuidV4Generator),
        IdStrategy::Timestamp => Box::new(TimestampIdGenerator),
    }
}
