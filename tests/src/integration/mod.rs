//! Cross-context integration flows.

pub mod fixtures;

mod concurrency;
mod lifecycle;
mod round_trip;
