//! # Bridge RPC
//!
//! Request/response calls over a one-way message channel.
//!
//! ## Architecture
//!
//! ```text
//!        caller context                          callee context
//! ┌─────────────────────────┐              ┌─────────────────────────┐
//! │ Requester               │   request    │ HandlerRegistry         │
//! │  └─ CorrelationEngine ──┼─────────────→│  └─ handler per op      │
//! │       └─ PendingCallTable              │                         │
//! │  ResponseDispatcher  ←──┼──────────────┼── response              │
//! └─────────────────────────┘              └─────────────────────────┘
//! ```
//!
//! Every request carries a fresh identifier; the response echoes it and the
//! engine settles the matching call. Calls that get no answer time out.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = Arc::new(CorrelationEngine::<DemoContract>::new(BridgeConfig::from_env()?)?);
//! let requester = Requester::attach(engine, inbox.subscribe().into_stream(), peer.clone());
//! let doubled = requester.execute::<MultiplyByFour>((2,), CallOptions::new()).await?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod requester;

pub use dispatch::{HandlerRegistry, RequestHandler, ResponseDispatcher, Unsubscribe};
pub use domain::{
    BridgeConfig, BridgeError, BridgeResult, CallOptions, ConfigError, IdGenerator, IdStrategy,
    TimestampIdGenerator, UuidV4Generator,
};
pub use engine::{CorrelationEngine, StatsSnapshot};
pub use requester::Requester;

// Re-export shared types
pub use bridge_types::{
    contract, ArgList, CallId, Contract, Operation, OutboundTransport, RequestEnvelope,
    ResponseEnvelope, TransportError,
};

/// Re-exported so handlers can be declared without a direct dependency.
pub use async_trait::async_trait;
