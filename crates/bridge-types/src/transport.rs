//! # Outbound Transport
//!
//! The single function an engine or request handler uses to put a message on
//! the channel. The embedding context supplies it: a window's
//! `postMessage`, an in-memory inbox, a test recorder.
//!
//! Any `Fn(Value) -> Result<(), TransportError>` closure is a transport.

use serde_json::Value;
use thiserror::Error;

/// Errors reported by an outbound transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No transport has been injected yet.
    #[error("no transport configured")]
    NotConfigured,

    /// The target context is gone.
    #[error("channel closed")]
    Closed,

    /// The transport refused the message.
    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// Emits one serialized envelope towards the peer.
pub trait OutboundTransport: Send + Sync {
    /// Emit `message`. Fire-and-forget: success means accepted, not delivered.
    fn emit(&self, message: Value) -> Result<(), TransportError>;
}

impl<F> OutboundTransport for F
where
    F: Fn(Value) -> Result<(), TransportError> + Send + Sync,
{
    fn emit(&self, message: Value) -> Result<(), TransportError> {
        self(message)
    }
}
