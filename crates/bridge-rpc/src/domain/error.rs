//! Errors surfaced through a call's future.

use bridge_types::{ArgsError, CallId, TransportError};
use thiserror::Error;

/// Result alias for bridge calls.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Why a call did not produce its operation's result.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No response arrived within the call's timeout.
    #[error("{operation} timed out (id: {call_id})")]
    Timeout { operation: String, call_id: CallId },

    /// The callee's operation failed. Displays exactly the description it
    /// reported.
    #[error("{0}")]
    Application(String),

    /// The request could not be emitted.
    #[error("failed to send {operation} (id: {call_id}): {source}")]
    Transport {
        operation: String,
        call_id: CallId,
        #[source]
        source: TransportError,
    },

    /// Arguments could not be encoded for the wire.
    #[error("invalid arguments for {operation}: {source}")]
    Arguments {
        operation: String,
        #[source]
        source: ArgsError,
    },

    /// The request envelope could not be serialized.
    #[error("failed to encode request for {operation}: {source}")]
    Encode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response payload did not match the operation's output type.
    #[error("unexpected response for {operation}: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// The contract does not declare this operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A timeout was requested outside a Tokio runtime.
    #[error("cannot arm timeout for {operation}: no Tokio runtime")]
    NoRuntime { operation: String },

    /// Every generated identifier collided with a pending call.
    #[error("no free call identifier after {attempts} attempt(s)")]
    IdExhausted { attempts: u32 },

    /// The engine was dropped before the call settled.
    #[error("{operation} abandoned (id: {call_id})")]
    Abandoned { operation: String, call_id: CallId },
}

impl BridgeError {
    /// Whether the call ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }

    /// Whether the callee reported the failure.
    pub fn is_application(&self) -> bool {
        matches!(self, BridgeError::Application(_))
    }
}
