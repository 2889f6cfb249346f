//! # Bridge Types Crate
//!
//! Types shared by both ends of a bridge: the request/response envelopes that
//! travel over the channel, the operation contract traits that make call
//! sites type-checked, and the outbound transport seam.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Both peers compile against the same
//!   contract. There is no schema negotiation on the wire.
//! - **Verbatim Envelopes**: Envelopes are immutable once built and are
//!   serialized with the camelCase field names the browser side expects.
//! - **One Emit Function**: The engine only ever sees an
//!   [`OutboundTransport`]; the concrete channel stays outside.

pub mod args;
pub mod contract;
pub mod envelope;
pub mod transport;

pub use args::{ArgList, ArgsError};
pub use contract::{Contract, Operation};
pub use envelope::{CallId, Envelope, RequestEnvelope, ResponseEnvelope};
pub use transport::{OutboundTransport, TransportError};
