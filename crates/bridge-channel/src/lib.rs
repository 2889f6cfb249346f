//! # Bridge Channel - In-Memory Window Messaging
//!
//! Emulates the browser's cross-context messaging primitive so that bridge
//! peers can be wired together without a browser.
//!
//! ## Model
//!
//! Every context owns one inbox, a [`Window`]. Posting to a window delivers
//! a copy of the message to every listener currently registered on it.
//! Delivery is fire-and-forget: posting to a window nobody listens on
//! silently drops the message.
//!
//! ```text
//! ┌──────────────┐   content.post_message()   ┌──────────────┐
//! │    Parent    │ ─────────────────────────→ │    Webview   │
//! │  (listens on │                            │  (listens on │
//! │    parent)   │ ←───────────────────────── │   content)   │
//! └──────────────┘   parent.post_message()    └──────────────┘
//! ```
//!
//! A [`Window`] is also an [`OutboundTransport`](bridge_types::OutboundTransport),
//! so it can be handed straight to an engine or request handler.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod listener;
pub mod pair;
pub mod window;

// Re-export main types
pub use listener::{Listener, ListenerError, MessageStream};
pub use pair::WindowPair;
pub use window::Window;

/// Maximum messages buffered per listener before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
