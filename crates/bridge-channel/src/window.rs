//! # Window
//!
//! The posting side of the channel.

use crate::listener::Listener;
use crate::DEFAULT_CHANNEL_CAPACITY;
use bridge_types::{OutboundTransport, TransportError};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

struct WindowInner {
    /// Broadcast sender for messages.
    sender: broadcast::Sender<Value>,

    /// Name used in logs.
    label: String,

    /// Total messages posted.
    messages_posted: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

/// One context's inbox.
///
/// Uses `tokio::sync::broadcast` so every registered listener sees every
/// message posted after it subscribed. Clones share the same inbox.
#[derive(Clone)]
pub struct Window {
    inner: Arc<WindowInner>,
}

impl Window {
    /// Create a window with default capacity.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_capacity(label, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a window with the given per-listener capacity.
    #[must_use]
    pub fn with_capacity(label: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(WindowInner {
                sender,
                label: label.into(),
                messages_posted: AtomicU64::new(0),
                capacity,
            }),
        }
    }

    /// Post a message to this window.
    ///
    /// Returns the number of listeners that will see it. Zero is not an
    /// error: the message is simply dropped.
    pub fn post_message(&self, message: Value) -> usize {
        self.inner.messages_posted.fetch_add(1, Ordering::Relaxed);

        match self.inner.sender.send(message) {
            Ok(receivers) => {
                trace!(window = %self.inner.label, receivers, "Message posted");
                receivers
            }
            Err(_) => {
                debug!(window = %self.inner.label, "Message dropped (no listeners)");
                0
            }
        }
    }

    /// Register a listener for messages posted from now on.
    #[must_use]
    pub fn subscribe(&self) -> Listener {
        debug!(window = %self.inner.label, "Listener registered");
        Listener::new(self.inner.sender.subscribe(), self.inner.label.clone())
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Total messages posted to this window.
    #[must_use]
    pub fn messages_posted(&self) -> u64 {
        self.inner.messages_posted.load(Ordering::Relaxed)
    }

    /// Per-listener buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Name used in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("label", &self.inner.label)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl OutboundTransport for Window {
    fn emit(&self, message: Value) -> Result<(), TransportError> {
        self.post_message(message);
        Ok(())
    }
}
