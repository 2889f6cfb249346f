//! # Listener
//!
//! The receiving side of the channel.

use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from listener operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Every handle to the window was dropped.
    #[error("window closed")]
    Closed,
}

/// A registration on a [`Window`](crate::Window).
///
/// Dropping the listener deregisters it.
pub struct Listener {
    receiver: broadcast::Receiver<Value>,
    window: String,
}

impl Listener {
    pub(crate) fn new(receiver: broadcast::Receiver<Value>, window: String) -> Self {
        Self { receiver, window }
    }

    /// Receive the next message.
    ///
    /// Returns `None` once the window is closed. Messages lost to lag are
    /// skipped.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(window = %self.window, lagged = count, "Listener lagged, messages dropped");
                }
            }
        }
    }

    /// Receive without waiting.
    ///
    /// - `Ok(Some(message))` - a message was waiting
    /// - `Ok(None)` - nothing waiting
    /// - `Err(ListenerError::Closed)` - the window is gone
    pub fn try_recv(&mut self) -> Result<Option<Value>, ListenerError> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(ListenerError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    /// Name of the window this listener is registered on.
    #[must_use]
    pub fn window(&self) -> &str {
        &self.window
    }

    /// Convert into a [`Stream`] of messages.
    #[must_use]
    pub fn into_stream(self) -> MessageStream {
        MessageStream {
            inner: BroadcastStream::new(self.receiver),
            window: self.window,
        }
    }
}

/// A listener viewed as a `tokio_stream::Stream`.
///
/// Ends when the window is closed.
pub struct MessageStream {
    inner: BroadcastStream<Value>,
    window: String,
}

impl Stream for MessageStream {
    type Item = Value;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let polled = Pin::new(&mut self.inner).poll_next(cx);
            match polled {
                Poll::Ready(Some(Ok(message))) => return Poll::Ready(Some(message)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(window = %self.window, lagged = count, "Stream lagged, messages dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
