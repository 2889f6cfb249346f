//! Inbound dispatch for both ends of a bridge.
//!
//! - [`ResponseDispatcher`]: caller side, feeds responses to the engine
//! - [`HandlerRegistry`]: callee side, runs requests and replies
//!
//! Both consume a stream of raw messages in a spawned task and hand back an
//! [`Unsubscribe`] handle that stops it.

pub mod callee;
pub mod caller;

pub use callee::{HandlerRegistry, RequestHandler};
pub use caller::ResponseDispatcher;

use futures::{Stream, StreamExt};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::AbortHandle;
use tracing::debug;

/// Handle to a running receive loop.
///
/// Unsubscribing stops the loop; messages arriving afterwards are not
/// processed. Work already started for earlier messages runs to completion.
/// Dropping the handle unsubscribes.
#[must_use = "dropping the handle unsubscribes immediately"]
#[derive(Debug)]
pub struct Unsubscribe {
    active: Arc<AtomicBool>,
    task: AbortHandle,
    label: &'static str,
}

impl Unsubscribe {
    /// Run `on_message` for every message of `inbound` in a new task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub(crate) fn spawn<S, F>(label: &'static str, inbound: S, mut on_message: F) -> Self
    where
        S: Stream<Item = Value> + Send + 'static,
        F: FnMut(Value) + Send + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let flag = active.clone();

        let task = tokio::spawn(async move {
            let mut inbound = Box::pin(inbound);
            while let Some(message) = inbound.next().await {
                if !flag.load(Ordering::Acquire) {
                    break;
                }
                on_message(message);
            }
            debug!(listener = label, "Receive loop stopped");
        });

        debug!(listener = label, "Receive loop started");
        Self {
            active,
            task: task.abort_handle(),
            label,
        }
    }

    /// Stop the receive loop. Calling this more than once is harmless.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            self.task.abort();
            debug!(listener = self.label, "Unsubscribed");
        }
    }

    /// Whether the loop is still accepting messages.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && !self.task.is_finished()
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
