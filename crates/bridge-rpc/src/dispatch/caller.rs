//! Response Dispatcher - routes inbound responses to the engine.

use super::Unsubscribe;
use crate::engine::CorrelationEngine;
use bridge_types::{Contract, Envelope};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Feeds responses arriving on the caller's inbox to its engine.
pub struct ResponseDispatcher<C: Contract> {
    engine: Arc<CorrelationEngine<C>>,
}

impl<C: Contract> Clone for ResponseDispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<C: Contract> ResponseDispatcher<C> {
    pub fn new(engine: Arc<CorrelationEngine<C>>) -> Self {
        Self { engine }
    }

    /// Route one inbound message.
    ///
    /// Returns `true` if it was a response and reached the engine. Requests
    /// and unrelated traffic are ignored.
    pub fn dispatch(&self, message: Value) -> bool {
        match Envelope::from_value(message) {
            Ok(Envelope::Response(response)) => {
                self.engine.deliver(response);
                true
            }
            Ok(Envelope::Request(request)) => {
                debug!(call_id = %request.uid, "Ignoring request on response channel");
                false
            }
            Err(error) => {
                debug!(%error, "Ignoring unrecognized inbound message");
                false
            }
        }
    }

    /// Dispatch every message of `inbound` until it ends.
    pub async fn run<S>(&self, inbound: S)
    where
        S: Stream<Item = Value>,
    {
        let mut inbound = Box::pin(inbound);
        while let Some(message) = inbound.next().await {
            self.dispatch(message);
        }
    }

    /// Dispatch `inbound` in a background task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<S>(&self, inbound: S) -> Unsubscribe
    where
        S: Stream<Item = Value> + Send + 'static,
    {
        let dispatcher = self.clone();
        Unsubscribe::spawn("responses", inbound, move |message| {
            dispatcher.dispatch(message);
        })
    }

    pub fn engine(&self) -> &Arc<CorrelationEngine<C>> {
        &self.engine
    }
}
