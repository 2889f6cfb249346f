//! Requester - a caller context's handle for issuing calls.

use crate::dispatch::{ResponseDispatcher, Unsubscribe};
use crate::domain::{BridgeConfig, BridgeResult, CallOptions, ConfigError};
use crate::engine::CorrelationEngine;
use bridge_types::{Contract, Operation, OutboundTransport};
use futures::Stream;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// An engine wired to a channel.
///
/// Constructed once per context and passed to whatever needs to make calls.
/// Clones share the engine and the response listener; the listener stops
/// when the last clone is dropped or [`detach`](Self::detach) is called.
pub struct Requester<C: Contract> {
    engine: Arc<CorrelationEngine<C>>,
    subscription: Arc<Unsubscribe>,
}

impl<C: Contract> Clone for Requester<C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            subscription: self.subscription.clone(),
        }
    }
}

impl<C: Contract> Requester<C> {
    /// Wire `engine` to send through `outbound` and settle calls from
    /// responses arriving on `inbound`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn attach<S, T>(engine: Arc<CorrelationEngine<C>>, inbound: S, outbound: T) -> Self
    where
        S: Stream<Item = Value> + Send + 'static,
        T: OutboundTransport + 'static,
    {
        engine.set_transport(outbound);
        let subscription = ResponseDispatcher::new(engine.clone()).spawn(inbound);
        Self {
            engine,
            subscription: Arc::new(subscription),
        }
    }

    /// Build an engine from `config` and attach it.
    pub fn new<S, T>(config: BridgeConfig, inbound: S, outbound: T) -> Result<Self, ConfigError>
    where
        S: Stream<Item = Value> + Send + 'static,
        T: OutboundTransport + 'static,
    {
        let engine = Arc::new(CorrelationEngine::new(config)?);
        Ok(Self::attach(engine, inbound, outbound))
    }

    /// Call operation `O` on the peer.
    pub fn execute<O>(
        &self,
        args: O::Args,
        options: CallOptions,
    ) -> impl Future<Output = BridgeResult<O::Output>> + Send + 'static
    where
        O: Operation<Contract = C>,
    {
        self.engine.call::<O>(args, options)
    }

    /// Call an operation by name.
    pub fn execute_raw(
        &self,
        operation: &str,
        args: Vec<Value>,
        options: CallOptions,
    ) -> impl Future<Output = BridgeResult<Value>> + Send + 'static {
        self.engine.call_raw(operation, args, options)
    }

    pub fn engine(&self) -> &Arc<CorrelationEngine<C>> {
        &self.engine
    }

    /// Stop listening for responses and remove the transport.
    ///
    /// Calls still pending settle only by timeout. Affects every clone.
    pub fn detach(&self) {
        self.subscription.unsubscribe();
        self.engine.clear_transport();
    }

    /// Whether the response listener is running.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }
}
