//! # Correlation Engine
//!
//! Turns the fire-and-forget channel into request/response calls.
//!
//! ## Flow
//!
//! 1. `call()` draws an identifier that no pending call uses
//! 2. The call is stored in the [`PendingCallTable`]
//! 3. A request envelope is emitted through the injected transport
//! 4. A timer is armed if the call has a timeout
//! 5. The inbound dispatcher hands responses to `deliver()`, which settles
//!    the matching call and cancels its timer
//!
//! All of this happens when `call()` is invoked. The returned future only
//! waits for the settlement.

pub mod pending;

pub use pending::{PendingCallTable, PendingStats, StatsSnapshot};

use crate::domain::{
    generator_for, BridgeConfig, BridgeError, BridgeResult, CallOptions, ConfigError, IdGenerator,
};
use bridge_types::{
    ArgList, CallId, Contract, Operation, OutboundTransport, RequestEnvelope, ResponseEnvelope,
    TransportError,
};
use futures::future::{self, Either};
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use pending::Settlement;

/// Caller-side engine for one contract.
///
/// Owned by the context that issues calls and shared as
/// `Arc<CorrelationEngine<C>>`.
pub struct CorrelationEngine<C: Contract> {
    table: Arc<PendingCallTable>,
    transport: RwLock<Option<Arc<dyn OutboundTransport>>>,
    ids: Box<dyn IdGenerator>,
    config: BridgeConfig,
    _contract: PhantomData<fn() -> C>,
}

/// A call that has been sent and is waiting to settle.
struct InFlight {
    receiver: oneshot::Receiver<Settlement>,
    operation: String,
    call_id: CallId,
}

impl InFlight {
    async fn settle(self) -> BridgeResult<Value> {
        match self.receiver.await {
            Ok(settlement) => settlement,
            Err(_) => Err(BridgeError::Abandoned {
                operation: self.operation,
                call_id: self.call_id,
            }),
        }
    }
}

impl<C: Contract> CorrelationEngine<C> {
    /// Create an engine from validated configuration.
    pub fn new(config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ids = generator_for(config.id_strategy);
        Ok(Self::build(config, ids))
    }

    /// Create an engine with a custom identifier source.
    pub fn with_id_generator(
        config: BridgeConfig,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, ids))
    }

    fn build(config: BridgeConfig, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            table: Arc::new(PendingCallTable::new()),
            transport: RwLock::new(None),
            ids,
            config,
            _contract: PhantomData,
        }
    }

    /// Call operation `O` on the peer.
    ///
    /// The request is sent before this returns. The future resolves with the
    /// operation's result, the peer's error, or a timeout.
    pub fn call<O>(
        &self,
        args: O::Args,
        options: CallOptions,
    ) -> impl Future<Output = BridgeResult<O::Output>> + Send + 'static
    where
        O: Operation<Contract = C>,
    {
        let started = args
            .into_values()
            .map_err(|source| BridgeError::Arguments {
                operation: O::NAME.to_string(),
                source,
            })
            .and_then(|values| self.start(O::NAME, values, options));

        async move {
            let value = started?.settle().await?;
            serde_json::from_value(value).map_err(|source| BridgeError::Decode {
                operation: O::NAME.to_string(),
                source,
            })
        }
    }

    /// Call an operation by name with raw arguments.
    ///
    /// The name is checked against the contract; the payload is returned
    /// undecoded.
    pub fn call_raw(
        &self,
        operation: &str,
        args: Vec<Value>,
        options: CallOptions,
    ) -> impl Future<Output = BridgeResult<Value>> + Send + 'static {
        if !C::declares(operation) {
            debug!(operation, "Rejected call to undeclared operation");
            return Either::Left(future::ready(Err(BridgeError::UnknownOperation(
                operation.to_string(),
            ))));
        }

        match self.start(operation, args, options) {
            Ok(in_flight) => Either::Right(in_flight.settle()),
            Err(err) => Either::Left(future::ready(Err(err))),
        }
    }

    fn start(
        &self,
        operation: &str,
        args: Vec<Value>,
        options: CallOptions,
    ) -> BridgeResult<InFlight> {
        let timeout = options.resolve(self.config.default_timeout());
        let runtime = match timeout {
            Some(_) => Some(Handle::try_current().map_err(|_| BridgeError::NoRuntime {
                operation: operation.to_string(),
            })?),
            None => None,
        };

        let (call_id, receiver) = self.register(operation)?;

        let envelope = RequestEnvelope::new(call_id.clone(), operation, args);
        let message = match serde_json::to_value(&envelope) {
            Ok(message) => message,
            Err(source) => {
                self.table.fail_send(&call_id);
                return Err(BridgeError::Encode {
                    operation: operation.to_string(),
                    source,
                });
            }
        };

        if let Err(source) = self.emit(message) {
            self.table.fail_send(&call_id);
            warn!(call_id = %call_id, operation, error = %source, "Failed to send request");
            return Err(BridgeError::Transport {
                operation: operation.to_string(),
                call_id,
                source,
            });
        }

        if let (Some(timeout), Some(runtime)) = (timeout, runtime) {
            self.arm_timer(&runtime, &call_id, timeout);
        }

        Ok(InFlight {
            receiver,
            operation: operation.to_string(),
            call_id,
        })
    }

    fn register(&self, operation: &str) -> BridgeResult<(CallId, oneshot::Receiver<Settlement>)> {
        let attempts = self.config.max_id_attempts;
        for _ in 0..attempts {
            let call_id = self.ids.generate();
            match self.table.try_register(&call_id, operation) {
                Some(receiver) => return Ok((call_id, receiver)),
                None => debug!(call_id = %call_id, "Identifier collision, drawing again"),
            }
        }
        Err(BridgeError::IdExhausted { attempts })
    }

    fn emit(&self, message: Value) -> Result<(), TransportError> {
        // Clone out so the lock is released before the transport runs.
        let transport = self.transport.read().clone();
        match transport {
            Some(transport) => transport.emit(message),
            None => Err(TransportError::NotConfigured),
        }
    }

    fn arm_timer(&self, runtime: &Handle, call_id: &CallId, timeout: Duration) {
        let table = Arc::downgrade(&self.table);
        let id = call_id.clone();
        let task = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(table) = table.upgrade() {
                table.expire(&id, timeout);
            }
        });

        // Settled synchronously by the transport: nothing left to time.
        if !self.table.attach_timer(call_id, task.abort_handle()) {
            task.abort();
        }
    }

    /// Settle the call answered by `response`.
    ///
    /// A response for a call that already settled, timed out, or never
    /// existed is ignored.
    pub fn deliver(&self, response: ResponseEnvelope) {
        let call_id = response.uid.clone();
        self.table.complete(&call_id, response.into_outcome());
    }

    /// Install the function used to emit requests, replacing any previous
    /// one.
    pub fn set_transport<T>(&self, transport: T)
    where
        T: OutboundTransport + 'static,
    {
        self.set_shared_transport(Arc::new(transport));
    }

    /// Install an already shared transport.
    pub fn set_shared_transport(&self, transport: Arc<dyn OutboundTransport>) {
        *self.transport.write() = Some(transport);
    }

    /// Remove the transport. Later calls fail until one is installed.
    pub fn clear_transport(&self) {
        *self.transport.write() = None;
    }

    /// Whether a transport is installed.
    pub fn has_transport(&self) -> bool {
        self.transport.read().is_some()
    }

    /// Number of calls awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.table.pending_count()
    }

    /// Whether `call_id` is awaiting a response.
    pub fn is_pending(&self, call_id: &CallId) -> bool {
        self.table.is_pending(call_id)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.table.stats().snapshot()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl<C: Contract> Default for CorrelationEngine<C> {
    fn default() -> Self {
        let config = BridgeConfig::default();
        let ids = generator_for(config.id_strategy);
        Self::build(config, ids)
    }
}
