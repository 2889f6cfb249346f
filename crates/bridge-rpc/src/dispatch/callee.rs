//! # Handler Registry
//!
//! The callee side. Requests are looked up by operation name, run, and
//! answered with a response envelope echoing the request's identifier.
//!
//! A handler never takes the receive loop down with it: returned errors
//! become the response's error description, and panics are caught and
//! reported the same way.

use super::Unsubscribe;
use crate::domain::BridgeError;
use async_trait::async_trait;
use bridge_types::{
    ArgList, Contract, Envelope, Operation, OutboundTransport, RequestEnvelope, ResponseEnvelope,
};
use futures::{FutureExt, Stream};
use parking_lot::RwLock;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Runs one operation from its raw argument list.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Produce the result payload, or an error description.
    async fn handle(&self, args: Vec<Value>) -> Result<Value, String>;
}

/// Adapts a typed async function to [`RequestHandler`].
struct TypedHandler<O, F> {
    function: F,
    _operation: PhantomData<fn() -> O>,
}

#[async_trait]
impl<O, F, Fut, E> RequestHandler for TypedHandler<O, F>
where
    O: Operation,
    F: Fn(O::Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O::Output, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async fn handle(&self, args: Vec<Value>) -> Result<Value, String> {
        let args = <O::Args as ArgList>::from_values(args)
            .map_err(|e| format!("invalid arguments for {}: {}", O::NAME, e))?;
        let output = (self.function)(args).await.map_err(|e| e.to_string())?;
        serde_json::to_value(output)
            .map_err(|e| format!("failed to encode result of {}: {}", O::NAME, e))
    }
}

/// Operations served by one context.
pub struct HandlerRegistry<C: Contract> {
    handlers: RwLock<HashMap<String, Arc<dyn RequestHandler>>>,
    _contract: PhantomData<fn() -> C>,
}

impl<C: Contract> Default for HandlerRegistry<C> {
    fn default() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            _contract: PhantomData,
        }
    }
}

impl<C: Contract> HandlerRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve operation `O` with an async function of its arguments.
    ///
    /// Replaces any handler already registered for the operation.
    pub fn register<O, F, Fut, E>(&self, _operation: O, function: F)
    where
        O: Operation<Contract = C>,
        F: Fn(O::Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O::Output, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let handler = TypedHandler::<O, F> {
            function,
            _operation: PhantomData,
        };
        self.insert(O::NAME, Arc::new(handler));
    }

    /// Serve an operation by name with a dynamic handler.
    ///
    /// Fails if the contract does not declare `operation`.
    pub fn register_raw(
        &self,
        operation: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<(), BridgeError> {
        if !C::declares(operation) {
            return Err(BridgeError::UnknownOperation(operation.to_string()));
        }
        self.insert(operation, handler);
        Ok(())
    }

    fn insert(&self, operation: &str, handler: Arc<dyn RequestHandler>) {
        let replaced = self
            .handlers
            .write()
            .insert(operation.to_string(), handler)
            .is_some();
        debug!(operation, replaced, "Registered handler");
    }

    /// Stop serving `operation`. Returns whether a handler was removed.
    pub fn unregister(&self, operation: &str) -> bool {
        self.handlers.write().remove(operation).is_some()
    }

    /// Whether `operation` has a handler.
    pub fn is_registered(&self, operation: &str) -> bool {
        self.handlers.read().contains_key(operation)
    }

    /// Run `request` and build its response.
    pub async fn handle(&self, mut request: RequestEnvelope) -> ResponseEnvelope {
        let args = std::mem::take(&mut request.args);
        let RequestEnvelope { uid, function_name, .. } = &request;

        let handler = self.handlers.read().get(function_name).cloned();
        let outcome = match handler {
            None => {
                debug!(call_id = %uid, operation = %function_name, "No handler for operation");
                Err(format!("unknown operation: {}", function_name))
            }
            Some(handler) => match AssertUnwindSafe(handler.handle(args)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(
                        call_id = %uid,
                        operation = %function_name,
                        panic = %message,
                        "Handler panicked"
                    );
                    Err(format!("operation {} panicked: {}", function_name, message))
                }
            },
        };

        if let Err(description) = &outcome {
            debug!(call_id = %uid, operation = %function_name, error = %description, "Operation failed");
        }

        ResponseEnvelope::reply_to(&request, outcome)
    }

    /// Answer every request arriving on `inbound` through `outbound`.
    ///
    /// Each request runs in its own task. Messages that are not requests are
    /// skipped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn serve<S>(self: &Arc<Self>, inbound: S, outbound: Arc<dyn OutboundTransport>) -> Unsubscribe
    where
        S: Stream<Item = Value> + Send + 'static,
    {
        let registry = Arc::clone(self);
        Unsubscribe::spawn("requests", inbound, move |message| {
            let request = match Envelope::from_value(message) {
                Ok(Envelope::Request(request)) => request,
                Ok(Envelope::Response(response)) => {
                    debug!(call_id = %response.uid, "Ignoring response on request channel");
                    return;
                }
                Err(error) => {
                    debug!(%error, "Ignoring unrecognized inbound message");
                    return;
                }
            };

            let registry = registry.clone();
            let outbound = outbound.clone();
            tokio::spawn(async move {
                let response = registry.handle(request).await;
                reply(outbound.as_ref(), response);
            });
        })
    }
}

fn reply(outbound: &dyn OutboundTransport, response: ResponseEnvelope) {
    let call_id = response.uid.clone();
    let message = match serde_json::to_value(&response) {
        Ok(message) => message,
        Err(error) => {
            warn!(call_id = %call_id, %error, "Failed to encode response");
            return;
        }
    };
    if let Err(error) = outbound.emit(message) {
        warn!(call_id = %call_id, %error, "Failed to send response");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
