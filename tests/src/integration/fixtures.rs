//! Shared fixtures: a test contract and a wired pair of contexts.

use bridge_channel::WindowPair;
use bridge_rpc::{
    contract, BridgeConfig, Contract, HandlerRegistry, Requester, Unsubscribe,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

contract! {
    /// Operations served by the callee in these tests.
    pub contract TestContract {
        Echo = "echo": (String,) => String;
        Add = "add": (i64, i64) => i64;
        /// Sleeps for the given number of milliseconds, then returns it.
        Sleep = "sleep": (u64,) => u64;
        Fail = "fail": (String,) => ();
        Panic = "panic": () => ();
        /// Declared but never registered.
        Missing = "missing": () => ();
    }
}

/// Contract that accepts any operation name on the dynamic path.
pub struct OpenContract;

impl Contract for OpenContract {}

/// Callee registry serving every [`TestContract`] operation except `missing`.
pub fn test_registry() -> Arc<HandlerRegistry<TestContract>> {
    let registry = HandlerRegistry::new();
    registry.register(Echo, |(text,)| async move { Ok::<_, Infallible>(text) });
    registry.register(Add, |(a, b)| async move { Ok::<_, Infallible>(a + b) });
    registry.register(Sleep, |(ms,)| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok::<_, Infallible>(ms)
    });
    registry.register(Fail, |(reason,)| async move { Err::<(), _>(reason) });
    registry.register(Panic, |()| async {
        if true {
            panic!("handler exploded");
        }
        Ok::<(), Infallible>(())
    });
    Arc::new(registry)
}

/// A callee serving on the parent window and a caller on the content window.
pub struct Bridge {
    pub windows: WindowPair,
    pub registry: Arc<HandlerRegistry<TestContract>>,
    pub served: Unsubscribe,
    pub requester: Requester<TestContract>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::with_config(BridgeConfig::default())
    }
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        let windows = WindowPair::new();
        let registry = test_registry();
        let served = serve(&registry, &windows);
        let requester = requester(config, &windows);
        Self {
            windows,
            registry,
            served,
            requester,
        }
    }
}

/// Serve `registry` on the parent window, replying to the content window.
pub fn serve<C: Contract>(registry: &Arc<HandlerRegistry<C>>, windows: &WindowPair) -> Unsubscribe {
    registry.serve(
        windows.parent.subscribe().into_stream(),
        Arc::new(windows.content.clone()),
    )
}

/// Caller listening on the content window and sending to the parent window.
pub fn requester<C: Contract>(config: BridgeConfig, windows: &WindowPair) -> Requester<C> {
    Requester::new(
        config,
        windows.content.subscribe().into_stream(),
        windows.parent.clone(),
    )
    .expect("valid config")
}
