//! The parent page: owns the text and answers the webview.

use crate::config::{DemoConfig, Latency};
use crate::contract::{DemoContract, GetText, InduceError, MultiplyByFour, INDUCED_ERROR};
use bridge_channel::WindowPair;
use bridge_rpc::{HandlerRegistry, Unsubscribe};
use parking_lot::RwLock;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info};

/// State the parent's handlers read on every request.
struct PageState {
    text: RwLock<String>,
    latency: RwLock<Latency>,
}

impl PageState {
    async fn delay(&self) {
        let latency = *self.latency.read();
        if latency != Latency::None {
            debug!(?latency, "Delaying response");
            tokio::time::sleep(latency.as_duration()).await;
        }
    }
}

/// Parent page context.
pub struct ParentPage {
    state: Arc<PageState>,
    registry: Arc<HandlerRegistry<DemoContract>>,
}

impl ParentPage {
    pub fn new(config: &DemoConfig) -> Self {
        let state = Arc::new(PageState {
            text: RwLock::new(config.text.clone()),
            latency: RwLock::new(config.latency),
        });

        let registry = HandlerRegistry::new();

        let s = state.clone();
        registry.register(GetText, move |()| {
            let state = s.clone();
            async move {
                state.delay().await;
                Ok::<_, Infallible>(state.text.read().clone())
            }
        });

        let s = state.clone();
        registry.register(MultiplyByFour, move |(n,)| {
            let state = s.clone();
            async move {
                state.delay().await;
                Ok::<_, Infallible>(4 * n)
            }
        });

        let s = state.clone();
        registry.register(InduceError, move |()| {
            let state = s.clone();
            async move {
                state.delay().await;
                Err::<(), _>(INDUCED_ERROR)
            }
        });

        Self {
            state,
            registry: Arc::new(registry),
        }
    }

    /// Answer requests posted to the parent window, replying to the content
    /// window.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn serve(&self, windows: &WindowPair) -> Unsubscribe {
        info!(
            inbox = windows.parent.label(),
            outbox = windows.content.label(),
            "Parent page serving"
        );
        self.registry.serve(
            windows.parent.subscribe().into_stream(),
            Arc::new(windows.content.clone()),
        )
    }

    /// Replace the text served by `getText`.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.state.text.write() = text.into();
    }

    pub fn text(&self) -> String {
        self.state.text.read().clone()
    }

    pub fn set_latency(&self, latency: Latency) {
        *self.state.latency.write() = latency;
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry<DemoContract>> {
        &self.registry
    }
}
