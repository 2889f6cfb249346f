//! The embedded webview: calls the parent as if its operations were local
//! async functions.

use crate::contract::{DemoContract, GetText, InduceError, MultiplyByFour};
use bridge_channel::WindowPair;
use bridge_rpc::{BridgeConfig, BridgeResult, CallOptions, ConfigError, Requester};
use tracing::info;

/// Webview context.
#[derive(Clone)]
pub struct WebviewPage {
    requester: Requester<DemoContract>,
}

impl WebviewPage {
    /// Listen on the content window and send requests to the parent window.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn attach(config: BridgeConfig, windows: &WindowPair) -> Result<Self, ConfigError> {
        let requester = Requester::new(
            config,
            windows.content.subscribe().into_stream(),
            windows.parent.clone(),
        )?;
        info!(
            inbox = windows.content.label(),
            outbox = windows.parent.label(),
            "Webview attached"
        );
        Ok(Self { requester })
    }

    pub async fn get_text(&self) -> BridgeResult<String> {
        self.requester
            .execute::<GetText>((), CallOptions::new())
            .await
    }

    pub async fn multiply_by_four(&self, n: i64) -> BridgeResult<i64> {
        self.requester
            .execute::<MultiplyByFour>((n,), CallOptions::new())
            .await
    }

    pub async fn induce_error(&self) -> BridgeResult<()> {
        self.requester
            .execute::<InduceError>((), CallOptions::new())
            .await
    }

    pub fn requester(&self) -> &Requester<DemoContract> {
        &self.requester
    }
}
