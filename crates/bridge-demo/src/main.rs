//! # Bridge Demo Binary
//!
//! Runs the parent page and its webview in one process and walks through the
//! demo calls, logging each outcome.
//!
//! ```text
//! BRIDGE_DEMO_LATENCY=high BRIDGE_DEMO_TEXT="hi" cargo run -p bridge-demo
//! ```

use anyhow::{Context, Result};
use bridge_channel::WindowPair;
use bridge_demo::{DemoConfig, ParentPage, WebviewPage};
use bridge_rpc::BridgeConfig;
use bridge_telemetry::{init_tracing, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let telemetry = TelemetryConfig::from_env().for_service("bridge-demo");
    init_tracing(&telemetry).context("Failed to initialize tracing")?;

    // Load configuration
    let bridge_config = BridgeConfig::from_env().context("Invalid bridge configuration")?;
    let demo_config = DemoConfig::from_env().context("Invalid demo configuration")?;
    info!(
        latency = ?demo_config.latency,
        default_timeout_ms = bridge_config.default_timeout_ms,
        id_strategy = ?bridge_config.id_strategy,
        "Starting bridge demo"
    );

    // Wire both contexts
    let windows = WindowPair::new();
    let parent = ParentPage::new(&demo_config);
    let _served = parent.serve(&windows);
    let webview = WebviewPage::attach(bridge_config, &windows)
        .context("Failed to attach webview")?;

    // Issue the demo calls concurrently
    let (text, product, induced) = tokio::join!(
        webview.get_text(),
        webview.multiply_by_four(2),
        webview.induce_error(),
    );

    match text {
        Ok(text) => info!(%text, "getText resolved"),
        Err(error) => warn!(%error, "getText failed"),
    }
    match product {
        Ok(product) => info!(product, "multiplyByFour(2) resolved"),
        Err(error) => warn!(%error, "multiplyByFour failed"),
    }
    match induced {
        Ok(()) => warn!("induceError unexpectedly resolved"),
        Err(error) => info!(%error, "induceError rejected"),
    }

    let stats = webview.requester().engine().stats();
    info!(
        registered = stats.registered,
        completed = stats.completed,
        timeouts = stats.timeouts,
        "Demo finished"
    );

    Ok(())
}
