//! # Round-Trip Flows
//!
//! A caller context invokes operations on a callee context over a window
//! pair and gets the callee's answer back.
//!
//! ## Flow Tested
//!
//! 1. Webview emits a request envelope to the parent window
//! 2. Parent runs the handler and posts a response to the content window
//! 3. Webview's dispatcher settles the matching call

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use bridge_channel::WindowPair;
    use bridge_demo::{DemoConfig, ParentPage, WebviewPage};
    use bridge_rpc::{BridgeConfig, CallOptions, IdStrategy};
    use serde_json::json;

    // =============================================================================
    // DEMO CONTRACT
    // =============================================================================

    fn demo() -> (WindowPair, ParentPage, bridge_rpc::Unsubscribe, WebviewPage) {
        let windows = WindowPair::new();
        let parent = ParentPage::new(&DemoConfig {
            text: "hello".to_string(),
            ..Default::default()
        });
        let served = parent.serve(&windows);
        let webview = WebviewPage::attach(BridgeConfig::default(), &windows).unwrap();
        (windows, parent, served, webview)
    }

    #[tokio::test]
    async fn test_get_text_resolves_with_parent_text() {
        let (_windows, parent, _served, webview) = demo();
        assert_eq!(webview.get_text().await.unwrap(), "hello");

        parent.set_text("changed");
        assert_eq!(webview.get_text().await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_multiply_by_four() {
        let (_windows, _parent, _served, webview) = demo();
        assert_eq!(webview.multiply_by_four(2).await.unwrap(), 8);
        assert_eq!(webview.multiply_by_four(-3).await.unwrap(), -12);
    }

    #[tokio::test]
    async fn test_induce_error_message_is_exact() {
        let (_windows, _parent, _served, webview) = demo();
        let err = webview.induce_error().await.unwrap_err();
        assert!(err.is_application());
        assert_eq!(err.to_string(), "Intentionally thrown error");
    }

    #[tokio::test]
    async fn test_wire_shape_seen_by_parent() {
        let (windows, _parent, _served, webview) = demo();
        let mut spy = windows.parent.subscribe();

        webview.multiply_by_four(2).await.unwrap();

        let request = spy.recv().await.unwrap();
        assert_eq!(request["functionName"], "multiplyByFour");
        assert_eq!(request["args"], json!([2]));
        assert!(request["uid"].is_string());
    }

    // =============================================================================
    // TEST CONTRACT
    // =============================================================================

    #[tokio::test]
    async fn test_multiple_arguments() {
        let bridge = Bridge::new();
        let sum = bridge
            .requester
            .execute::<Add>((40, 2), CallOptions::new())
            .await
            .unwrap();
        assert_eq!(sum, 42);
    }

    #[tokio::test]
    async fn test_returned_error_is_verbatim() {
        let bridge = Bridge::new();
        let err = bridge
            .requester
            .execute::<Fail>(("disk full".to_string(),), CallOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }

    #[tokio::test]
    async fn test_raw_call_round_trip() {
        let bridge = Bridge::new();
        let value = bridge
            .requester
            .execute_raw("echo", vec![json!("raw")], CallOptions::new())
            .await
            .unwrap();
        assert_eq!(value, json!("raw"));
    }

    #[tokio::test]
    async fn test_timestamp_identifiers() {
        let bridge = Bridge::with_config(BridgeConfig {
            id_strategy: IdStrategy::Timestamp,
            ..Default::default()
        });
        let mut spy = bridge.windows.parent.subscribe();

        let echoed = bridge
            .requester
            .execute::<Echo>(("ts".to_string(),), CallOptions::new())
            .await
            .unwrap();
        assert_eq!(echoed, "ts");

        let request = spy.recv().await.unwrap();
        let uid = request["uid"].as_str().unwrap();
        assert!(uid.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
