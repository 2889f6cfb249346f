//! # Lifecycle Flows
//!
//! Starting and stopping the receive loops on either side.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use bridge_rpc::{BridgeError, CallOptions};
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribed_callee_stops_answering() {
        let bridge = Bridge::new();
        let mut replies = bridge.windows.content.subscribe();

        let echoed = bridge
            .requester
            .execute::<Echo>(("before".to_string(),), CallOptions::new())
            .await
            .unwrap();
        assert_eq!(echoed, "before");
        let _ = replies.try_recv();

        bridge.served.unsubscribe();
        assert!(!bridge.served.is_active());

        let err = bridge
            .requester
            .execute::<Echo>(("after".to_string(),), CallOptions::timeout_ms(500))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(replies.try_recv().unwrap(), None);
    }

    #[tokio::test]
    async fn test_unsubscribe_twice_is_harmless() {
        let bridge = Bridge::new();
        bridge.served.unsubscribe();
        bridge.served.unsubscribe();
        assert!(!bridge.served.is_active());
    }

    #[tokio::test]
    async fn test_other_registrations_keep_working() {
        let bridge = Bridge::new();

        // A second loop on the same registry and windows.
        let second = serve(&bridge.registry, &bridge.windows);
        bridge.served.unsubscribe();

        let echoed = bridge
            .requester
            .execute::<Echo>(("second loop".to_string(),), CallOptions::new())
            .await
            .unwrap();
        assert_eq!(echoed, "second loop");
        assert!(second.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_request_still_answered_after_unsubscribe() {
        let bridge = Bridge::new();

        let call = bridge
            .requester
            .execute::<Sleep>((1_000,), CallOptions::new());
        // Let the callee pick the request up.
        tokio::time::sleep(Duration::from_millis(10)).await;
        bridge.served.unsubscribe();

        assert_eq!(call.await.unwrap(), 1_000);
    }

    #[tokio::test]
    async fn test_detached_requester_cannot_call() {
        let bridge = Bridge::new();
        bridge.requester.detach();
        assert!(!bridge.requester.is_attached());

        let err = bridge
            .requester
            .execute::<Echo>(("x".to_string(),), CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_dropping_last_requester_stops_listener() {
        let bridge = Bridge::new();
        let listeners_before = bridge.windows.content.listener_count();

        let extra = requester::<TestContract>(Default::default(), &bridge.windows);
        let clone = extra.clone();
        assert_eq!(bridge.windows.content.listener_count(), listeners_before + 1);

        drop(extra);
        assert!(clone.is_attached());
        drop(clone);

        // The aborted task releases its listener once it is dropped.
        timeout(Duration::from_secs(1), async {
            while bridge.windows.content.listener_count() > listeners_before {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }
}
