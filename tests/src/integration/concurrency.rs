//! # Concurrent Call Flows
//!
//! Many calls in flight at once, answered out of order, each settling with
//! its own response.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use bridge_channel::WindowPair;
    use bridge_rpc::{BridgeConfig, CallOptions, Requester};
    use futures::future::join_all;
    use proptest::prelude::*;
    use rand::Rng;

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_responses_correlate() {
        let bridge = Bridge::new();

        // Longer sleeps are issued first, so answers arrive in reverse.
        let delays: Vec<u64> = (1..=20).rev().map(|n| n * 10).collect();
        let calls = delays.iter().map(|ms| {
            bridge
                .requester
                .execute::<Sleep>((*ms,), CallOptions::new())
        });

        let results = join_all(calls).await;
        for (delay, result) in delays.iter().zip(results) {
            assert_eq!(result.unwrap(), *delay);
        }
        assert_eq!(bridge.requester.engine().pending_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_calls_from_many_tasks() {
        let bridge = Bridge::new();

        let tasks: Vec<_> = (0..64i64)
            .map(|n| {
                let requester = bridge.requester.clone();
                tokio::spawn(async move {
                    let jitter = rand::thread_rng().gen_range(0..5u64);
                    let slept = requester
                        .execute::<Sleep>((jitter,), CallOptions::new())
                        .await
                        .unwrap();
                    let sum = requester
                        .execute::<Add>((n, n), CallOptions::new())
                        .await
                        .unwrap();
                    (n, slept, jitter, sum)
                })
            })
            .collect();

        for task in tasks {
            let (n, slept, jitter, sum) = task.await.unwrap();
            assert_eq!(slept, jitter);
            assert_eq!(sum, 2 * n);
        }

        let stats = bridge.requester.engine().stats();
        assert_eq!(stats.registered, 128);
        assert_eq!(stats.completed, 128);
        assert_eq!(stats.timeouts, 0);
    }

    #[tokio::test]
    async fn test_two_callers_sharing_a_window() {
        // Both callers listen on the same content window, so each sees the
        // other's responses and must ignore them.
        let windows = WindowPair::new();
        let registry = test_registry();
        let _served = serve(&registry, &windows);
        let first: Requester<TestContract> = requester(BridgeConfig::default(), &windows);
        let second: Requester<TestContract> = requester(BridgeConfig::default(), &windows);

        let (a, b) = tokio::join!(
            first.execute::<Echo>(("first".to_string(),), CallOptions::new()),
            second.execute::<Echo>(("second".to_string(),), CallOptions::new()),
        );
        assert_eq!(a.unwrap(), "first");
        assert_eq!(b.unwrap(), "second");

        // Give each dispatcher time to see the other's response.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(first.engine().stats().unmatched, 1);
        assert_eq!(second.engine().stats().unmatched, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_each_call_gets_its_own_answer(
            pairs in prop::collection::vec((-1000i64..1000, -1000i64..1000), 1..24)
        ) {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();

            let sums = runtime.block_on(async {
                let bridge = Bridge::new();
                let calls = pairs
                    .iter()
                    .map(|(a, b)| bridge.requester.execute::<Add>((*a, *b), CallOptions::new()));
                join_all(calls).await
            });

            for ((a, b), sum) in pairs.iter().zip(sums) {
                prop_assert_eq!(sum.unwrap(), a + b);
            }
        }
    }
}
