//! # Postbridge Benchmarks
//!
//! | Area | What is measured |
//! |------|------------------|
//! | Envelopes | Request encode, response classify |
//! | Identifiers | UUID v4 and timestamp generation |
//! | Engine | Register, emit and settle one call |
//! | Round trip | Full call over a window pair |

use bridge_channel::WindowPair;
use bridge_rpc::{
    contract, BridgeConfig, CallId, CallOptions, CorrelationEngine, HandlerRegistry, IdGenerator,
    RequestEnvelope, Requester, ResponseEnvelope, TimestampIdGenerator, TransportError,
    UuidV4Generator,
};
use bridge_types::Envelope;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::future::join_all;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;

contract! {
    contract BenchContract {
        Echo = "echo": (Value,) => Value;
    }
}

// ============================================================================
// Envelopes
// ============================================================================

fn bench_envelopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelopes");

    let request = RequestEnvelope::new(
        CallId::new("c0ffee00-0000-4000-8000-000000000000"),
        "multiplyByFour",
        vec![json!(2)],
    );
    group.bench_function("encode_request", |b| {
        b.iter(|| black_box(serde_json::to_value(&request).unwrap()))
    });

    let response = serde_json::to_value(ResponseEnvelope::success(
        CallId::new("c0ffee00-0000-4000-8000-000000000000"),
        "multiplyByFour",
        json!(8),
    ))
    .unwrap();
    group.bench_function("classify_response", |b| {
        b.iter(|| black_box(Envelope::from_value(response.clone()).unwrap()))
    });

    group.finish();
}

// ============================================================================
// Identifiers
// ============================================================================

fn bench_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifiers");
    group.bench_function("uuid_v4", |b| b.iter(|| black_box(UuidV4Generator.generate())));
    group.bench_function("timestamp", |b| {
        b.iter(|| black_box(TimestampIdGenerator.generate()))
    });
    group.finish();
}

// ============================================================================
// Engine
// ============================================================================

fn bench_engine_settle(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("engine");

    // Transport answers synchronously, so only engine overhead is measured.
    let engine = Arc::new(CorrelationEngine::<BenchContract>::default());
    let weak = Arc::downgrade(&engine);
    engine.set_transport(move |message: Value| -> Result<(), TransportError> {
        let request: RequestEnvelope =
            serde_json::from_value(message).map_err(|e| TransportError::Rejected(e.to_string()))?;
        if let Some(engine) = weak.upgrade() {
            engine.deliver(ResponseEnvelope::success(request.uid, "echo", Value::Null));
        }
        Ok(())
    });

    group.bench_function("call_and_settle", |b| {
        b.to_async(&runtime).iter(|| {
            engine.call::<Echo>((Value::Null,), CallOptions::new())
        })
    });
    group.bench_function("call_and_settle_no_timer", |b| {
        b.to_async(&runtime).iter(|| {
            engine.call::<Echo>((Value::Null,), CallOptions::no_timeout())
        })
    });

    group.finish();
}

// ============================================================================
// Round trip
// ============================================================================

fn bench_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("round_trip");

    let (requester, _served) = runtime.block_on(async {
        let windows = WindowPair::new();
        let registry = Arc::new(HandlerRegistry::<BenchContract>::new());
        registry.register(Echo, |(value,)| async move { Ok::<_, Infallible>(value) });
        let served = registry.serve(
            windows.parent.subscribe().into_stream(),
            Arc::new(windows.content.clone()),
        );
        let requester = Requester::<BenchContract>::new(
            BridgeConfig::default(),
            windows.content.subscribe().into_stream(),
            windows.parent.clone(),
        )
        .unwrap();
        (requester, served)
    });

    for concurrency in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(concurrency as u64));
        group.bench_with_input(
            BenchmarkId::new("concurrent_calls", concurrency),
            &concurrency,
            |b, &n| {
                b.to_async(&runtime).iter(|| {
                    let calls = (0..n).map(|i| {
                        requester.execute::<Echo>((json!(i),), CallOptions::new())
                    });
                    join_all(calls)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_envelopes,
    bench_identifiers,
    bench_engine_settle,
    bench_round_trip
);
criterion_main!(benches);
