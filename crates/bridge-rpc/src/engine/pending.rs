//! Pending Call Table - outstanding calls keyed by identifier.
//!
//! Every entry is settled exactly once. Whoever removes the entry under the
//! lock (a response, the timer, or a failed send) owns its settlement; anyone
//! arriving later finds nothing and does nothing.

use crate::domain::BridgeError;
use bridge_types::CallId;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Settlement delivered to a waiting call.
pub(crate) type Settlement = Result<Value, BridgeError>;

/// A call waiting for its response.
struct PendingCall {
    /// Channel to settle the caller's future
    sender: oneshot::Sender<Settlement>,
    /// Operation name (for logging and errors)
    operation: String,
    /// When the call was registered
    created_at: Instant,
    /// Timeout task, if one is armed
    timer: Option<AbortHandle>,
}

/// Counters for the pending call table.
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Calls registered
    pub registered: AtomicU64,
    /// Calls settled by a response
    pub completed: AtomicU64,
    /// Calls settled by their timer
    pub timeouts: AtomicU64,
    /// Calls whose request could not be emitted
    pub send_failures: AtomicU64,
    /// Responses with no pending call
    pub unmatched: AtomicU64,
}

impl PendingStats {
    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            registered: self.registered.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`PendingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub registered: u64,
    pub completed: u64,
    pub timeouts: u64,
    pub send_failures: u64,
    pub unmatched: u64,
}

/// Table of outstanding calls.
///
/// The lock is only held for map operations. Channel sends and timer aborts
/// happen after the entry has been taken out.
#[derive(Default)]
pub struct PendingCallTable {
    calls: Mutex<HashMap<CallId, PendingCall>>,
    stats: PendingStats,
}

impl PendingCallTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call under `call_id`.
    ///
    /// Returns `None` if the identifier is already pending.
    pub(crate) fn try_register(
        &self,
        call_id: &CallId,
        operation: &str,
    ) -> Option<oneshot::Receiver<Settlement>> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut calls = self.calls.lock();
            if calls.contains_key(call_id) {
                return None;
            }
            calls.insert(
                call_id.clone(),
                PendingCall {
                    sender,
                    operation: operation.to_string(),
                    created_at: Instant::now(),
                    timer: None,
                },
            );
        }
        self.stats.registered.fetch_add(1, Ordering::Relaxed);

        debug!(call_id = %call_id, operation, "Registered pending call");
        Some(receiver)
    }

    /// Attach the timeout task to a pending call.
    ///
    /// Returns `false` if the call already settled; the caller must then
    /// abort the timer itself.
    pub(crate) fn attach_timer(&self, call_id: &CallId, timer: AbortHandle) -> bool {
        match self.calls.lock().get_mut(call_id) {
            Some(call) => {
                call.timer = Some(timer);
                true
            }
            None => false,
        }
    }

    /// Settle a call with the outcome carried by its response.
    ///
    /// Returns `false` if no call was pending under `call_id`.
    pub fn complete(&self, call_id: &CallId, outcome: Result<Value, String>) -> bool {
        let Some(call) = self.take(call_id) else {
            self.stats.unmatched.fetch_add(1, Ordering::Relaxed);
            debug!(call_id = %call_id, "Response for unknown or settled call");
            return false;
        };

        let elapsed = call.created_at.elapsed();
        let settlement = outcome.map_err(BridgeError::Application);
        self.stats.completed.fetch_add(1, Ordering::Relaxed);

        if call.sender.send(settlement).is_err() {
            debug!(
                call_id = %call_id,
                operation = %call.operation,
                "Caller dropped before response arrived"
            );
        } else {
            debug!(
                call_id = %call_id,
                operation = %call.operation,
                response_time_ms = elapsed.as_millis() as u64,
                "Completed pending call"
            );
        }
        true
    }

    /// Settle a call as timed out. No-op if it already settled.
    pub(crate) fn expire(&self, call_id: &CallId, timeout: Duration) {
        let Some(call) = self.take(call_id) else {
            return;
        };
        self.stats.timeouts.fetch_add(1, Ordering::Relaxed);

        warn!(
            call_id = %call_id,
            operation = %call.operation,
            timeout_ms = timeout.as_millis() as u64,
            "Call timed out"
        );

        let _ = call.sender.send(Err(BridgeError::Timeout {
            operation: call.operation,
            call_id: call_id.clone(),
        }));
    }

    /// Drop a call whose request never left. The caller reports the error
    /// directly, so nothing is sent on the channel.
    pub(crate) fn fail_send(&self, call_id: &CallId) -> bool {
        let removed = self.take(call_id).is_some();
        if removed {
            self.stats.send_failures.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Number of calls awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Whether `call_id` is awaiting a response.
    pub fn is_pending(&self, call_id: &CallId) -> bool {
        self.calls.lock().contains_key(call_id)
    }

    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }

    fn take(&self, call_id: &CallId) -> Option<PendingCall> {
        let mut call = self.calls.lock().remove(call_id)?;
        if let Some(timer) = call.timer.take() {
            timer.abort();
        }
        Some(call)
    }
}

impl Drop for PendingCallTable {
    fn drop(&mut self) {
        for (_, call) in self.calls.get_mut().drain() {
            if let Some(timer) = call.timer {
                timer.abort();
            }
        }
    }
}
