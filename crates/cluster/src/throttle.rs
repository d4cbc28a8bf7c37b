// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token-bucket throttle for remote command dispatch.
//!
//! Smoothing limiter, not a strict leaky bucket: `burst` tokens are
//! pre-loaded, so bursts up to `burst` are always possible at start, and a
//! refill tick that lands while the bucket is full is dropped rather than
//! queued.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Bounds how fast new executions may be dispatched.
///
/// The token count is the only shared mutable state: a single bounded
/// counter guarded by a mutex, with a [`Notify`] waking suspended
/// acquirers on refill. The count never leaves `[0, burst]` under
/// concurrent acquire and refill.
pub struct TokenBucket {
    inner: Arc<Inner>,
    cancel: CancellationToken,
}

struct Inner {
    burst: usize,
    tokens: Mutex<usize>,
    refilled: Notify,
}

impl TokenBucket {
    /// Pre-load `burst` tokens and spawn the refill task, which adds one
    /// token every `1/rate` seconds until [`stop`](Self::stop) or drop.
    ///
    /// A rate of zero is clamped to one token per second. Must be called
    /// from within a tokio runtime.
    pub fn start(rate: u32, burst: usize) -> Self {
        let inner = Arc::new(Inner {
            burst,
            tokens: Mutex::new(burst),
            refilled: Notify::new(),
        });
        let cancel = CancellationToken::new();
        let tick = Duration::from_secs_f64(1.0 / f64::from(rate.max(1)));

        let refill = Arc::clone(&inner);
        let stopped = cancel.clone();
        tokio::spawn(async move {
            // First tick lands one full interval out, matching a ticker
            // that does not fire at creation.
            let mut ticks =
                tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = stopped.cancelled() => break,
                    _ = ticks.tick() => {
                        let mut tokens = refill.tokens.lock();
                        if *tokens < refill.burst {
                            *tokens += 1;
                            drop(tokens);
                            refill.refilled.notify_one();
                        }
                    }
                }
            }
        });

        Self { inner, cancel }
    }

    /// Consume exactly one token, suspending until one is available.
    ///
    /// Cannot fail. After [`stop`](Self::stop) this still drains any
    /// remaining tokens, then suspends indefinitely.
    pub async fn acquire(&self) {
        loop {
            {
                let mut tokens = self.inner.tokens.lock();
                if *tokens > 0 {
                    *tokens -= 1;
                    return;
                }
            }
            self.inner.refilled.notified().await;
        }
    }

    /// Tokens currently available.
    pub fn available(&self) -> usize {
        *self.inner.tokens.lock()
    }

    /// Halt the refill task.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TokenBucket {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
