// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Streams that report when they are first polled and when they are dropped.
//!
//! Used to check that an operator subscribes lazily and releases every
//! subscription exactly once.

use futures::Stream;
use pin_project::{pin_project, pinned_drop};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Shared counters for a group of [`TrackedStream`]s.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionTracker {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    subscribed: AtomicUsize,
    released: AtomicUsize,
}

impl SubscriptionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `inner` so that its first poll and its drop are counted here.
    pub fn track<S: Stream>(&self, inner: S) -> TrackedStream<S> {
        TrackedStream {
            inner,
            counters: Arc::clone(&self.counters),
            polled: false,
        }
    }

    /// Streams polled at least once.
    pub fn subscribed(&self) -> usize {
        self.counters.subscribed.load(Ordering::SeqCst)
    }

    /// Streams dropped, whether or not they were ever polled.
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Wait up to `timeout_ms` until `released() == expected`.
    pub async fn wait_released(&self, expected: usize, timeout_ms: u64) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        while self.released() != expected {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }
}

#[pin_project(PinnedDrop)]
pub struct TrackedStream<S> {
    #[pin]
    inner: S,
    counters: Arc<Counters>,
    polled: bool,
}

impl<S: Stream> Stream for TrackedStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if !*this.polled {
            *this.polled = true;
            this.counters.subscribed.fetch_add(1, Ordering::SeqCst);
        }
        this.inner.poll_next(cx)
    }
}

#[pinned_drop]
impl<S> PinnedDrop for TrackedStream<S> {
    fn drop(self: Pin<&mut Self>) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
