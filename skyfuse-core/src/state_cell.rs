// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Current-value broadcast cell.
//!
//! A [`StateCell`] holds the latest value of one concern (registration,
//! connection, telemetry) for the whole process.
//!
//! ## Characteristics
//!
//! - **Absent until set**: a fresh cell holds no value.
//! - **Last write wins**: subscribers that fall behind only see the newest value.
//! - **Replaying**: a new subscriber first receives the current value, if any.
//! - **Thread-safe**: cheap to clone; all clones share the same value.
//!
//! ## Example
//!
//! ```
//! use skyfuse_core::StateCell;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let connection = StateCell::<bool>::new();
//! assert_eq!(connection.get(), None);
//!
//! connection.set(true);
//! let mut updates = connection.subscribe();
//! assert_eq!(updates.next().await, Some(true));
//! # }
//! ```

use futures::{Stream, StreamExt};
use std::future::ready;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type StateStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// A cloneable, process-wide "current state" cell.
///
/// See the [module documentation](self) for semantics.
#[derive(Debug)]
pub struct StateCell<T> {
    sender: Arc<watch::Sender<Option<T>>>,
}

impl<T: Clone + Send + Sync + 'static> StateCell<T> {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current value, `None` while absent.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.sender.borrow().clone()
    }

    /// Replace the current value and notify subscribers.
    pub fn set(&self, value: T) {
        self.sender.send_replace(Some(value));
    }

    /// Return to the absent state.
    ///
    /// Subscribers are not sent anything for the absent state.
    pub fn clear(&self) {
        self.sender.send_replace(None);
    }

    /// Stream of values: the current one (if any), then the latest after each change.
    ///
    /// Dropping the stream unsubscribes.
    pub fn subscribe(&self) -> StateStream<T> {
        Box::pin(WatchStream::new(self.sender.subscribe()).filter_map(ready))
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}
