// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::logging::{debug, warn};
use async_trait::async_trait;
use core::future::Future;
use futures::stream::{Stream, StreamExt};
use skyfuse_core::{CancellationToken, FuseError, Result, StreamItem};
use std::error::Error;

/// Sequential processing of every value of a `StreamItem` stream.
#[async_trait]
pub trait SubscribeExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Runs `on_next` for each value, waiting for it before pulling the next one.
    ///
    /// # Behavior
    ///
    /// - A handler error is passed to `on_error` as [`FuseError::UserError`]
    ///   and processing continues
    /// - An upstream `StreamItem::Error` is passed to `on_error` and
    ///   processing stops
    /// - Returns when the stream ends or `cancellation_token` is cancelled,
    ///   including while waiting for the next value
    ///
    /// # Example
    ///
    /// ```
    /// use skyfuse_exec::SubscribeExt;
    /// use skyfuse_core::StreamItem;
    /// use futures::stream;
    /// use std::sync::{Arc, Mutex};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = seen.clone();
    ///
    /// stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)])
    ///     .subscribe(
    ///         move |value, _token| {
    ///             let sink = sink.clone();
    ///             async move {
    ///                 sink.lock().unwrap().push(value);
    ///                 Ok::<(), std::io::Error>(())
    ///             }
    ///         },
    ///         |error| eprintln!("{error}"),
    ///         None,
    ///     )
    ///     .await
    ///     .unwrap();
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    /// # }
    /// ```
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next: F,
        on_error: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(FuseError) + Send + Sync + 'static,
        E: Error + Send + Sync + 'static;
}

#[async_trait]
impl<S, T> SubscribeExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    async fn subscribe<F, Fut, E, OnError>(
        mut self,
        on_next: F,
        on_error: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(FuseError) + Send + Sync + 'static,
        E: Error + Send + Sync + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();

        loop {
            let item = tokio::select! {
                biased;
                () = cancellation_token.cancelled() => {
                    debug!("subscribe: cancelled");
                    break;
                }
                item = self.next() => item,
            };

            match item {
                Some(StreamItem::Value(value)) => {
                    if let Err(error) = on_next(value, cancellation_token.clone()).await {
                        on_error(FuseError::user_error(error));
                    }
                }
                Some(StreamItem::Error(error)) => {
                    warn!("subscribe: upstream error: {}", error);
                    on_error(error);
                    break;
                }
                None => break,
            }
        }

        Ok(())
    }
}
