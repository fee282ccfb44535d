// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collect-latest subscription.
//!
//! At most one handler runs at a time. When a newer value arrives before the
//! running handler has finished, that handler's token is cancelled, its
//! future is dropped and a handler for the newer value starts. Values that
//! arrive while nothing is running start a handler immediately, so no value
//! is queued behind another.

use crate::logging::{debug, warn};
use async_trait::async_trait;
use core::future::Future;
use core::pin::Pin;
use futures::stream::{Stream, StreamExt};
use skyfuse_core::{CancellationToken, FuseError, Result, StreamItem};
use std::error::Error;

struct InFlight<Fut> {
    cancel: CancellationToken,
    future: Pin<Box<Fut>>,
}

impl<Fut> InFlight<Fut> {
    fn abandon(self) {
        self.cancel.cancel();
    }
}

async fn run_in_flight<Fut: Future>(slot: &mut Option<InFlight<Fut>>) -> Fut::Output {
    match slot {
        Some(in_flight) => in_flight.future.as_mut().await,
        None => core::future::pending().await,
    }
}

/// Processing of the newest value only, abandoning outdated work.
#[async_trait]
pub trait SubscribeLatestExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Runs `on_next` for the newest value, cancelling the previous handler.
    ///
    /// Each handler receives its own token, cancelled when the handler is
    /// superseded or when `cancellation_token` is cancelled. Handler errors
    /// go to `on_error` and processing continues. An upstream
    /// `StreamItem::Error` abandons the running handler, goes to `on_error`
    /// and stops processing.
    ///
    /// When the stream ends the running handler, if any, is awaited before
    /// returning.
    async fn subscribe_latest<F, Fut, E, OnError>(
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
impl<S, T> SubscribeLatestExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + Unpin + 'static,
    T: Send + 'static,
{
    async fn subscribe_latest<F, Fut, E, OnError>(
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
        let mut in_flight: Option<InFlight<Fut>> = None;

        loop {
            tokio::select! {
                biased;
                () = cancellation_token.cancelled() => {
                    debug!("subscribe_latest: cancelled");
                    if let Some(running) = in_flight.take() {
                        running.abandon();
                    }
                    break;
                }
                result = run_in_flight(&mut in_flight) => {
                    in_flight = None;
                    if let Err(error) = result {
                        on_error(FuseError::user_error(error));
                    }
                }
                item = self.next() => match item {
                    Some(StreamItem::Value(value)) => {
                        if let Some(running) = in_flight.take() {
                            debug!("subscribe_latest: superseding running handler");
                            running.abandon();
                        }
                        let cancel = CancellationToken::new();
                        in_flight = Some(InFlight {
                            future: Box::pin(on_next(value, cancel.clone())),
                            cancel,
                        });
                    }
                    Some(StreamItem::Error(error)) => {
                        warn!("subscribe_latest: upstream error: {}", error);
                        if let Some(running) = in_flight.take() {
                            running.abandon();
                        }
                        on_error(error);
                        break;
                    }
                    None => {
                        if let Some(running) = in_flight.take() {
                            let InFlight { cancel, future } = running;
                            let outcome = tokio::select! {
                                biased;
                                () = cancellation_token.cancelled() => None,
                                result = future => Some(result),
                            };
                            match outcome {
                                Some(Err(error)) => on_error(FuseError::user_error(error)),
                                Some(Ok(())) => {}
                                None => {
                                    cancel.cancel();
                                }
                            }
                        }
                        break;
                    }
                },
            }
        }

        Ok(())
    }
}
