// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::DroneError;
use crate::key::{DroneKey, FromKeyValue};
use crate::logging::{debug, warn};
use crate::service::{KeyUpdate, KeyValueListenerService, ListenerId};
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::stream::FusedStream;
use futures::{Stream, StreamExt};
use skyfuse_core::{FuseError, StreamItem};
use std::sync::Arc;

/// The values of one key as a source for the fusion combinators.
///
/// The listener is registered with the service on the first poll, not on
/// construction. Values that do not decode as `T`, and failures reported
/// by the service, are yielded as `StreamItem::Error`. Dropping a source
/// that registered calls `cancel_listen` exactly once.
#[must_use = "streams do nothing unless polled"]
pub struct KeySource<T> {
    key: DroneKey,
    service: Arc<dyn KeyValueListenerService>,
    listener: Option<ListenerId>,
    receiver: Option<UnboundedReceiver<KeyUpdate>>,
    started: bool,
    finished: bool,
    _value: PhantomData<fn() -> T>,
}

impl<T> KeySource<T> {
    pub fn new(service: Arc<dyn KeyValueListenerService>, key: DroneKey) -> Self {
        Self {
            key,
            service,
            listener: None,
            receiver: None,
            started: false,
            finished: false,
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> DroneKey {
        self.key
    }

    /// The registration on the service, once the first poll has happened.
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener
    }

    fn start(&mut self) -> Result<(), FuseError> {
        self.started = true;
        let (sender, receiver) = unbounded();
        let id = ListenerId::next();
        let callback = Box::new(move |update: KeyUpdate| {
            // Fails only after the source has been dropped
            let _ = sender.unbounded_send(update);
        });

        match self.service.listen(self.key, id, callback) {
            Ok(()) => {
                debug!("key source: {} registered on {}", id, self.key);
                self.listener = Some(id);
                self.receiver = Some(receiver);
                Ok(())
            }
            Err(source) => {
                warn!("key source: listening to {} failed: {}", self.key, source);
                Err(FuseError::user_error(DroneError::Listen {
                    key: self.key,
                    source,
                }))
            }
        }
    }
}

impl<T: FromKeyValue> Stream for KeySource<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        if !this.started {
            if let Err(error) = this.start() {
                this.finished = true;
                return Poll::Ready(Some(StreamItem::Error(error)));
            }
        }

        let Some(receiver) = this.receiver.as_mut() else {
            this.finished = true;
            return Poll::Ready(None);
        };

        match receiver.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(value))) => {
                let item = match T::from_key_value(value) {
                    Some(decoded) => StreamItem::Value(decoded),
                    None => StreamItem::Error(FuseError::user_error(DroneError::Decode {
                        key: this.key,
                        expected: T::EXPECTED,
                    })),
                };
                Poll::Ready(Some(item))
            }
            Poll::Ready(Some(Err(source))) => Poll::Ready(Some(StreamItem::Error(
                FuseError::user_error(DroneError::Listen {
                    key: this.key,
                    source,
                }),
            ))),
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: FromKeyValue> FusedStream for KeySource<T> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

impl<T> Drop for KeySource<T> {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            debug!("key source: releasing {} on {}", id, self.key);
            self.service.cancel_listen(self.key, id);
        }
    }
}
