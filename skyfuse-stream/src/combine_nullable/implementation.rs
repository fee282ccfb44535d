// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Listener tasks, the shared slot state and the combined stream.

use crate::logging::{debug, warn};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::future::{select, Either};
use futures::stream::FusedStream;
use futures::{FutureExt, Stream, StreamExt};
use skyfuse_core::fuse_mutex::Mutex;
use skyfuse_core::{CancellationToken, CancelledOwned, FuseError, FuseTask, Scope, StreamItem};
use std::sync::Arc;

type Listener = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct Slots<St> {
    latest: St,
    // `None` once the combination is closed; nothing is published after that
    sender: Option<UnboundedSender<StreamItem<St>>>,
}

/// Latest values plus the outbound queue, guarded as one unit.
struct SharedSlots<St> {
    slots: Mutex<Slots<St>>,
    scope: CancellationToken,
}

impl<St: Clone> SharedSlots<St> {
    /// Update one slot and enqueue the resulting snapshot in a single critical section.
    ///
    /// Returns `false` when the combination is closed and the listener should stop.
    fn publish<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut St),
    {
        let mut guard = self.slots.lock();
        if self.scope.is_cancelled() {
            guard.sender = None;
            return false;
        }

        let Slots { latest, sender } = &mut *guard;
        let Some(sender) = sender.as_ref() else {
            return false;
        };

        update(latest);
        sender
            .unbounded_send(StreamItem::Value(latest.clone()))
            .is_ok()
    }

    /// Enqueue `error` as the final item and close. Only the first failure is delivered.
    fn fail(&self, error: FuseError) -> bool {
        let sender = self.slots.lock().sender.take();
        match sender {
            Some(sender) => {
                let _ = sender.unbounded_send(StreamItem::Error(error));
                true
            }
            None => false,
        }
    }

    /// Close without an error. Returns `true` for the call that actually closed.
    fn close(&self) -> bool {
        self.slots.lock().sender.take().is_some()
    }
}

fn listener<S, T, St, F>(
    index: usize,
    source: S,
    shared: Arc<SharedSlots<St>>,
    scope: CancellationToken,
    stop: CancellationToken,
    assign: F,
) -> Listener
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    St: Clone + Send + 'static,
    F: Fn(&mut St, T) + Send + 'static,
{
    Box::pin(async move {
        let mut source = Box::pin(source);
        let mut stopped = select(scope.cancelled(), stop.cancelled());
        debug!("combine_nullable: listener {} started", index);

        loop {
            match select(source.next(), &mut stopped).await {
                Either::Left((Some(StreamItem::Value(value)), _)) => {
                    if !shared.publish(|latest| assign(latest, value)) {
                        break;
                    }
                }
                Either::Left((Some(StreamItem::Error(error)), _)) => {
                    warn!("combine_nullable: source {} failed: {}", index, error);
                    // The consumer still drains the queued error; only the siblings stop here
                    if shared.fail(error) {
                        stop.cancel();
                    }
                    break;
                }
                Either::Left((None, _)) => {
                    // A finished source keeps its last value; the others carry on
                    debug!("combine_nullable: source {} completed", index);
                    break;
                }
                Either::Right(_) => break,
            }
        }

        debug!("combine_nullable: listener {} released its source", index);
    })
}

/// The combined sequence returned by every `combine_nullable*` function.
///
/// Nothing runs until the first poll: listener tasks are spawned in the
/// [`Scope`] at that point. Each poll yields one snapshot per inbound source
/// value. The sequence ends when the scope is cancelled, when
/// [`cancel()`](Self::cancel) is called, or right after the first source
/// failure has been yielded. Dropping it cancels as well.
#[must_use = "streams do nothing unless polled"]
pub struct CombineNullable<St> {
    shared: Arc<SharedSlots<St>>,
    receiver: UnboundedReceiver<StreamItem<St>>,
    pending: Vec<Listener>,
    tasks: Vec<FuseTask>,
    scope: Scope,
    scope_cancelled: CancelledOwned,
    // Set by the consumer side: `cancel()`, a `CancelHandle` or drop
    cancel: CancellationToken,
    // Ends the listeners; also set by the first failing source
    stop: CancellationToken,
    finished: bool,
}

impl<St> CombineNullable<St>
where
    St: Clone + Send + 'static,
{
    pub(crate) fn new(scope: &Scope, initial: St) -> Self {
        let (sender, receiver) = unbounded();
        let shared = Arc::new(SharedSlots {
            slots: Mutex::new(Slots {
                latest: initial,
                sender: Some(sender),
            }),
            scope: scope.token().clone(),
        });

        Self {
            shared,
            receiver,
            pending: Vec::new(),
            tasks: Vec::new(),
            scope: scope.clone(),
            scope_cancelled: scope.cancelled_owned(),
            cancel: CancellationToken::new(),
            stop: CancellationToken::new(),
            finished: false,
        }
    }

    /// Register the next source. `assign` writes its values into the snapshot.
    pub(crate) fn with_source<S, T, F>(mut self, source: S, assign: F) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + 'static,
        T: Send + 'static,
        F: Fn(&mut St, T) + Send + 'static,
    {
        let index = self.pending.len();
        self.pending.push(listener(
            index,
            source,
            Arc::clone(&self.shared),
            self.scope.token().clone(),
            self.stop.clone(),
            assign,
        ));
        self
    }

    /// A cloneable handle that can cancel this sequence from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        let shared = Arc::clone(&self.shared);
        CancelHandle {
            close: Arc::new(move || shared.close()),
            cancel: self.cancel.clone(),
            stop: self.stop.clone(),
        }
    }

    /// Stop producing snapshots and release every source. Idempotent.
    pub fn cancel(&self) {
        self.shared.close();
        self.cancel.cancel();
        self.stop.cancel();
    }

    /// `true` once cancelled, failed or ended.
    pub fn is_cancelled(&self) -> bool {
        self.finished || self.cancel.is_cancelled() || self.scope.is_cancelled()
    }

    fn start(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        debug!(
            "combine_nullable: starting {} listeners",
            self.pending.len()
        );
        let Self {
            pending,
            tasks,
            scope,
            stop,
            ..
        } = self;
        for listener in pending.drain(..) {
            tasks.push(scope.spawn(stop.clone(), listener));
        }
    }

    fn shutdown(&mut self) {
        self.finished = true;
        self.shared.close();
        self.cancel.cancel();
        self.stop.cancel();
        // Listeners that never started still own their sources
        self.pending.clear();
        self.tasks.clear();
    }
}

impl<St> Stream for CombineNullable<St>
where
    St: Clone + Send + 'static,
{
    type Item = StreamItem<St>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        if this.cancel.is_cancelled() || this.scope_cancelled.poll_unpin(cx).is_ready() {
            debug!("combine_nullable: cancelled");
            this.shutdown();
            return Poll::Ready(None);
        }

        this.start();

        match this.receiver.poll_next_unpin(cx) {
            Poll::Ready(Some(StreamItem::Error(error))) => {
                this.shutdown();
                Poll::Ready(Some(StreamItem::Error(error)))
            }
            Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
            Poll::Ready(None) => {
                this.shutdown();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<St> FusedStream for CombineNullable<St>
where
    St: Clone + Send + 'static,
{
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

/// Cancels a [`CombineNullable`] from anywhere. Cheap to clone.
///
/// Cancelling more than once, or from several tasks at the same time, is safe.
#[derive(Clone)]
pub struct CancelHandle {
    close: Arc<dyn Fn() -> bool + Send + Sync>,
    cancel: CancellationToken,
    stop: CancellationToken,
}

impl CancelHandle {
    /// Returns `true` for the call that actually performed the cancellation.
    pub fn cancel(&self) -> bool {
        let closed = (self.close)();
        self.cancel.cancel();
        self.stop.cancel();
        closed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl core::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
