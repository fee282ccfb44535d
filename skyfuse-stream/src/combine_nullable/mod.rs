// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combine-latest over sources that may not have produced anything yet.
//!
//! Every value from any source produces exactly one snapshot. A snapshot holds
//! the most recent value of every source, with `None` in the slots whose
//! source has not emitted so far.
//!
//! # Behavior
//!
//! - Cold: no task is spawned and no source is polled before the first `poll_next`
//! - One listener task per source, all spawned in the given [`Scope`]
//! - Slot update, snapshot and enqueue happen under one lock, so a snapshot
//!   always reflects every update enqueued before it
//! - Updates from the same source are emitted in that source's order. The
//!   interleaving of different sources follows lock acquisition
//! - A completed source keeps its last value, the sequence stays open
//! - The first `StreamItem::Error` from any source is yielded, then the
//!   sequence ends and every listener is released
//! - Cancelling the scope, calling `cancel()` or dropping the sequence ends it
//!
//! # Example
//!
//! ```rust
//! use skyfuse_core::Scope;
//! use skyfuse_stream::combine_nullable2;
//! use skyfuse_test_utils::{helpers::unwrap_stream, test_channel, unwrap_value};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let scope = Scope::new();
//! let (tx_altitude, altitude) = test_channel::<f64>();
//! let (tx_mode, mode) = test_channel::<&'static str>();
//!
//! let mut fused = combine_nullable2(&scope, altitude, mode);
//!
//! tx_altitude.send(12.5).unwrap();
//! let first = unwrap_value(Some(unwrap_stream(&mut fused, 500).await));
//! assert_eq!(first, (Some(12.5), None));
//!
//! tx_mode.send("hover").unwrap();
//! let second = unwrap_value(Some(unwrap_stream(&mut fused, 500).await));
//! assert_eq!(second, (Some(12.5), Some("hover")));
//! # }
//! ```

mod implementation;

pub use implementation::{CancelHandle, CombineNullable};

use crate::snapshot::Snapshot;
use futures::Stream;
use skyfuse_core::{Scope, StreamItem};

type Triple<A, B, C> = (Option<A>, Option<B>, Option<C>);
type Quad<A, B, C, D> = (Option<A>, Option<B>, Option<C>, Option<D>);

/// Fuse two sources into `(Option<A>, Option<B>)` snapshots.
pub fn combine_nullable2<S1, S2, A, B>(
    scope: &Scope,
    first: S1,
    second: S2,
) -> CombineNullable<(Option<A>, Option<B>)>
where
    S1: Stream<Item = StreamItem<A>> + Send + 'static,
    S2: Stream<Item = StreamItem<B>> + Send + 'static,
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
{
    CombineNullable::new(scope, (None, None))
        .with_source(first, |state: &mut (Option<A>, Option<B>), value| {
            state.0 = Some(value)
        })
        .with_source(second, |state: &mut (Option<A>, Option<B>), value| {
            state.1 = Some(value)
        })
}

/// Fuse three sources into `(Option<A>, Option<B>, Option<C>)` snapshots.
pub fn combine_nullable3<S1, S2, S3, A, B, C>(
    scope: &Scope,
    first: S1,
    second: S2,
    third: S3,
) -> CombineNullable<Triple<A, B, C>>
where
    S1: Stream<Item = StreamItem<A>> + Send + 'static,
    S2: Stream<Item = StreamItem<B>> + Send + 'static,
    S3: Stream<Item = StreamItem<C>> + Send + 'static,
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
{
    CombineNullable::new(scope, (None, None, None))
        .with_source(first, |state: &mut Triple<A, B, C>, value| {
            state.0 = Some(value)
        })
        .with_source(second, |state: &mut Triple<A, B, C>, value| {
            state.1 = Some(value)
        })
        .with_source(third, |state: &mut Triple<A, B, C>, value| {
            state.2 = Some(value)
        })
}

/// Fuse four sources into `(Option<A>, Option<B>, Option<C>, Option<D>)` snapshots.
pub fn combine_nullable4<S1, S2, S3, S4, A, B, C, D>(
    scope: &Scope,
    first: S1,
    second: S2,
    third: S3,
    fourth: S4,
) -> CombineNullable<Quad<A, B, C, D>>
where
    S1: Stream<Item = StreamItem<A>> + Send + 'static,
    S2: Stream<Item = StreamItem<B>> + Send + 'static,
    S3: Stream<Item = StreamItem<C>> + Send + 'static,
    S4: Stream<Item = StreamItem<D>> + Send + 'static,
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    C: Clone + Send + 'static,
    D: Clone + Send + 'static,
{
    CombineNullable::new(scope, (None, None, None, None))
        .with_source(first, |state: &mut Quad<A, B, C, D>, value| {
            state.0 = Some(value)
        })
        .with_source(second, |state: &mut Quad<A, B, C, D>, value| {
            state.1 = Some(value)
        })
        .with_source(third, |state: &mut Quad<A, B, C, D>, value| {
            state.2 = Some(value)
        })
        .with_source(fourth, |state: &mut Quad<A, B, C, D>, value| {
            state.3 = Some(value)
        })
}

/// Fuse any number of same-typed sources into a [`Snapshot`].
///
/// Slot `i` belongs to `sources[i]`. With no sources the sequence never
/// emits and only ends when cancelled.
pub fn combine_nullable_all<S, T>(scope: &Scope, sources: Vec<S>) -> CombineNullable<Snapshot<T>>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + 'static,
{
    let initial = Snapshot::absent(sources.len());
    sources
        .into_iter()
        .enumerate()
        .fold(CombineNullable::new(scope, initial), |combined, (index, source)| {
            combined.with_source(source, move |snapshot: &mut Snapshot<T>, value| {
                snapshot.set(index, value)
            })
        })
}

/// Method-style access to the combinator.
pub trait CombineNullableExt<T>: Stream<Item = StreamItem<T>> + Sized + Send + 'static
where
    T: Clone + Send + 'static,
{
    /// Pair this source with one other, see [`combine_nullable2`].
    fn combine_nullable<S2, B>(self, scope: &Scope, other: S2) -> CombineNullable<(Option<T>, Option<B>)>
    where
        S2: Stream<Item = StreamItem<B>> + Send + 'static,
        B: Clone + Send + 'static,
    {
        combine_nullable2(scope, self, other)
    }

    /// This source takes slot 0, `others` follow in order.
    fn combine_nullable_with<S2>(self, others: Vec<S2>, scope: &Scope) -> CombineNullable<Snapshot<T>>
    where
        S2: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        let initial = Snapshot::absent(others.len() + 1);
        let combined = CombineNullable::new(scope, initial)
            .with_source(self, |snapshot: &mut Snapshot<T>, value| snapshot.set(0, value));

        others
            .into_iter()
            .enumerate()
            .fold(combined, |combined, (index, source)| {
                combined.with_source(source, move |snapshot: &mut Snapshot<T>, value| {
                    snapshot.set(index + 1, value)
                })
            })
    }
}

impl<S, T> CombineNullableExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Sized + Send + 'static,
    T: Clone + Send + 'static,
{
}
