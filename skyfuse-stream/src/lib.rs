// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fusion of independent asynchronous sources into one snapshot sequence.
//!
//! The central operator is [`combine_nullable`](combine_nullable2): a
//! combine-latest that does not wait for every source. Each value from any
//! source yields one snapshot of the latest value per source, with `None`
//! for sources that have not emitted yet.
//!
//! # Sources
//!
//! A source is any `Stream<Item = StreamItem<T>> + Send + 'static`. Plain
//! value streams are adapted with [`IntoSourceExt::into_source`].
//!
//! # Snapshot shapes
//!
//! | Entry point | Snapshot |
//! |---|---|
//! | [`combine_nullable2`] | `(Option<A>, Option<B>)` |
//! | [`combine_nullable3`] | `(Option<A>, Option<B>, Option<C>)` |
//! | [`combine_nullable4`] | `(Option<A>, Option<B>, Option<C>, Option<D>)` |
//! | [`combine_nullable_all`], [`CombineNullableExt::combine_nullable_with`] | [`Snapshot<T>`] |
//!
//! All of them return a [`CombineNullable`] which can be cancelled through
//! the [`Scope`](skyfuse_core::Scope) it was started in, through
//! [`CombineNullable::cancel`], or by dropping it.

mod logging;

pub mod combine_nullable;
pub mod into_source;
pub mod prelude;
pub mod snapshot;

pub use combine_nullable::{
    combine_nullable2, combine_nullable3, combine_nullable4, combine_nullable_all, CancelHandle,
    CombineNullable, CombineNullableExt,
};
pub use into_source::IntoSourceExt;
pub use snapshot::{Slots, Snapshot};
