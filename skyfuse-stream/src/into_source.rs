// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::Map;
use futures::{Stream, StreamExt};
use skyfuse_core::StreamItem;

/// Adapt a plain value stream into a source the combinator accepts.
///
/// Every item becomes `StreamItem::Value`, so the adapted source never fails.
pub trait IntoSourceExt: Stream + Sized {
    fn into_source(self) -> Map<Self, fn(Self::Item) -> StreamItem<Self::Item>> {
        self.map(StreamItem::Value as fn(Self::Item) -> StreamItem<Self::Item>)
    }
}

impl<S: Stream> IntoSourceExt for S {}
