// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use skyfuse_core::{Scope, StreamItem};
use skyfuse_stream::prelude::*;
use skyfuse_test_utils::{test_channel, unwrap_stream, unwrap_value};
use tokio_stream::wrappers::UnboundedReceiverStream;

#[tokio::test]
async fn into_source_wraps_every_item_as_value() {
    // Arrange
    let mut source = stream::iter(vec![1, 2]).into_source();

    // Act
    let items: Vec<StreamItem<i32>> = (&mut source).collect().await;

    // Assert
    assert_eq!(items, vec![StreamItem::Value(1), StreamItem::Value(2)]);
}

#[tokio::test]
async fn into_source_feeds_the_combinator() -> anyhow::Result<()> {
    // Arrange
    let scope = Scope::new();
    let (tx_plain, rx_plain) = tokio::sync::mpsc::unbounded_channel::<u16>();
    let (_tx, other) = test_channel::<u16>();
    let plain = UnboundedReceiverStream::new(rx_plain).into_source();
    let mut fused = combine_nullable2(&scope, plain, other);

    // Act
    tx_plain.send(42)?;

    // Assert
    let snapshot = unwrap_value(Some(unwrap_stream(&mut fused, 500).await));
    assert_eq!(snapshot, (Some(42), None));
    Ok(())
}
